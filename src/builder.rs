//! Construction of the index from graph chunks.
//!
//! The input arrives as [`GraphChunk`] values: plain nodes, edges, and path
//! traversals, typically produced by a streaming reader of some external
//! graph format. [`GraphBuilder`] accumulates the chunks, deduplicating
//! nodes and edges on the fly, and [`GraphBuilder::finish`] turns the
//! accumulated data into an immutable [`GraphIndex`]. Thread storage and
//! validation are controlled by [`BuildParameters`].

use crate::graph::{Edge, Graph};
use crate::index::GraphIndex;
use crate::paths::{PathStore, Traversal};
use crate::support::Orientation;
use crate::threads::{ThreadBuilder, ThreadIndex, ThreadMapping};

use std::collections::{BTreeMap, BTreeSet};


//-----------------------------------------------------------------------------

/// A portion of the input graph.
///
/// Chunks may overlap: nodes and edges already seen by the builder are
/// ignored, while path traversals accumulate across chunks under the path
/// name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GraphChunk {
    /// Nodes as (id, label) pairs.
    pub nodes: Vec<(i64, Vec<u8>)>,
    /// Edges between node sides.
    pub edges: Vec<Edge>,
    /// Paths as (name, traversals) pairs.
    pub paths: Vec<(String, Vec<Traversal>)>,
}

impl GraphChunk {
    /// Creates an empty chunk.
    pub fn new() -> GraphChunk {
        GraphChunk::default()
    }

    /// Adds a node with the given label.
    pub fn add_node<T: AsRef<[u8]>>(&mut self, id: i64, label: T) {
        self.nodes.push((id, label.as_ref().to_vec()));
    }

    /// Adds an edge.
    pub fn add_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    /// Adds a path visiting the given oriented nodes, with external ranks
    /// assigned in visit order.
    pub fn add_path(&mut self, name: &str, visits: &[(i64, Orientation)]) {
        let traversals = visits.iter().enumerate()
            .map(|(i, (id, orientation))| Traversal::new(*id, *orientation, i + 1))
            .collect();
        self.paths.push((String::from(name), traversals));
    }
}

//-----------------------------------------------------------------------------

/// Construction options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildParameters {
    /// Also store every path as a haplotype thread, in both orientations.
    pub store_threads: bool,
    /// The graph is a topologically sorted DAG (up to reversing edges);
    /// threads can then be inserted with the fast batch algorithm.
    pub sorted_dag: bool,
    /// Check the built index against the construction invariants.
    pub validate: bool,
}

//-----------------------------------------------------------------------------

/// Accumulates graph chunks and builds the index.
///
/// # Examples
///
/// ```
/// use sgindex::{GraphBuilder, GraphChunk, BuildParameters, Edge, Orientation};
///
/// let mut chunk = GraphChunk::new();
/// chunk.add_node(1, "ACG");
/// chunk.add_node(2, "TTT");
/// chunk.add_edge(Edge::new(1, false, 2, false));
/// chunk.add_path("ref", &[(1, Orientation::Forward), (2, Orientation::Forward)]);
///
/// let mut builder = GraphBuilder::new(BuildParameters::default());
/// builder.add_chunk(&chunk);
/// let index = builder.finish().unwrap();
/// assert_eq!(index.node_count(), 2);
/// assert_eq!(index.path_count(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct GraphBuilder {
    parameters: BuildParameters,
    labels: BTreeMap<i64, Vec<u8>>,
    // Adjacency in both directions, keyed by (node id, side flag). The
    // forward map goes from (from, from_start) to (to, to_end) and the
    // reverse map the other way around.
    from_to: BTreeMap<(i64, bool), BTreeSet<(i64, bool)>>,
    to_from: BTreeMap<(i64, bool), BTreeSet<(i64, bool)>>,
    edge_count: usize,
    paths: BTreeMap<String, Vec<Traversal>>,
}

impl GraphBuilder {
    /// Creates an empty builder.
    pub fn new(parameters: BuildParameters) -> GraphBuilder {
        GraphBuilder {
            parameters: parameters,
            ..GraphBuilder::default()
        }
    }

    /// Returns the number of distinct nodes seen so far.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.labels.len()
    }

    /// Returns the number of distinct edges seen so far.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Adds a chunk of the graph.
    ///
    /// Known nodes and edges are ignored; an edge equal to the reverse
    /// articulation of a known edge is also known.
    ///
    /// # Panics
    ///
    /// Panics if a node has an empty label.
    pub fn add_chunk(&mut self, chunk: &GraphChunk) {
        for (id, label) in chunk.nodes.iter() {
            assert!(!label.is_empty(), "GraphBuilder: Node {} has an empty label", id);
            self.labels.entry(*id).or_insert_with(|| label.clone());
        }
        for edge in chunk.edges.iter() {
            self.add_edge(edge);
        }
        for (name, traversals) in chunk.paths.iter() {
            self.paths.entry(name.clone()).or_default().extend_from_slice(traversals);
        }
    }

    fn add_edge(&mut self, edge: &Edge) {
        let known = |e: &Edge| -> bool {
            match self.from_to.get(&(e.from, e.from_start)) {
                Some(targets) => targets.contains(&(e.to, e.to_end)),
                None => false,
            }
        };
        if known(edge) || known(&edge.reverse()) {
            return;
        }
        self.from_to.entry((edge.from, edge.from_start)).or_default().insert((edge.to, edge.to_end));
        self.to_from.entry((edge.to, edge.to_end)).or_default().insert((edge.from, edge.from_start));
        self.edge_count += 1;
    }

    /// Builds the index from the accumulated chunks.
    ///
    /// Path traversals are sorted by their external ranks, keeping the first
    /// of any duplicate rank. Edges with an endpoint that is not a node of
    /// the graph are dropped with a warning.
    pub fn finish(mut self) -> Result<GraphIndex, String> {
        self.drop_dangling_edges();
        for traversals in self.paths.values_mut() {
            traversals.sort_by_key(|t| t.rank);
            traversals.dedup_by_key(|t| t.rank);
        }

        let graph = Graph::new(&self.labels, &self.from_to, &self.to_from, self.edge_count);
        let paths = PathStore::new(&graph, &self.paths);

        let mut threads = ThreadBuilder::new(&graph);
        if self.parameters.store_threads {
            let as_threads: Vec<Vec<ThreadMapping>> = self.paths.values()
                .map(|traversals| traversals.iter()
                    .map(|t| ThreadMapping::new(t.id, t.orientation))
                    .collect())
                .collect();
            if self.parameters.sorted_dag {
                threads.insert_batch(&graph, &as_threads);
            } else {
                for thread in as_threads.iter() {
                    threads.insert(&graph, thread);
                }
            }
        }

        let index = GraphIndex::from_parts(graph, paths, ThreadIndex::from(threads));
        if self.parameters.validate {
            index.validate()?;
        }
        Ok(index)
    }

    // Removes edges whose endpoints are not nodes of the graph.
    fn drop_dangling_edges(&mut self) {
        let labels = &self.labels;
        let mut dropped = 0;
        for (source, targets) in self.from_to.iter_mut() {
            if !labels.contains_key(&source.0) {
                dropped += targets.len();
                targets.clear();
                continue;
            }
            let before = targets.len();
            targets.retain(|target| labels.contains_key(&target.0));
            dropped += before - targets.len();
        }
        self.from_to.retain(|_, targets| !targets.is_empty());
        for (target, sources) in self.to_from.iter_mut() {
            if !labels.contains_key(&target.0) {
                sources.clear();
                continue;
            }
            sources.retain(|source| labels.contains_key(&source.0));
        }
        self.to_from.retain(|_, sources| !sources.is_empty());
        if dropped > 0 {
            eprintln!("[sgindex] warning: dropped {} edges with missing endpoints", dropped);
            self.edge_count -= dropped;
        }
    }
}

//-----------------------------------------------------------------------------

/// Builds the index by pulling chunks from a callback-driven reader.
///
/// The reader calls the handler it is given once per chunk and returns when
/// the input is exhausted.
///
/// # Examples
///
/// ```
/// use sgindex::{builder, GraphChunk, BuildParameters};
///
/// let mut chunks = vec![GraphChunk::new(), GraphChunk::new()];
/// chunks[0].add_node(1, "ACG");
/// chunks[1].add_node(2, "T");
///
/// let index = builder::from_chunks(BuildParameters::default(), |handle_chunk| {
///     for chunk in chunks.iter() {
///         handle_chunk(chunk);
///     }
/// }).unwrap();
/// assert_eq!(index.node_count(), 2);
/// ```
pub fn from_chunks<F>(parameters: BuildParameters, reader: F) -> Result<GraphIndex, String>
where
    F: FnOnce(&mut dyn FnMut(&GraphChunk)),
{
    let mut builder = GraphBuilder::new(parameters);
    reader(&mut |chunk| builder.add_chunk(chunk));
    builder.finish()
}

//-----------------------------------------------------------------------------
