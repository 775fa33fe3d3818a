//! The complete index: graph, paths, and threads.
//!
//! [`GraphIndex`] ties the components together and owns the persisted
//! format: a fixed-size scalar header followed by the graph, path, and
//! thread blocks, concatenated in a fixed order with no magic header. Every
//! component serializes its own sizes; a reader that observes inconsistent
//! sizes fails with [`std::io::ErrorKind::InvalidData`].

use crate::graph::Graph;
use crate::paths::PathStore;
use crate::support::Orientation;
use crate::threads::{self, ThreadIndex};

use simple_sds::serialize::{Serializable, Serialize};

use std::io::{Error, ErrorKind};
use std::io;

#[cfg(test)]
mod tests;

//-----------------------------------------------------------------------------

// The scalar header at the start of the serialized index.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct IndexHeader {
    pub(crate) sequence_len: usize,
    pub(crate) node_count: usize,
    pub(crate) edge_count: usize,
    pub(crate) path_count: usize,
    pub(crate) min_id: i64,
    pub(crate) max_id: i64,
}

impl Serializable for IndexHeader {}

//-----------------------------------------------------------------------------

/// The immutable index over a bidirected sequence graph with paths and
/// threads.
///
/// A `GraphIndex` is built by [`crate::GraphBuilder`] or loaded from a
/// serialized file. The components are reached through [`GraphIndex::graph`],
/// [`GraphIndex::paths`], and [`GraphIndex::threads`]; queries that span
/// components take the graph as an argument.
///
/// # Examples
///
/// ```
/// use sgindex::{GraphBuilder, GraphChunk, BuildParameters, Edge, Orientation};
///
/// let mut chunk = GraphChunk::new();
/// chunk.add_node(1, "ACG");
/// chunk.add_node(2, "TTT");
/// chunk.add_node(3, "CA");
/// chunk.add_edge(Edge::new(1, false, 2, false));
/// chunk.add_edge(Edge::new(2, false, 3, false));
/// chunk.add_path("ref", &[
///     (1, Orientation::Forward), (2, Orientation::Forward), (3, Orientation::Forward),
/// ]);
///
/// let mut builder = GraphBuilder::new(BuildParameters::default());
/// builder.add_chunk(&chunk);
/// let index = builder.finish().unwrap();
///
/// assert_eq!(index.node_count(), 3);
/// assert_eq!(index.sequence_len(), 8);
/// let rank = index.paths().path_rank("ref");
/// assert_eq!(index.paths().node_at_path_position(rank, 4), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphIndex {
    graph: Graph,
    paths: PathStore,
    threads: ThreadIndex,
}

impl GraphIndex {
    pub(crate) fn from_parts(graph: Graph, paths: PathStore, threads: ThreadIndex) -> GraphIndex {
        GraphIndex {
            graph: graph,
            paths: paths,
            threads: threads,
        }
    }

    /// Returns the graph component.
    #[inline]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Returns the path store.
    #[inline]
    pub fn paths(&self) -> &PathStore {
        &self.paths
    }

    /// Returns the thread store.
    #[inline]
    pub fn threads(&self) -> &ThreadIndex {
        &self.threads
    }

    /// Returns the number of nodes in the graph.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of edges in the graph.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns the number of paths.
    #[inline]
    pub fn path_count(&self) -> usize {
        self.paths.path_count()
    }

    /// Returns the total length of the node labels in base pairs.
    #[inline]
    pub fn sequence_len(&self) -> usize {
        self.graph.sequence_len()
    }

    fn header(&self) -> IndexHeader {
        IndexHeader {
            sequence_len: self.graph.sequence_len(),
            node_count: self.graph.node_count(),
            edge_count: self.graph.edge_count(),
            path_count: self.paths.path_count(),
            min_id: self.graph.min_node_id(),
            max_id: self.graph.max_node_id(),
        }
    }
}

//-----------------------------------------------------------------------------

/// Validation of a freshly built index.
impl GraphIndex {
    /// Checks the construction invariants and returns the first violation.
    ///
    /// This is a linear scan over the whole index and is intended for tests
    /// and for builds that were asked to validate themselves.
    pub fn validate(&self) -> Result<(), String> {
        self.validate_nodes()?;
        self.validate_edges()?;
        self.validate_paths()?;
        self.validate_threads()?;
        Ok(())
    }

    fn validate_nodes(&self) -> Result<(), String> {
        let graph = &self.graph;
        let mut total_len = 0;
        for rank in 1..=graph.max_node_rank() {
            let id = graph.rank_to_id(rank);
            if graph.id_to_rank(id) != rank {
                return Err(format!("Validation: Node {} does not round-trip through rank {}", id, rank));
            }
            let label = graph.node_sequence(id);
            if label.len() != graph.node_length(id) {
                return Err(format!("Validation: Inconsistent label length for node {}", id));
            }
            for (offset, c) in label.iter().enumerate() {
                if graph.pos_char(id, Orientation::Forward, offset) != *c {
                    return Err(format!("Validation: Inconsistent base {} of node {}", offset, id));
                }
                if graph.node_at_seq_pos(graph.node_start(id) + offset) != id {
                    return Err(format!("Validation: Base {} of node {} maps to another node", offset, id));
                }
            }
            total_len += label.len();
        }
        if total_len != graph.sequence_len() {
            return Err(String::from("Validation: Node labels do not cover the sequence"));
        }
        Ok(())
    }

    fn validate_edges(&self) -> Result<(), String> {
        let graph = &self.graph;
        let mut seen = 0;
        for rank in 1..=graph.max_node_rank() {
            let id = graph.rank_to_id(rank);
            for edge in graph.edges_from(id) {
                seen += 1;
                let entity = match graph.edge_rank_as_entity(&edge) {
                    Some(entity) => entity,
                    None => return Err(format!("Validation: Stored edge {:?} has no entity rank", edge)),
                };
                if graph.entity_is_node(entity) {
                    return Err(format!("Validation: Edge {:?} has a node entity rank", edge));
                }
                if graph.edge_rank_as_entity(&edge.reverse()) != Some(entity) {
                    return Err(format!("Validation: Articulations of edge {:?} disagree", edge));
                }
            }
            for edge in graph.edges_to(id) {
                if graph.edge_rank_as_entity(&edge).is_none() {
                    return Err(format!("Validation: Incoming edge {:?} is not stored", edge));
                }
            }
        }
        if seen != graph.edge_count() {
            return Err(String::from("Validation: Outgoing edge records do not match the edge count"));
        }
        Ok(())
    }

    fn validate_paths(&self) -> Result<(), String> {
        let graph = &self.graph;
        let paths = &self.paths;
        for path_rank in 1..=paths.max_path_rank() {
            let name = paths.path_name(path_rank).to_vec();
            if paths.path_rank(&name) != path_rank {
                return Err(format!("Validation: Path {} does not round-trip through its name",
                    String::from_utf8_lossy(&name)));
            }
            let indexed = paths.indexed_path(path_rank);
            let mut offset = 0;
            for (visit, traversal) in paths.path(path_rank).iter().enumerate() {
                if !paths.path_contains_node(graph, path_rank, traversal.id) {
                    return Err(format!("Validation: Visit {} of path {} is not a member",
                        visit, String::from_utf8_lossy(&name)));
                }
                if indexed.position(visit) != offset {
                    return Err(format!("Validation: Incorrect position for visit {} of path {}",
                        visit, String::from_utf8_lossy(&name)));
                }
                for base in 0..graph.node_length(traversal.id) {
                    if paths.node_at_path_position(path_rank, offset + base) != traversal.id {
                        return Err(format!("Validation: Base {} of path {} maps to the wrong node",
                            offset + base, String::from_utf8_lossy(&name)));
                    }
                }
                offset += graph.node_length(traversal.id);
            }
            if offset != paths.path_length(path_rank) {
                return Err(format!("Validation: Visits of path {} do not cover its length",
                    String::from_utf8_lossy(&name)));
            }
        }
        Ok(())
    }

    fn validate_threads(&self) -> Result<(), String> {
        let graph = &self.graph;
        let threads = &self.threads;
        threads.check_graph(graph)?;
        let extracted = threads.extract_threads(graph);
        if extracted.len() != threads.stored_orientations() {
            return Err(String::from("Validation: Extraction does not match the start counts"));
        }
        for thread in extracted.iter() {
            if threads.count_matches(graph, thread) == 0 {
                return Err(String::from("Validation: An extracted thread does not match"));
            }
            if threads.count_matches(graph, &threads::reverse_thread(thread)) == 0 {
                return Err(String::from("Validation: The reverse of an extracted thread does not match"));
            }
        }
        Ok(())
    }
}

//-----------------------------------------------------------------------------

impl Serialize for GraphIndex {
    fn serialize_header<T: io::Write>(&self, writer: &mut T) -> io::Result<()> {
        self.header().serialize(writer)
    }

    fn serialize_body<T: io::Write>(&self, writer: &mut T) -> io::Result<()> {
        self.graph.serialize(writer)?;
        self.paths.serialize(writer)?;
        self.threads.serialize(writer)?;
        Ok(())
    }

    fn load<T: io::Read>(reader: &mut T) -> io::Result<Self> {
        let header = IndexHeader::load(reader)?;
        if header.node_count > 0 && header.min_id > header.max_id {
            return Err(Error::new(ErrorKind::InvalidData, "GraphIndex: Invalid id range"));
        }
        let graph = Graph::load(reader, &header)?;
        let paths = PathStore::load(reader)?;
        if paths.path_count() != header.path_count {
            return Err(Error::new(ErrorKind::InvalidData, "GraphIndex: Path count mismatch"));
        }
        if let Err(message) = paths.check_graph(&graph) {
            return Err(Error::new(ErrorKind::InvalidData, message));
        }
        let threads = ThreadIndex::load(reader)?;
        if let Err(message) = threads.check_graph(&graph) {
            return Err(Error::new(ErrorKind::InvalidData, message));
        }
        Ok(GraphIndex {
            graph: graph,
            paths: paths,
            threads: threads,
        })
    }

    fn size_in_elements(&self) -> usize {
        self.header().size_in_elements() + self.graph.size_in_elements()
            + self.paths.size_in_elements() + self.threads.size_in_elements()
    }
}

//-----------------------------------------------------------------------------
