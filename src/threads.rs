//! gPBWT storage for haplotype threads.
//!
//! A thread is a walk over existing edges, stored as a sequence of oriented
//! node visits. For every node side the index keeps a `B_s` array with one
//! destination per thread visit to that side: either [`BS_NULL`] (the thread
//! ends there) or `2 + k`, where `k` is the index of the outgoing edge the
//! thread takes next. Together with per-orientation usage counts and
//! per-side thread start counts, the `where_to` mapping navigates from a
//! visit at one side to the corresponding visit at the next, which is all
//! that insertion, extraction, and haplotype matching need.
//!
//! Threads are inserted through a [`ThreadBuilder`], whose per-side arrays
//! are kept writable. Baking concatenates the arrays, separated by
//! [`BS_SEPARATOR`], into a single wavelet tree with rank and select
//! support; the resulting [`ThreadIndex`] is immutable.
//!
//! Sides are encoded as `2 * node_rank + is_reverse`. Values 0 and 1 are
//! reserved, so real sides start at 2.

use crate::graph::{Edge, Graph};
use crate::support::{Orientation, WaveletTree};

use simple_sds::int_vector::IntVector;
use simple_sds::ops::{Access, Push, Vector};
use simple_sds::serialize::Serialize;
use simple_sds::bits;

use std::collections::{BTreeMap, VecDeque};
use std::io::{Error, ErrorKind};
use std::ops::Range;
use std::io;

#[cfg(test)]
mod tests;

//-----------------------------------------------------------------------------

/// Destination marking the end of a thread in a `B_s` array.
pub const BS_NULL: u64 = 0;

/// Separator between the per-side `B_s` arrays in the baked storage.
pub const BS_SEPARATOR: u64 = 1;

//-----------------------------------------------------------------------------

/// One visit of a thread to an oriented node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ThreadMapping {
    /// Id of the visited node.
    pub id: i64,
    /// Strand of the visit.
    pub orientation: Orientation,
}

impl ThreadMapping {
    /// Creates a thread mapping from its fields.
    pub fn new(id: i64, orientation: Orientation) -> ThreadMapping {
        ThreadMapping {
            id: id,
            orientation: orientation,
        }
    }

    /// Returns the visit to the same node on the other strand.
    pub fn flip(&self) -> ThreadMapping {
        ThreadMapping::new(self.id, self.orientation.flip())
    }
}

/// Returns the reverse complement walk of a thread.
pub fn reverse_thread(thread: &[ThreadMapping]) -> Vec<ThreadMapping> {
    thread.iter().rev().map(|mapping| mapping.flip()).collect()
}

//-----------------------------------------------------------------------------

/// Returns the side encoding of an oriented node rank.
#[inline]
pub fn encode_side(rank: usize, orientation: Orientation) -> usize {
    2 * rank + orientation.is_reverse() as usize
}

/// Returns the node rank of a side.
#[inline]
pub fn side_to_rank(side: usize) -> usize {
    side / 2
}

/// Returns the orientation of a side.
#[inline]
pub fn side_orientation(side: usize) -> Orientation {
    Orientation::from_is_reverse(side & 1 == 1)
}

// The side of an oriented node id.
fn node_side(graph: &Graph, id: i64, orientation: Orientation) -> usize {
    encode_side(graph.id_to_rank(id), orientation)
}

// The oriented entity index of a node, as used in the usage counts.
fn node_orientation_index(graph: &Graph, id: i64, orientation: Orientation) -> usize {
    (graph.node_rank_as_entity(id) - 1) * 2 + orientation.is_reverse() as usize
}

// The oriented entity index of an edge departing from the given oriented
// node. The edge must be articulated as stored in the graph.
fn departure_orientation_index(graph: &Graph, edge: &Edge, id: i64, orientation: Orientation) -> usize {
    let entity = graph.edge_rank_as_entity(edge)
        .expect("ThreadIndex: Departing over an edge that is not in the graph");
    (entity - 1) * 2 + edge.depart_by_reverse(id, orientation) as usize
}

//-----------------------------------------------------------------------------

// The state shared by the mutable builder and the baked index: usage counts,
// start counts, and rank queries over the per-side destination arrays.
trait DestinationStore {
    // Number of thread visits to the oriented entity.
    fn visits(&self, orientation_index: usize) -> usize;

    // Number of threads starting at the side.
    fn starts(&self, side: usize) -> usize;

    // Number of occurrences of the destination among the first `offset`
    // entries of the side's array.
    fn destination_rank(&self, side: usize, offset: usize, value: u64) -> usize;
}

// Maps a visit at `current_side` to the corresponding visit offset at
// `new_side`, following the edge between the two sides. The new offset
// counts the threads that start at the new side, the threads arriving over
// earlier incoming edges, and the earlier visits at the current side taking
// the same edge. Returns `None` if no edge connects the sides.
fn where_to<S: DestinationStore>(
    graph: &Graph,
    store: &S,
    current_side: usize,
    visit_offset: usize,
    new_side: usize,
) -> Option<usize> {
    let new_id = graph.rank_to_id(side_to_rank(new_side));
    let new_orientation = side_orientation(new_side);
    let old_id = graph.rank_to_id(side_to_rank(current_side));
    let old_orientation = side_orientation(current_side);
    let taken = Edge::new(
        old_id, old_orientation.is_reverse(),
        new_id, new_orientation.is_reverse(),
    );

    // Threads arriving at the new side over earlier incoming edges.
    let arrivals = if new_orientation.is_reverse() {
        graph.edges_on_end(new_id)
    } else {
        graph.edges_on_start(new_id)
    };
    let mut new_offset = 0;
    let mut found = false;
    for edge in arrivals.iter() {
        if edge.is_equivalent(&taken) {
            found = true;
            break;
        }
        let entity = graph.edge_rank_as_entity(edge).unwrap();
        let index = (entity - 1) * 2 + edge.arrive_by_reverse(new_id, new_orientation) as usize;
        new_offset += store.visits(index);
    }
    if !found {
        return None;
    }

    // Earlier visits at the current side that take the same edge.
    let departures = if old_orientation.is_reverse() {
        graph.edges_on_start(old_id)
    } else {
        graph.edges_on_end(old_id)
    };
    let taken_index = departures.iter().position(|edge| edge.is_equivalent(&taken))?;
    new_offset += store.destination_rank(current_side, visit_offset, (taken_index + 2) as u64);

    // Threads that start at the new side.
    new_offset += store.starts(new_side);
    Some(new_offset)
}

//-----------------------------------------------------------------------------

/// The mutable construction state of the thread store.
///
/// The builder keeps one writable destination array per node side. Threads
/// can be inserted one at a time on any graph, or in a batch when the graph
/// is a topologically sorted DAG (up to reversing edges). Baking the builder
/// with [`ThreadIndex::from`] produces the immutable, queryable store;
/// there is no way back.
#[derive(Clone, Debug)]
pub struct ThreadBuilder {
    // Usage counts by oriented entity index.
    visits: Vec<u64>,
    // Thread start counts by side.
    starts: Vec<u64>,
    // Destination arrays by side - 2.
    arrays: Vec<Vec<u64>>,
}

impl ThreadBuilder {
    /// Creates an empty builder for the given graph.
    pub fn new(graph: &Graph) -> ThreadBuilder {
        ThreadBuilder {
            visits: vec![0; 2 * graph.entity_count()],
            starts: vec![0; 2 * (graph.node_count() + 1)],
            arrays: vec![Vec::new(); 2 * graph.node_count()],
        }
    }

    /// Inserts a thread and its reverse complement.
    ///
    /// Works on arbitrary graphs. Threads must be inserted one at a time;
    /// each call finishes before the next may start.
    ///
    /// # Panics
    ///
    /// Panics if a thread step does not follow an edge of the graph.
    pub fn insert(&mut self, graph: &Graph, thread: &[ThreadMapping]) {
        self.insert_orientation(graph, thread);
        self.insert_orientation(graph, &reverse_thread(thread));
    }

    // Inserts one orientation of a thread.
    fn insert_orientation(&mut self, graph: &Graph, thread: &[ThreadMapping]) {
        let mut visit_offset = 0;
        for (i, mapping) in thread.iter().enumerate() {
            let side = node_side(graph, mapping.id, mapping.orientation);
            if i + 1 == thread.len() {
                self.arrays[side - 2].insert(visit_offset, BS_NULL);
            } else {
                let next = &thread[i + 1];
                let next_side = node_side(graph, next.id, next.orientation);
                let wanted = Edge::new(
                    mapping.id, mapping.orientation.is_reverse(),
                    next.id, next.orientation.is_reverse(),
                );
                let departures = if mapping.orientation.is_reverse() {
                    graph.edges_on_start(mapping.id)
                } else {
                    graph.edges_on_end(mapping.id)
                };
                let taken_index = departures.iter().position(|edge| edge.is_equivalent(&wanted))
                    .unwrap_or_else(|| panic!(
                        "ThreadBuilder: Thread step from {}{} to {}{} does not follow an edge",
                        mapping.id, if mapping.orientation.is_reverse() { "-" } else { "+" },
                        next.id, if next.orientation.is_reverse() { "-" } else { "+" },
                    ));
                self.arrays[side - 2].insert(visit_offset, (taken_index + 2) as u64);
                let taken = departures[taken_index];
                self.visits[departure_orientation_index(graph, &taken, mapping.id, mapping.orientation)] += 1;
                visit_offset = where_to(graph, self, side, visit_offset, next_side)
                    .expect("ThreadBuilder: No edge toward the next visit");
            }
            self.visits[node_orientation_index(graph, mapping.id, mapping.orientation)] += 1;
            if i == 0 {
                self.starts[side] += 1;
            }
        }
    }

    /// Inserts a batch of threads and their reverse complements.
    ///
    /// The graph must be a topologically sorted DAG, up to reversing edges,
    /// and all threads through a node must traverse it in the same
    /// direction. The batch scans the nodes in rank order, passing groups of
    /// threads along the edges, and builds every destination array in one
    /// piece. Call at most once, on an otherwise empty builder.
    ///
    /// # Panics
    ///
    /// Panics if a thread step does not follow an edge of the graph.
    pub fn insert_batch(&mut self, graph: &Graph, threads: &[Vec<ThreadMapping>]) {
        self.insert_batch_orientation(graph, threads, false);
        self.insert_batch_orientation(graph, threads, true);
    }

    // One direction of the batch: either every thread forward, or every
    // thread reverse complemented.
    fn insert_batch_orientation(&mut self, graph: &Graph, threads: &[Vec<ThreadMapping>], reverse: bool) {
        // Bucket the threads by their first visited node in this direction.
        let mut starting_at: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
        for (number, thread) in threads.iter().enumerate() {
            if thread.is_empty() {
                continue;
            }
            let first = if reverse { thread.len() - 1 } else { 0 };
            let mapping = &thread[first];
            let orientation = if reverse { mapping.orientation.flip() } else { mapping.orientation };
            starting_at.entry(mapping.id).or_default().push(number);
            self.starts[node_side(graph, mapping.id, orientation)] += 1;
        }

        // Groups of (thread number, visit index) passed along each edge,
        // keyed by the entity rank of the edge.
        let mut messages: BTreeMap<usize, VecDeque<(usize, usize)>> = BTreeMap::new();

        let order: Vec<usize> = if reverse {
            (1..=graph.max_node_rank()).rev().collect()
        } else {
            (1..=graph.max_node_rank()).collect()
        };
        for node_rank in order {
            let node_id = graph.rank_to_id(node_rank);

            // Threads starting here, then threads arriving over each edge.
            let mut visiting: VecDeque<(usize, usize)> = VecDeque::new();
            if let Some(numbers) = starting_at.remove(&node_id) {
                for number in numbers {
                    let first = if reverse { threads[number].len() - 1 } else { 0 };
                    visiting.push_back((number, first));
                }
            }
            for edge in graph.edges_of(node_id) {
                let entity = graph.edge_rank_as_entity(&edge).unwrap();
                if let Some(arrived) = messages.remove(&entity) {
                    visiting.extend(arrived);
                }
            }
            if visiting.is_empty() {
                continue;
            }

            // All threads traverse the node in the same direction; take it
            // from the first visit.
            let (first_thread, first_visit) = *visiting.front().unwrap();
            let mut orientation = threads[first_thread][first_visit].orientation;
            if reverse {
                orientation = orientation.flip();
            }

            // Number the outgoing edges of the departure side.
            let departures = if orientation.is_reverse() {
                graph.edges_on_start(node_id)
            } else {
                graph.edges_on_end(node_id)
            };
            let mut local_number: BTreeMap<usize, u64> = BTreeMap::new();
            for (i, edge) in departures.iter().enumerate() {
                local_number.insert(graph.edge_rank_as_entity(edge).unwrap(), (i + 2) as u64);
            }

            let mut destinations: Vec<u64> = Vec::with_capacity(visiting.len());
            for (number, visit) in visiting {
                let continues = if reverse { visit != 0 } else { visit + 1 < threads[number].len() };
                if continues {
                    let next_visit = if reverse { visit - 1 } else { visit + 1 };
                    let next = &threads[number][next_visit];
                    let next_orientation = if reverse { next.orientation.flip() } else { next.orientation };
                    let wanted = Edge::new(
                        node_id, orientation.is_reverse(),
                        next.id, next_orientation.is_reverse(),
                    );
                    let entity = graph.edge_rank_as_entity(&wanted).unwrap_or_else(|| panic!(
                        "ThreadBuilder: Thread step from {}{} to {}{} does not follow an edge",
                        node_id, if orientation.is_reverse() { "-" } else { "+" },
                        next.id, if next_orientation.is_reverse() { "-" } else { "+" },
                    ));
                    destinations.push(*local_number.get(&entity)
                        .expect("ThreadBuilder: The taken edge does not leave the departure side"));
                    messages.entry(entity).or_default().push_back((number, next_visit));
                    let canonical = graph.canonicalize(&wanted);
                    self.visits[departure_orientation_index(graph, &canonical, node_id, orientation)] += 1;
                } else {
                    destinations.push(BS_NULL);
                }
            }

            self.visits[node_orientation_index(graph, node_id, orientation)] = destinations.len() as u64;
            let side = node_side(graph, node_id, orientation);
            self.arrays[side - 2] = destinations;
        }
    }
}

impl DestinationStore for ThreadBuilder {
    fn visits(&self, orientation_index: usize) -> usize {
        self.visits[orientation_index] as usize
    }

    fn starts(&self, side: usize) -> usize {
        self.starts[side] as usize
    }

    // Fresh arrays have no rank structures; count by scanning.
    fn destination_rank(&self, side: usize, offset: usize, value: u64) -> usize {
        self.arrays[side - 2][..offset].iter().filter(|v| **v == value).count()
    }
}

//-----------------------------------------------------------------------------

/// The baked, immutable thread store.
///
/// See the module documentation for the encoding. A `ThreadIndex` is
/// obtained by baking a [`ThreadBuilder`] or by loading a serialized index;
/// it only supports queries.
///
/// # Examples
///
/// ```
/// use sgindex::{GraphBuilder, GraphChunk, BuildParameters, Edge, Orientation, ThreadMapping};
///
/// let mut chunk = GraphChunk::new();
/// chunk.add_node(1, "A");
/// chunk.add_node(2, "T");
/// chunk.add_edge(Edge::new(1, false, 2, false));
/// chunk.add_path("hap", &[(1, Orientation::Forward), (2, Orientation::Forward)]);
///
/// let mut params = BuildParameters::default();
/// params.store_threads = true;
/// params.sorted_dag = true;
/// let mut builder = GraphBuilder::new(params);
/// builder.add_chunk(&chunk);
/// let index = builder.finish().unwrap();
///
/// let thread = vec![
///     ThreadMapping::new(1, Orientation::Forward),
///     ThreadMapping::new(2, Orientation::Forward),
/// ];
/// assert_eq!(index.threads().count_matches(index.graph(), &thread), 1);
/// assert_eq!(index.threads().extract_threads(index.graph()).len(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThreadIndex {
    // Usage counts by oriented entity index.
    visits: IntVector,
    // Thread start counts by side.
    starts: IntVector,
    // The concatenated destination arrays, with a separator before the
    // array of each side (and one for the two reserved sides).
    destinations: WaveletTree,
}

impl From<ThreadBuilder> for ThreadIndex {
    fn from(builder: ThreadBuilder) -> ThreadIndex {
        let total: usize = builder.arrays.iter().map(|array| array.len() + 1).sum();
        let mut concatenated: Vec<u64> = Vec::with_capacity(total + 1);
        // The reserved sides 0 and 1 share the leading separator.
        concatenated.push(BS_SEPARATOR);
        for array in builder.arrays.iter() {
            concatenated.push(BS_SEPARATOR);
            concatenated.extend_from_slice(array);
        }

        ThreadIndex {
            visits: Self::pack(&builder.visits),
            starts: Self::pack(&builder.starts),
            destinations: WaveletTree::from(concatenated),
        }
    }
}

/// Queries.
impl ThreadIndex {
    fn pack(values: &[u64]) -> IntVector {
        let width = bits::bit_len(values.iter().copied().max().unwrap_or(0));
        let mut result = IntVector::with_capacity(values.len(), width).unwrap();
        for value in values.iter() {
            result.push(*value);
        }
        result
    }

    /// Returns the number of thread visits to the node in the given
    /// orientation.
    pub fn node_visits(&self, graph: &Graph, id: i64, orientation: Orientation) -> usize {
        self.visits.get(node_orientation_index(graph, id, orientation)) as usize
    }

    /// Returns the number of stored thread orientations starting at the node
    /// in the given orientation.
    pub fn threads_starting_at(&self, graph: &Graph, id: i64, orientation: Orientation) -> usize {
        self.starts.get(node_side(graph, id, orientation)) as usize
    }

    /// Returns the total number of stored thread orientations.
    ///
    /// Every inserted thread is stored in both orientations, so this is
    /// twice the number of inserted threads.
    pub fn stored_orientations(&self) -> usize {
        (0..self.starts.len()).map(|side| self.starts.get(side) as usize).sum()
    }

    // The position of the side's array in the concatenated storage.
    fn array_start(&self, side: usize) -> usize {
        self.destinations.select(side - 1, BS_SEPARATOR)
            .expect("ThreadIndex: Side out of range") + 1
    }

    /// Returns the destination of the visit at the given offset of the side.
    ///
    /// # Panics
    ///
    /// Panics if the side or the offset is out of range.
    pub fn destination(&self, side: usize, offset: usize) -> u64 {
        self.destinations.get(self.array_start(side) + offset)
    }

    /// Maps a visit at `current_side` to the corresponding visit offset at
    /// `new_side`, following the edge between the two sides.
    ///
    /// Returns [`None`] if no edge connects the sides.
    pub fn where_to(&self, graph: &Graph, current_side: usize, visit_offset: usize, new_side: usize) -> Option<usize> {
        where_to(graph, self, current_side, visit_offset, new_side)
    }

    /// Extracts all stored thread orientations.
    ///
    /// Each inserted thread appears twice: once as inserted and once as its
    /// reverse complement.
    ///
    /// # Panics
    ///
    /// Panics if the stored arrays are inconsistent with the graph.
    pub fn extract_threads(&self, graph: &Graph) -> Vec<Vec<ThreadMapping>> {
        let mut result = Vec::new();
        for side in 2..self.starts.len() {
            for offset in 0..self.starts.get(side) as usize {
                result.push(self.extract_thread(graph, side, offset));
            }
        }
        result
    }

    // Walks one thread from its starting visit.
    fn extract_thread(&self, graph: &Graph, start_side: usize, start_offset: usize) -> Vec<ThreadMapping> {
        let mut thread = Vec::new();
        let mut side = start_side;
        let mut offset = start_offset;
        loop {
            let id = graph.rank_to_id(side_to_rank(side));
            let orientation = side_orientation(side);
            thread.push(ThreadMapping::new(id, orientation));

            let destination = self.destination(side, offset);
            assert!(destination != BS_SEPARATOR, "ThreadIndex: Walked into a separator");
            if destination == BS_NULL {
                break;
            }
            let taken_index = (destination - 2) as usize;
            let departures = if orientation.is_reverse() {
                graph.edges_on_start(id)
            } else {
                graph.edges_on_end(id)
            };
            assert!(taken_index < departures.len(), "ThreadIndex: Destination does not name an edge");
            let taken = departures[taken_index];

            let next_id = if taken.from == id { taken.to } else { taken.from };
            let next_is_reverse = (orientation.is_reverse() != taken.from_start) != taken.to_end;
            let next_side = encode_side(graph.id_to_rank(next_id), Orientation::from_is_reverse(next_is_reverse));
            offset = self.where_to(graph, side, offset, next_side)
                .expect("ThreadIndex: No edge toward the stored destination");
            side = next_side;
        }
        thread
    }

    /// Extends a search state with the visits of the thread.
    ///
    /// An unstarted state selects all visits to the first node of the
    /// thread. The state becomes empty when no stored thread matches.
    pub fn extend_search(&self, graph: &Graph, state: &mut ThreadSearchState, thread: &[ThreadMapping]) {
        for mapping in thread.iter() {
            if state.side != 0 && state.is_empty() {
                return;
            }
            let next_side = node_side(graph, mapping.id, mapping.orientation);
            if state.side == 0 {
                let count = self.visits.get(node_orientation_index(graph, mapping.id, mapping.orientation)) as usize;
                state.range = 0..count;
            } else {
                let start = self.where_to(graph, state.side, state.range.start, next_side);
                let end = self.where_to(graph, state.side, state.range.end, next_side);
                state.range = match (start, end) {
                    (Some(start), Some(end)) => start..end,
                    _ => 0..0,
                };
            }
            state.side = next_side;
        }
    }

    /// Returns the number of stored thread orientations containing the
    /// thread as a subpath.
    pub fn count_matches(&self, graph: &Graph, thread: &[ThreadMapping]) -> usize {
        let mut state = ThreadSearchState::new();
        self.extend_search(graph, &mut state, thread);
        state.len()
    }

    pub(crate) fn check_graph(&self, graph: &Graph) -> Result<(), String> {
        if self.visits.len() != 2 * graph.entity_count() {
            return Err(String::from("ThreadIndex: Usage counts do not match the entity count"));
        }
        if self.starts.len() != 2 * (graph.node_count() + 1) {
            return Err(String::from("ThreadIndex: Start counts do not match the node count"));
        }
        if self.destinations.count(BS_SEPARATOR) != 2 * graph.node_count() + 1 {
            return Err(String::from("ThreadIndex: Destination arrays do not match the node count"));
        }
        Ok(())
    }
}

impl Serialize for ThreadIndex {
    fn serialize_header<T: io::Write>(&self, _: &mut T) -> io::Result<()> {
        Ok(())
    }

    fn serialize_body<T: io::Write>(&self, writer: &mut T) -> io::Result<()> {
        self.visits.serialize(writer)?;
        self.starts.serialize(writer)?;
        self.destinations.serialize(writer)?;
        Ok(())
    }

    fn load<T: io::Read>(reader: &mut T) -> io::Result<Self> {
        let visits = IntVector::load(reader)?;
        let starts = IntVector::load(reader)?;
        let destinations = WaveletTree::load(reader)?;
        if destinations.is_empty() {
            return Err(Error::new(ErrorKind::InvalidData, "ThreadIndex: Missing destination arrays"));
        }
        Ok(ThreadIndex {
            visits: visits,
            starts: starts,
            destinations: destinations,
        })
    }

    fn size_in_elements(&self) -> usize {
        self.visits.size_in_elements() + self.starts.size_in_elements() + self.destinations.size_in_elements()
    }
}

impl DestinationStore for ThreadIndex {
    fn visits(&self, orientation_index: usize) -> usize {
        self.visits.get(orientation_index) as usize
    }

    fn starts(&self, side: usize) -> usize {
        self.starts.get(side) as usize
    }

    fn destination_rank(&self, side: usize, offset: usize, value: u64) -> usize {
        let start = self.array_start(side);
        self.destinations.rank(start + offset, value) - self.destinations.rank(start, value)
    }
}

//-----------------------------------------------------------------------------

/// The state of a haplotype search: the side of the last matched visit and
/// the interval of thread visits at that side that still match.
///
/// A default-constructed state is unstarted; extending it with a thread
/// first selects every visit to the thread's first node. See
/// [`ThreadIndex::extend_search`] and [`ThreadIndex::count_matches`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ThreadSearchState {
    /// Side of the last matched visit, or 0 if the search has not started.
    pub side: usize,
    /// The interval of matching visit offsets at the side.
    pub range: Range<usize>,
}

impl ThreadSearchState {
    /// Creates an unstarted search state.
    pub fn new() -> ThreadSearchState {
        ThreadSearchState::default()
    }

    /// Returns the number of matching visits.
    #[inline]
    pub fn len(&self) -> usize {
        self.range.end.saturating_sub(self.range.start)
    }

    /// Returns `true` if nothing matches.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

//-----------------------------------------------------------------------------
