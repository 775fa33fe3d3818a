//! Bidirected sequence graph: node labels, the id space, and the topology.
//!
//! [`Graph`] packs the entire graph into a handful of rank/select-indexed
//! vectors. Node labels are concatenated in id order into a 3-bit sequence
//! vector with a bitmap marking node starts. The topology is stored twice,
//! once from the perspective of the edge source and once from the target:
//! each direction is a single integer vector with a run per node, holding the
//! node rank followed by the ranks of the adjacent nodes, and two sparse
//! bitmaps carrying the side flags of each edge slot. Nodes and edge slots
//! together form the global entity numbering shared by the path and thread
//! stores.

use crate::index::IndexHeader;
use crate::support::{self, Orientation};

use simple_sds::bit_vector::BitVector;
use simple_sds::int_vector::IntVector;
use simple_sds::ops::{Access, BitVec, Push, Rank, Select, Vector};
use simple_sds::raw_vector::{AccessRaw, RawVector};
use simple_sds::serialize::Serialize;
use simple_sds::sparse_vector::{SparseBuilder, SparseVector};
use simple_sds::bits;

use std::collections::{BTreeMap, BTreeSet};
use std::io::{Error, ErrorKind};
use std::ops::Range;
use std::io;


//-----------------------------------------------------------------------------

/// An edge between two node sides.
///
/// `from_start` states that the edge leaves the start (5') side of the source
/// node, and `to_end` that it enters the end (3') side of the target node.
/// The same edge can be articulated in two ways; [`Edge::reverse`] gives the
/// other articulation and [`Edge::is_equivalent`] compares up to reversal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge {
    /// Source node id.
    pub from: i64,
    /// Does the edge leave through the start of the source?
    pub from_start: bool,
    /// Target node id.
    pub to: i64,
    /// Does the edge enter through the end of the target?
    pub to_end: bool,
}

impl Edge {
    /// Creates an edge from its fields.
    pub fn new(from: i64, from_start: bool, to: i64, to_end: bool) -> Edge {
        Edge {
            from: from,
            from_start: from_start,
            to: to,
            to_end: to_end,
        }
    }

    /// Returns the opposite articulation of the same edge.
    pub fn reverse(&self) -> Edge {
        Edge::new(self.to, !self.to_end, self.from, !self.from_start)
    }

    /// Returns `true` if the two articulations describe the same edge.
    pub fn is_equivalent(&self, other: &Edge) -> bool {
        *self == *other || *self == other.reverse()
    }

    /// Returns `true` if the edge connects a node to itself with a change of
    /// orientation.
    pub fn is_reversing_self_loop(&self) -> bool {
        self.from == self.to && self.from_start != self.to_end
    }

    /// Returns `true` if arriving at the given oriented node over this edge
    /// requires traversing the edge against its articulation.
    ///
    /// The edge must attach to the entry side of the oriented node. Reversing
    /// self-loops can always be taken forward.
    pub fn arrive_by_reverse(&self, id: i64, orientation: Orientation) -> bool {
        if self.to == id && orientation.is_reverse() == self.to_end {
            false
        } else {
            !self.is_reversing_self_loop()
        }
    }

    /// Returns `true` if departing from the given oriented node over this
    /// edge requires traversing the edge against its articulation.
    ///
    /// The edge must attach to the exit side of the oriented node. Reversing
    /// self-loops can always be taken forward.
    pub fn depart_by_reverse(&self, id: i64, orientation: Orientation) -> bool {
        if self.from == id && orientation.is_reverse() == self.from_start {
            false
        } else {
            !self.is_reversing_self_loop()
        }
    }
}

//-----------------------------------------------------------------------------

// One direction of the topology: a run per node in rank order, consisting of
// the node rank followed by the ranks of the adjacent nodes, with a bitmap
// marking the run headers and sparse bitmaps for the side flags of each edge
// slot.
#[derive(Clone, Debug, PartialEq, Eq)]
struct EntityVector {
    entities: IntVector,
    nodes: BitVector,
    from_start: SparseVector,
    to_end: SparseVector,
}

impl EntityVector {
    // Builds one direction from an adjacency map keyed by (node id, own side
    // flag). For the forward direction the own flag is `from_start` and the
    // stored flag is `to_end`; the reverse direction swaps the two.
    fn new(
        order: &[i64],
        rank_of: &BTreeMap<i64, usize>,
        adjacency: &BTreeMap<(i64, bool), BTreeSet<(i64, bool)>>,
        entity_count: usize,
        own_is_from_start: bool,
    ) -> EntityVector {
        let node_count = order.len();
        let mut entities = IntVector::with_capacity(entity_count, bits::bit_len(node_count as u64)).unwrap();
        let mut nodes = RawVector::with_len(entity_count, false);
        let mut from_start_positions: Vec<usize> = Vec::new();
        let mut to_end_positions: Vec<usize> = Vec::new();

        let mut offset = 0;
        for (k, id) in order.iter().enumerate() {
            entities.push((k + 1) as u64);
            nodes.set_bit(offset, true);
            offset += 1;
            for own_side in [false, true] {
                if let Some(targets) = adjacency.get(&(*id, own_side)) {
                    for (other, other_side) in targets.iter() {
                        entities.push(rank_of[other] as u64);
                        let (from_start, to_end) = if own_is_from_start {
                            (own_side, *other_side)
                        } else {
                            (*other_side, own_side)
                        };
                        if from_start {
                            from_start_positions.push(offset);
                        }
                        if to_end {
                            to_end_positions.push(offset);
                        }
                        offset += 1;
                    }
                }
            }
        }

        let mut node_bits = BitVector::from(nodes);
        node_bits.enable_rank();
        node_bits.enable_select();
        EntityVector {
            entities: entities,
            nodes: node_bits,
            from_start: Self::sparse(entity_count, &from_start_positions),
            to_end: Self::sparse(entity_count, &to_end_positions),
        }
    }

    fn sparse(universe: usize, positions: &[usize]) -> SparseVector {
        let mut builder = SparseBuilder::new(universe, positions.len()).unwrap();
        for pos in positions.iter() {
            unsafe { builder.set_unchecked(*pos); }
        }
        SparseVector::try_from(builder).unwrap()
    }

    // The number of nodes in this direction.
    #[inline]
    fn node_count(&self) -> usize {
        self.nodes.count_ones()
    }

    // The entity slot of the run header for the node of the given rank.
    #[inline]
    fn header_slot(&self, rank: usize) -> usize {
        self.nodes.select(rank - 1).unwrap()
    }

    // The entity slots holding the edges of the node of the given rank.
    fn edge_slots(&self, rank: usize) -> Range<usize> {
        let start = self.header_slot(rank) + 1;
        let limit = if rank == self.node_count() {
            self.entities.len()
        } else {
            self.nodes.select(rank).unwrap()
        };
        start..limit
    }

    // The stored node rank at the given slot.
    #[inline]
    fn target(&self, slot: usize) -> usize {
        self.entities.get(slot) as usize
    }

    fn serialize<T: io::Write>(&self, writer: &mut T) -> io::Result<()> {
        self.entities.serialize(writer)?;
        self.nodes.serialize(writer)?;
        self.from_start.serialize(writer)?;
        self.to_end.serialize(writer)?;
        Ok(())
    }

    fn load<T: io::Read>(reader: &mut T, entity_count: usize, node_count: usize) -> io::Result<EntityVector> {
        let entities = IntVector::load(reader)?;
        let mut nodes = BitVector::load(reader)?;
        let from_start = SparseVector::load(reader)?;
        let to_end = SparseVector::load(reader)?;
        if entities.len() != entity_count || nodes.len() != entity_count {
            return Err(Error::new(ErrorKind::InvalidData, "Graph: Entity vector length mismatch"));
        }
        if nodes.count_ones() != node_count {
            return Err(Error::new(ErrorKind::InvalidData, "Graph: Entity vector node count mismatch"));
        }
        if from_start.len() != entity_count || to_end.len() != entity_count {
            return Err(Error::new(ErrorKind::InvalidData, "Graph: Side bitmap length mismatch"));
        }
        nodes.enable_rank();
        nodes.enable_select();
        Ok(EntityVector {
            entities: entities,
            nodes: nodes,
            from_start: from_start,
            to_end: to_end,
        })
    }

    fn size_in_elements(&self) -> usize {
        self.entities.size_in_elements() + self.nodes.size_in_elements()
            + self.from_start.size_in_elements() + self.to_end.size_in_elements()
    }
}

//-----------------------------------------------------------------------------

/// The succinct bidirected sequence graph.
///
/// The graph maps arbitrary (possibly discontiguous) signed node ids to a
/// dense 1-based rank space and stores node labels, edges between node sides,
/// and the shared node/edge entity numbering. It is built by
/// [`crate::GraphBuilder`] and immutable afterwards.
///
/// Ranks are 1-based; rank 0 is reserved. Most queries take node ids; looking
/// up an id that is not in the graph may panic or return unpredictable
/// results, which callers can avoid with [`Graph::has_node`].
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
///
/// let mut builder = GraphBuilder::new(BuildParameters::default());
/// builder.add_chunk(&chunk);
/// let index = builder.finish().unwrap();
/// let graph = index.graph();
///
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.node_sequence(1), b"ACG");
/// assert_eq!(graph.pos_char(1, Orientation::Reverse, 0), b'C');
/// assert!(graph.has_edge(1, false, 2, false));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Graph {
    node_count: usize,
    edge_count: usize,
    min_id: i64,
    max_id: i64,
    // Node ids in rank order.
    ids: IntVector,
    // Dense map from id - min_id to rank; 0 marks an unused id.
    ranks: IntVector,
    // Concatenated node labels as 3-bit codes.
    sequence: IntVector,
    // Marks the first base of each node.
    node_starts: BitVector,
    forward: EntityVector,
    reverse: EntityVector,
}

/// Statistics and the id space.
impl Graph {
    /// Returns the number of nodes in the graph.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Returns the number of edges in the graph.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Returns the number of entities (nodes and edges).
    #[inline]
    pub fn entity_count(&self) -> usize {
        self.node_count + self.edge_count
    }

    /// Returns the total length of the node labels in base pairs.
    #[inline]
    pub fn sequence_len(&self) -> usize {
        self.sequence.len()
    }

    /// Returns `true` if the graph has no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.node_count == 0
    }

    /// Returns the smallest node id in the graph.
    #[inline]
    pub fn min_node_id(&self) -> i64 {
        self.min_id
    }

    /// Returns the largest node id in the graph.
    #[inline]
    pub fn max_node_id(&self) -> i64 {
        self.max_id
    }

    /// Returns the largest node rank. Ranks `1..=max_node_rank()` are valid.
    #[inline]
    pub fn max_node_rank(&self) -> usize {
        self.node_count
    }

    /// Returns `true` if the graph contains a node with the given id.
    pub fn has_node(&self, id: i64) -> bool {
        id >= self.min_id && id <= self.max_id && self.ranks.get((id - self.min_id) as usize) != 0
    }

    /// Returns the rank of the node with the given id.
    ///
    /// The result is unspecified if there is no such node.
    #[inline]
    pub fn id_to_rank(&self, id: i64) -> usize {
        self.ranks.get((id - self.min_id) as usize) as usize
    }

    /// Returns the id of the node with the given rank.
    ///
    /// # Panics
    ///
    /// Panics if `rank` is 0 or past the number of nodes.
    pub fn rank_to_id(&self, rank: usize) -> i64 {
        assert!(rank > 0 && rank <= self.node_count,
            "Graph: No node with rank {} (node count {})", rank, self.node_count);
        self.ids.get(rank - 1) as i64
    }
}

/// Sequence queries.
impl Graph {
    // The range of the node's label in the sequence vector.
    fn node_range(&self, rank: usize) -> Range<usize> {
        let start = self.node_starts.select(rank - 1).unwrap();
        let limit = if rank == self.node_count {
            self.sequence.len()
        } else {
            self.node_starts.select(rank).unwrap()
        };
        start..limit
    }

    /// Returns the starting position of the node's label in the concatenated
    /// sequence.
    pub fn node_start(&self, id: i64) -> usize {
        self.node_starts.select(self.id_to_rank(id) - 1).unwrap()
    }

    /// Returns the length of the node's label.
    pub fn node_length(&self, id: i64) -> usize {
        self.node_range(self.id_to_rank(id)).len()
    }

    /// Returns the label of the node.
    pub fn node_sequence(&self, id: i64) -> Vec<u8> {
        let range = self.node_range(self.id_to_rank(id));
        range.map(|i| support::decode_base(self.sequence.get(i))).collect()
    }

    /// Returns the id of the node whose label covers the given position of
    /// the concatenated sequence.
    ///
    /// # Panics
    ///
    /// Panics if `pos >= self.sequence_len()`.
    pub fn node_at_seq_pos(&self, pos: usize) -> i64 {
        assert!(pos < self.sequence.len(), "Graph: Sequence position {} out of range", pos);
        self.rank_to_id(self.node_starts.rank(pos + 1))
    }

    /// Returns the base at the given offset of the oriented node.
    ///
    /// Offsets are 0-based along the chosen strand; the reverse strand reads
    /// complemented bases from the end of the label.
    ///
    /// # Panics
    ///
    /// Panics if the offset is past the end of the label.
    pub fn pos_char(&self, id: i64, orientation: Orientation, offset: usize) -> u8 {
        let range = self.node_range(self.id_to_rank(id));
        assert!(offset < range.len(), "Graph: Offset {} out of range for node {}", offset, id);
        match orientation {
            Orientation::Forward => support::decode_base(self.sequence.get(range.start + offset)),
            Orientation::Reverse => {
                support::complement(support::decode_base(self.sequence.get(range.end - offset - 1)))
            }
        }
    }

    /// Returns a substring of the oriented node label.
    ///
    /// The substring starts at the given 0-based offset along the chosen
    /// strand and contains at most `len` bases; `len == 0` means until the
    /// end of the node. The reverse strand yields reverse complemented bases.
    ///
    /// # Panics
    ///
    /// Panics if the offset is past the end of the label.
    pub fn pos_substr(&self, id: i64, orientation: Orientation, offset: usize, len: usize) -> Vec<u8> {
        let range = self.node_range(self.id_to_rank(id));
        assert!(offset <= range.len(), "Graph: Offset {} out of range for node {}", offset, id);
        match orientation {
            Orientation::Forward => {
                let start = range.start + offset;
                let limit = if len == 0 { range.end } else { (start + len).min(range.end) };
                (start..limit).map(|i| support::decode_base(self.sequence.get(i))).collect()
            }
            Orientation::Reverse => {
                let limit = range.end - offset;
                let start = if len == 0 { range.start } else { limit.saturating_sub(len).max(range.start) };
                (start..limit).rev()
                    .map(|i| support::complement(support::decode_base(self.sequence.get(i))))
                    .collect()
            }
        }
    }
}

/// Topology queries.
impl Graph {
    /// Returns the edges leaving the node, as articulated from it.
    pub fn edges_from(&self, id: i64) -> Vec<Edge> {
        let rank = self.id_to_rank(id);
        let mut result = Vec::new();
        for slot in self.forward.edge_slots(rank) {
            result.push(Edge::new(
                id,
                self.forward.from_start.get(slot),
                self.rank_to_id(self.forward.target(slot)),
                self.forward.to_end.get(slot),
            ));
        }
        result
    }

    /// Returns the edges entering the node, as articulated toward it.
    pub fn edges_to(&self, id: i64) -> Vec<Edge> {
        let rank = self.id_to_rank(id);
        let mut result = Vec::new();
        for slot in self.reverse.edge_slots(rank) {
            result.push(Edge::new(
                self.rank_to_id(self.reverse.target(slot)),
                self.reverse.from_start.get(slot),
                id,
                self.reverse.to_end.get(slot),
            ));
        }
        result
    }

    /// Returns all edges of the node, without structural duplicates.
    ///
    /// Incoming edges come first, as in [`Graph::edges_to`], then the
    /// outgoing ones. Both records of a self-loop are reported once.
    pub fn edges_of(&self, id: i64) -> Vec<Edge> {
        let mut result = self.edges_to(id);
        for edge in self.edges_from(id) {
            if !result.contains(&edge) {
                result.push(edge);
            }
        }
        result
    }

    /// Returns the edges that attach to the start side of the node.
    pub fn edges_on_start(&self, id: i64) -> Vec<Edge> {
        self.edges_of(id).into_iter()
            .filter(|edge| (edge.to == id && !edge.to_end) || (edge.from == id && edge.from_start))
            .collect()
    }

    /// Returns the edges that attach to the end side of the node.
    pub fn edges_on_end(&self, id: i64) -> Vec<Edge> {
        self.edges_of(id).into_iter()
            .filter(|edge| (edge.to == id && edge.to_end) || (edge.from == id && !edge.from_start))
            .collect()
    }

    /// Returns `true` if the graph contains the edge in exactly this
    /// articulation.
    ///
    /// Use [`Edge::reverse`] or [`Graph::edge_rank_as_entity`] to also accept
    /// the opposite articulation.
    pub fn has_edge(&self, from: i64, from_start: bool, to: i64, to_end: bool) -> bool {
        self.stored_edge_rank(from, from_start, to, to_end).is_some()
    }

    // The entity rank of the edge as articulated, or None.
    fn stored_edge_rank(&self, from: i64, from_start: bool, to: i64, to_end: bool) -> Option<usize> {
        if !self.has_node(from) || !self.has_node(to) {
            return None;
        }
        let target = self.id_to_rank(to);
        for slot in self.forward.edge_slots(self.id_to_rank(from)) {
            if self.forward.target(slot) == target
                && self.forward.from_start.get(slot) == from_start
                && self.forward.to_end.get(slot) == to_end
            {
                return Some(slot + 1);
            }
        }
        None
    }

    /// Returns the entity rank of the edge, accepting either articulation,
    /// or [`None`] if the graph does not contain the edge.
    pub fn edge_rank_as_entity(&self, edge: &Edge) -> Option<usize> {
        if let Some(rank) = self.stored_edge_rank(edge.from, edge.from_start, edge.to, edge.to_end) {
            return Some(rank);
        }
        let flipped = edge.reverse();
        self.stored_edge_rank(flipped.from, flipped.from_start, flipped.to, flipped.to_end)
    }

    /// Returns the edge as articulated in the graph.
    ///
    /// The result is the edge itself if it is stored in this articulation and
    /// the opposite articulation otherwise. The edge is not required to exist.
    pub fn canonicalize(&self, edge: &Edge) -> Edge {
        if self.has_edge(edge.from, edge.from_start, edge.to, edge.to_end) {
            *edge
        } else {
            edge.reverse()
        }
    }

    /// Returns the entity rank of the node.
    pub fn node_rank_as_entity(&self, id: i64) -> usize {
        self.forward.header_slot(self.id_to_rank(id)) + 1
    }

    /// Returns `true` if the entity with the given rank is a node.
    ///
    /// # Panics
    ///
    /// May panic if `rank` is 0 or past the number of entities.
    pub fn entity_is_node(&self, rank: usize) -> bool {
        self.forward.nodes.get(rank - 1)
    }

    /// Returns the node rank of the entity, or [`None`] if the entity is an
    /// edge.
    pub fn entity_as_node_rank(&self, rank: usize) -> Option<usize> {
        if self.entity_is_node(rank) {
            Some(self.forward.target(rank - 1))
        } else {
            None
        }
    }
}

/// Construction and serialization.
impl Graph {
    pub(crate) fn new(
        labels: &BTreeMap<i64, Vec<u8>>,
        from_to: &BTreeMap<(i64, bool), BTreeSet<(i64, bool)>>,
        to_from: &BTreeMap<(i64, bool), BTreeSet<(i64, bool)>>,
        edge_count: usize,
    ) -> Graph {
        let node_count = labels.len();
        let entity_count = node_count + edge_count;
        let (min_id, max_id) = match (labels.keys().next(), labels.keys().next_back()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => (0, -1),
        };
        let id_span = (max_id - min_id + 1).max(0) as usize;
        let seq_len: usize = labels.values().map(|label| label.len()).sum();

        // Id space and the sequence.
        let id_width = if min_id < 0 { 64 } else { bits::bit_len(max_id.max(0) as u64) };
        let mut ids = IntVector::with_capacity(node_count, id_width).unwrap();
        let mut rank_values: Vec<u64> = vec![0; id_span];
        let mut rank_of: BTreeMap<i64, usize> = BTreeMap::new();
        let mut sequence = IntVector::with_capacity(seq_len, support::BASE_WIDTH).unwrap();
        let mut starts = RawVector::with_len(seq_len, false);
        let mut order: Vec<i64> = Vec::with_capacity(node_count);
        let mut offset = 0;
        for (rank, (id, label)) in labels.iter().enumerate() {
            ids.push(*id as u64);
            rank_values[(*id - min_id) as usize] = (rank + 1) as u64;
            rank_of.insert(*id, rank + 1);
            order.push(*id);
            starts.set_bit(offset, true);
            for c in label.iter() {
                sequence.push(support::encode_base(*c));
                offset += 1;
            }
        }
        let mut ranks = IntVector::with_capacity(id_span, bits::bit_len(node_count as u64)).unwrap();
        for value in rank_values {
            ranks.push(value);
        }
        let mut node_starts = BitVector::from(starts);
        node_starts.enable_rank();
        node_starts.enable_select();

        let forward = EntityVector::new(&order, &rank_of, from_to, entity_count, true);
        let reverse = EntityVector::new(&order, &rank_of, to_from, entity_count, false);

        Graph {
            node_count: node_count,
            edge_count: edge_count,
            min_id: min_id,
            max_id: max_id,
            ids: ids,
            ranks: ranks,
            sequence: sequence,
            node_starts: node_starts,
            forward: forward,
            reverse: reverse,
        }
    }

    pub(crate) fn serialize<T: io::Write>(&self, writer: &mut T) -> io::Result<()> {
        self.ids.serialize(writer)?;
        self.ranks.serialize(writer)?;
        self.sequence.serialize(writer)?;
        self.node_starts.serialize(writer)?;
        self.forward.serialize(writer)?;
        self.reverse.serialize(writer)?;
        Ok(())
    }

    pub(crate) fn load<T: io::Read>(reader: &mut T, header: &IndexHeader) -> io::Result<Graph> {
        let entity_count = header.node_count + header.edge_count;
        let ids = IntVector::load(reader)?;
        if ids.len() != header.node_count {
            return Err(Error::new(ErrorKind::InvalidData, "Graph: Node id vector length mismatch"));
        }
        let ranks = IntVector::load(reader)?;
        let id_span = (header.max_id - header.min_id + 1).max(0) as usize;
        if ranks.len() != id_span {
            return Err(Error::new(ErrorKind::InvalidData, "Graph: Rank vector does not match the id range"));
        }
        let sequence = IntVector::load(reader)?;
        if sequence.len() != header.sequence_len {
            return Err(Error::new(ErrorKind::InvalidData, "Graph: Sequence length mismatch"));
        }
        let mut node_starts = BitVector::load(reader)?;
        if node_starts.len() != sequence.len() {
            return Err(Error::new(ErrorKind::InvalidData, "Graph: Node start bitmap length mismatch"));
        }
        node_starts.enable_rank();
        node_starts.enable_select();
        let forward = EntityVector::load(reader, entity_count, header.node_count)?;
        let reverse = EntityVector::load(reader, entity_count, header.node_count)?;
        Ok(Graph {
            node_count: header.node_count,
            edge_count: header.edge_count,
            min_id: header.min_id,
            max_id: header.max_id,
            ids: ids,
            ranks: ranks,
            sequence: sequence,
            node_starts: node_starts,
            forward: forward,
            reverse: reverse,
        })
    }

    pub(crate) fn size_in_elements(&self) -> usize {
        self.ids.size_in_elements() + self.ranks.size_in_elements()
            + self.sequence.size_in_elements() + self.node_starts.size_in_elements()
            + self.forward.size_in_elements() + self.reverse.size_in_elements()
    }
}

//-----------------------------------------------------------------------------
