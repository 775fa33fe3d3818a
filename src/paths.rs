//! Named paths over the graph.
//!
//! A path is a name and an ordered sequence of node visits. [`PathStore`]
//! keeps one [`IndexedPath`] per path plus the shared name store: the names
//! are concatenated as `#name$` markers into a byte vector indexed by a
//! [`NameCsa`], so looking up a path by name is a single exact-string query.
//! An inverted index maps every graph entity to the ranks of the paths that
//! contain it.
//!
//! Path ranks are 1-based; rank 0 means "no such path".

use crate::graph::{Edge, Graph};
use crate::support::{NameCsa, Orientation, WaveletTree};

use simple_sds::bit_vector::BitVector;
use simple_sds::int_vector::IntVector;
use simple_sds::ops::{Access, BitVec, Push, Rank, Select, Vector};
use simple_sds::raw_vector::{AccessRaw, RawVector};
use simple_sds::serialize::Serialize;
use simple_sds::sparse_vector::{SparseBuilder, SparseVector};
use simple_sds::bits;

use std::collections::BTreeMap;
use std::io::{Error, ErrorKind};
use std::io;

#[cfg(test)]
mod tests;

//-----------------------------------------------------------------------------

/// Marker preceding every name in the concatenated name store.
pub const START_MARKER: u8 = b'#';

/// Marker following every name in the concatenated name store.
pub const END_MARKER: u8 = b'$';

//-----------------------------------------------------------------------------

/// One visit of a path to a node.
///
/// The external rank orders the visits within the path and is preserved
/// verbatim from the input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Traversal {
    /// Id of the visited node.
    pub id: i64,
    /// Strand of the visit.
    pub orientation: Orientation,
    /// External rank of the visit within its path.
    pub rank: usize,
}

impl Traversal {
    /// Creates a traversal from its fields.
    pub fn new(id: i64, orientation: Orientation, rank: usize) -> Traversal {
        Traversal {
            id: id,
            orientation: orientation,
            rank: rank,
        }
    }
}

//-----------------------------------------------------------------------------

/// The succinct encoding of a single path.
///
/// Every vector is indexed by the visit number within the path, except for
/// `members` (indexed by entity rank - 1) and `offsets` (indexed by the
/// base-pair offset on the path).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexedPath {
    // Entities (nodes and edges) on the path.
    members: SparseVector,
    // Visited node ids in visit order.
    ids: WaveletTree,
    // Marks the visits that traverse their node in reverse.
    directions: SparseVector,
    // External rank of each visit.
    ranks: IntVector,
    // Starting offset of each visit on the path, in base pairs.
    positions: IntVector,
    // Marks the first base of each visit along the path.
    offsets: BitVector,
}

impl IndexedPath {
    // Builds the encoding for one path. The traversals must already be
    // sorted by external rank with duplicate ranks removed. A traversal over
    // an edge the graph does not have leaves the member bit unset with a
    // warning.
    fn new(name: &str, traversals: &[Traversal], graph: &Graph) -> IndexedPath {
        let mut members = RawVector::with_len(graph.entity_count(), false);
        let mut ids: Vec<u64> = Vec::with_capacity(traversals.len());
        let mut reverse_visits: Vec<usize> = Vec::new();
        let mut ranks = IntVector::with_capacity(
            traversals.len(),
            bits::bit_len(traversals.iter().map(|t| t.rank as u64).max().unwrap_or(0)),
        ).unwrap();

        let path_len: usize = traversals.iter().map(|t| graph.node_length(t.id)).sum();
        let mut positions = IntVector::with_capacity(traversals.len(), bits::bit_len(path_len as u64)).unwrap();
        let mut offsets = RawVector::with_len(path_len, false);

        let mut path_offset = 0;
        for (i, traversal) in traversals.iter().enumerate() {
            members.set_bit(graph.node_rank_as_entity(traversal.id) - 1, true);
            if traversal.orientation.is_reverse() {
                reverse_visits.push(i);
            }
            ids.push(traversal.id as u64);
            ranks.push(traversal.rank as u64);
            positions.push(path_offset as u64);
            offsets.set_bit(path_offset, true);
            path_offset += graph.node_length(traversal.id);

            if i + 1 < traversals.len() {
                let next = &traversals[i + 1];
                if let Some(entity) = Self::step_edge(graph, traversal, next) {
                    members.set_bit(entity - 1, true);
                } else {
                    eprintln!(
                        "[sgindex] warning: path {} steps over a missing edge from {}{} to {}{}",
                        name,
                        traversal.id, if traversal.orientation.is_reverse() { "-" } else { "+" },
                        next.id, if next.orientation.is_reverse() { "-" } else { "+" },
                    );
                }
            }
        }

        let mut member_positions: Vec<usize> = Vec::new();
        for i in 0..members.len() {
            if members.bit(i) {
                member_positions.push(i);
            }
        }

        let mut offset_bits = BitVector::from(offsets);
        offset_bits.enable_rank();
        offset_bits.enable_select();

        IndexedPath {
            members: Self::sparse(graph.entity_count(), &member_positions),
            ids: WaveletTree::from(ids),
            directions: Self::sparse(traversals.len(), &reverse_visits),
            ranks: ranks,
            positions: positions,
            offsets: offset_bits,
        }
    }

    // The entity rank of the canonical edge between two consecutive visits,
    // if the graph has it.
    fn step_edge(graph: &Graph, from: &Traversal, to: &Traversal) -> Option<usize> {
        // A step through both nodes in reverse uses the edge articulated
        // forward between the flipped endpoints.
        let edge = if from.orientation.is_reverse() && to.orientation.is_reverse() {
            Edge::new(to.id, false, from.id, false)
        } else {
            Edge::new(from.id, from.orientation.is_reverse(), to.id, to.orientation.is_reverse())
        };
        graph.edge_rank_as_entity(&edge)
    }

    fn sparse(universe: usize, positions: &[usize]) -> SparseVector {
        let mut builder = SparseBuilder::new(universe, positions.len()).unwrap();
        for pos in positions.iter() {
            unsafe { builder.set_unchecked(*pos); }
        }
        SparseVector::try_from(builder).unwrap()
    }

    /// Returns the number of visits on the path.
    #[inline]
    pub fn visit_count(&self) -> usize {
        self.ids.len()
    }

    /// Returns the length of the path in base pairs.
    #[inline]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Returns `true` if the path has no visits.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.visit_count() == 0
    }

    /// Returns `true` if the entity with the given rank is on the path.
    #[inline]
    pub fn contains_entity(&self, entity_rank: usize) -> bool {
        self.members.get(entity_rank - 1)
    }

    /// Returns the visit with the given index.
    ///
    /// # Panics
    ///
    /// May panic if `visit >= self.visit_count()`.
    pub fn traversal(&self, visit: usize) -> Traversal {
        Traversal {
            id: self.ids.get(visit) as i64,
            orientation: Orientation::from_is_reverse(self.directions.get(visit)),
            rank: self.ranks.get(visit) as usize,
        }
    }

    /// Returns the starting offset of the visit on the path, in base pairs.
    #[inline]
    pub fn position(&self, visit: usize) -> usize {
        self.positions.get(visit) as usize
    }

    /// Returns the index of the visit covering the given base-pair offset.
    ///
    /// # Panics
    ///
    /// Panics if `offset >= self.len()`.
    pub fn visit_at(&self, offset: usize) -> usize {
        assert!(offset < self.len(), "IndexedPath: Offset {} past the path end", offset);
        self.offsets.rank(offset + 1) - 1
    }

    // Number of members strictly before the given 0-based entity slot.
    fn members_before(&self, slot: usize) -> usize {
        self.members.rank(slot)
    }

    // The 0-based entity slot of the member with the given 0-based rank.
    fn member_slot(&self, rank: usize) -> Option<usize> {
        self.members.select(rank)
    }
}

impl Serialize for IndexedPath {
    fn serialize_header<T: io::Write>(&self, _: &mut T) -> io::Result<()> {
        Ok(())
    }

    fn serialize_body<T: io::Write>(&self, writer: &mut T) -> io::Result<()> {
        self.members.serialize(writer)?;
        self.ids.serialize(writer)?;
        self.directions.serialize(writer)?;
        self.ranks.serialize(writer)?;
        self.positions.serialize(writer)?;
        self.offsets.serialize(writer)?;
        Ok(())
    }

    fn load<T: io::Read>(reader: &mut T) -> io::Result<Self> {
        let members = SparseVector::load(reader)?;
        let ids = WaveletTree::load(reader)?;
        let directions = SparseVector::load(reader)?;
        let ranks = IntVector::load(reader)?;
        let positions = IntVector::load(reader)?;
        let mut offsets = BitVector::load(reader)?;
        if ids.len() != directions.len() || ids.len() != ranks.len() || ids.len() != positions.len() {
            return Err(Error::new(ErrorKind::InvalidData, "IndexedPath: Visit vector length mismatch"));
        }
        if offsets.count_ones() != ids.len() {
            return Err(Error::new(ErrorKind::InvalidData, "IndexedPath: Offset bitmap does not match the visits"));
        }
        offsets.enable_rank();
        offsets.enable_select();
        Ok(IndexedPath {
            members: members,
            ids: ids,
            directions: directions,
            ranks: ranks,
            positions: positions,
            offsets: offsets,
        })
    }

    fn size_in_elements(&self) -> usize {
        self.members.size_in_elements() + self.ids.size_in_elements()
            + self.directions.size_in_elements() + self.ranks.size_in_elements()
            + self.positions.size_in_elements() + self.offsets.size_in_elements()
    }
}

//-----------------------------------------------------------------------------

/// The collection of all paths in the index.
///
/// Paths are looked up by rank (1-based, in lexicographic name order) or by
/// name through the full-text index over the `#name$` store.
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
/// chunk.add_path("chr", &[(1, Orientation::Forward), (2, Orientation::Forward)]);
///
/// let mut builder = GraphBuilder::new(BuildParameters::default());
/// builder.add_chunk(&chunk);
/// let index = builder.finish().unwrap();
///
/// let rank = index.paths().path_rank("chr");
/// assert_eq!(rank, 1);
/// assert_eq!(index.paths().path_name(rank), b"chr");
/// assert_eq!(index.paths().path_length(rank), 6);
/// assert_eq!(index.paths().node_at_path_position(rank, 4), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathStore {
    // The concatenated `#name$` store.
    names: Vec<u8>,
    // Full-text index over the store.
    name_index: NameCsa,
    // Marks the start marker of each name.
    name_starts: BitVector,
    paths: Vec<IndexedPath>,
    // For each entity, a 0 placeholder followed by the ranks of the paths
    // containing it.
    entity_paths: IntVector,
    // Marks the placeholder of each entity in `entity_paths`.
    entity_path_starts: BitVector,
}

/// Name lookups.
impl PathStore {
    /// Returns the number of paths.
    #[inline]
    pub fn path_count(&self) -> usize {
        self.paths.len()
    }

    /// Returns the largest path rank. Ranks `1..=max_path_rank()` are valid.
    #[inline]
    pub fn max_path_rank(&self) -> usize {
        self.paths.len()
    }

    /// Returns the rank of the path with the given name, or 0 if there is no
    /// such path.
    ///
    /// # Panics
    ///
    /// Panics if the name store matches the name more than once; this means
    /// the store is corrupt.
    pub fn path_rank<T: AsRef<[u8]>>(&self, name: T) -> usize {
        let mut query = Vec::with_capacity(name.as_ref().len() + 2);
        query.push(START_MARKER);
        query.extend_from_slice(name.as_ref());
        query.push(END_MARKER);
        let occurrences = self.name_index.locate(&query);
        match occurrences.len() {
            0 => 0,
            1 => self.name_starts.rank(occurrences[0]) + 1,
            _ => panic!(
                "PathStore: {} hits for path name {}",
                occurrences.len(), String::from_utf8_lossy(name.as_ref())
            ),
        }
    }

    /// Returns the name of the path with the given rank.
    ///
    /// # Panics
    ///
    /// Panics if there is no such path.
    pub fn path_name(&self, rank: usize) -> &[u8] {
        assert!(rank > 0 && rank <= self.paths.len(),
            "PathStore: No path with rank {} (path count {})", rank, self.paths.len());
        let start = self.name_starts.select(rank - 1).unwrap() + 1;
        let limit = if rank == self.paths.len() {
            self.names.len()
        } else {
            self.name_starts.select(rank).unwrap()
        };
        &self.names[start..limit - 1]
    }

    /// Returns the indexed path with the given rank.
    ///
    /// # Panics
    ///
    /// Panics if there is no such path.
    pub fn indexed_path(&self, rank: usize) -> &IndexedPath {
        assert!(rank > 0 && rank <= self.paths.len(),
            "PathStore: No path with rank {} (path count {})", rank, self.paths.len());
        &self.paths[rank - 1]
    }

    /// Returns the ordered traversals of the path with the given rank.
    ///
    /// # Panics
    ///
    /// Panics if there is no such path.
    pub fn path(&self, rank: usize) -> Vec<Traversal> {
        let path = self.indexed_path(rank);
        (0..path.visit_count()).map(|i| path.traversal(i)).collect()
    }

    /// Returns the length of the path in base pairs.
    ///
    /// # Panics
    ///
    /// Panics if there is no such path.
    pub fn path_length(&self, rank: usize) -> usize {
        self.indexed_path(rank).len()
    }
}

/// Membership.
impl PathStore {
    /// Returns `true` if the path contains the entity with the given rank.
    ///
    /// # Panics
    ///
    /// Panics if there is no such path.
    pub fn path_contains_entity(&self, path_rank: usize, entity_rank: usize) -> bool {
        self.indexed_path(path_rank).contains_entity(entity_rank)
    }

    /// Returns `true` if the path contains the node.
    pub fn path_contains_node(&self, graph: &Graph, path_rank: usize, id: i64) -> bool {
        self.path_contains_entity(path_rank, graph.node_rank_as_entity(id))
    }

    /// Returns `true` if the path contains the edge, in either articulation.
    ///
    /// An edge the graph does not have is on no path.
    pub fn path_contains_edge(&self, graph: &Graph, path_rank: usize, edge: &Edge) -> bool {
        match graph.edge_rank_as_entity(edge) {
            Some(entity) => self.path_contains_entity(path_rank, entity),
            None => false,
        }
    }

    /// Returns the ranks of the paths containing the entity.
    pub fn paths_of_entity(&self, entity_rank: usize) -> Vec<usize> {
        let mut offset = self.entity_path_starts.select(entity_rank - 1).unwrap() + 1;
        let mut result = Vec::new();
        while offset < self.entity_path_starts.len() && !self.entity_path_starts.get(offset) {
            result.push(self.entity_paths.get(offset) as usize);
            offset += 1;
        }
        result
    }

    /// Returns the ranks of the paths containing the node.
    pub fn paths_of_node(&self, graph: &Graph, id: i64) -> Vec<usize> {
        self.paths_of_entity(graph.node_rank_as_entity(id))
    }

    /// Returns the ranks of the paths containing the edge, in either
    /// articulation. An edge the graph does not have is on no path.
    pub fn paths_of_edge(&self, graph: &Graph, edge: &Edge) -> Vec<usize> {
        match graph.edge_rank_as_entity(edge) {
            Some(entity) => self.paths_of_entity(entity),
            None => Vec::new(),
        }
    }
}

/// Positional queries.
impl PathStore {
    /// Returns the number of visits of the path to the node.
    pub fn node_occs_in_path(&self, id: i64, path_rank: usize) -> usize {
        self.indexed_path(path_rank).ids.count(id as u64)
    }

    /// Returns the visit indexes of the path at the node.
    pub fn node_visits_in_path(&self, id: i64, path_rank: usize) -> Vec<usize> {
        let path = self.indexed_path(path_rank);
        (0..path.ids.count(id as u64))
            .map(|occurrence| path.ids.select(occurrence, id as u64).unwrap())
            .collect()
    }

    /// Returns the base-pair offsets of the path visits to the node.
    pub fn node_positions_in_path(&self, id: i64, path_rank: usize) -> Vec<usize> {
        let path = self.indexed_path(path_rank);
        self.node_visits_in_path(id, path_rank).into_iter()
            .map(|visit| path.position(visit))
            .collect()
    }

    /// Returns the base-pair offsets of the node on every path containing it,
    /// keyed by path name.
    pub fn node_positions_in_paths(&self, graph: &Graph, id: i64) -> BTreeMap<String, Vec<usize>> {
        let mut result = BTreeMap::new();
        for path_rank in self.paths_of_node(graph, id) {
            let name = String::from_utf8_lossy(self.path_name(path_rank)).into_owned();
            result.insert(name, self.node_positions_in_path(id, path_rank));
        }
        result
    }

    /// Returns the traversals of the node on every path containing it, keyed
    /// by path name.
    pub fn node_mappings(&self, graph: &Graph, id: i64) -> BTreeMap<String, Vec<Traversal>> {
        let mut result = BTreeMap::new();
        for path_rank in self.paths_of_node(graph, id) {
            let path = self.indexed_path(path_rank);
            let name = String::from_utf8_lossy(self.path_name(path_rank)).into_owned();
            let mappings = self.node_visits_in_path(id, path_rank).into_iter()
                .map(|visit| path.traversal(visit))
                .collect();
            result.insert(name, mappings);
        }
        result
    }

    /// Returns the id of the node covering the given base-pair offset of the
    /// path.
    ///
    /// # Panics
    ///
    /// Panics if there is no such path or the offset is past its end.
    pub fn node_at_path_position(&self, path_rank: usize, offset: usize) -> i64 {
        let path = self.indexed_path(path_rank);
        path.ids.get(path.visit_at(offset)) as i64
    }

    /// Returns the traversal covering the given base-pair offset of the path.
    ///
    /// # Panics
    ///
    /// Panics if there is no such path or the offset is past its end.
    pub fn mapping_at_path_position(&self, path_rank: usize, offset: usize) -> Traversal {
        let path = self.indexed_path(path_rank);
        path.traversal(path.visit_at(offset))
    }
}

/// Distance estimation.
impl PathStore {
    /// Returns the node itself if it is on the path, and otherwise the next
    /// node in id space that is, or [`None`] at the end of the path.
    pub fn next_path_node_by_id(&self, graph: &Graph, path_rank: usize, id: i64) -> Option<i64> {
        let path = self.indexed_path(path_rank);
        let entity_slot = graph.node_rank_as_entity(id) - 1;
        if path.members.get(entity_slot) {
            return Some(id);
        }
        let slot = path.member_slot(path.members_before(entity_slot))?;
        // The first member after a non-member node is always a node header.
        let node_rank = graph.entity_as_node_rank(slot + 1)
            .expect("PathStore: Path member after a node is not a node");
        Some(graph.rank_to_id(node_rank))
    }

    /// Returns the node itself if it is on the path, and otherwise the
    /// previous node in id space that is, or [`None`] at the start of the
    /// path.
    pub fn prev_path_node_by_id(&self, graph: &Graph, path_rank: usize, id: i64) -> Option<i64> {
        let path = self.indexed_path(path_rank);
        let entity_slot = graph.node_rank_as_entity(id) - 1;
        if path.members.get(entity_slot) {
            return Some(id);
        }
        let before = path.members_before(entity_slot);
        if before == 0 {
            return None;
        }
        let mut slot = path.member_slot(before - 1)?;
        // The previous member may be an edge; back up to its node header.
        while !graph.entity_is_node(slot + 1) {
            slot -= 1;
        }
        let node_rank = graph.entity_as_node_rank(slot + 1).unwrap();
        Some(graph.rank_to_id(node_rank))
    }

    /// Estimates the distance in base pairs between two nodes along the path.
    ///
    /// A node that is not on the path is replaced by the nearest node in id
    /// space that is, so the estimate may be inexact. Returns -1 if there is
    /// no usable anchor on the path or no path with the given name.
    pub fn approx_path_distance<T: AsRef<[u8]>>(&self, graph: &Graph, name: T, id1: i64, id2: i64) -> i64 {
        let path_rank = self.path_rank(name);
        if path_rank == 0 {
            return -1;
        }
        let (left, right) = if id1 <= id2 { (id1, id2) } else { (id2, id1) };
        let next = match self.next_path_node_by_id(graph, path_rank, left) {
            Some(id) => id,
            None => return -1,
        };
        let prev = match self.prev_path_node_by_id(graph, path_rank, right) {
            Some(id) => id,
            None => return -1,
        };

        // Rightmost position of the left anchor, leftmost of the right one.
        let positions1 = self.node_positions_in_path(next, path_rank);
        let positions2 = self.node_positions_in_path(prev, path_rank);
        let mut pos1 = *positions1.last().unwrap() as i64;
        let pos2 = positions2[0] as i64;
        if next == left {
            pos1 += graph.node_length(next) as i64;
        }
        (pos2 - pos1).abs()
    }

    /// Returns the minimum approximate distance between two nodes over the
    /// named paths, or over all paths if `names` is empty.
    ///
    /// Paths that contain both nodes are preferred over paths that contain
    /// one, and those over paths that contain neither; the minimum is taken
    /// within the best non-empty tier. Returns -1 if no path gives a
    /// distance.
    pub fn min_approx_path_distance<T: AsRef<[u8]>>(&self, graph: &Graph, names: &[T], id1: i64, id2: i64) -> i64 {
        let ranks: Vec<usize> = if names.is_empty() {
            (1..=self.max_path_rank()).collect()
        } else {
            names.iter().map(|name| self.path_rank(name)).filter(|rank| *rank > 0).collect()
        };

        // One minimum per tier: both nodes on the path, one, neither.
        let mut tiers: [Option<i64>; 3] = [None; 3];
        for path_rank in ranks {
            let members = self.path_contains_node(graph, path_rank, id1) as usize
                + self.path_contains_node(graph, path_rank, id2) as usize;
            let name = self.path_name(path_rank).to_vec();
            let distance = self.approx_path_distance(graph, &name, id1, id2);
            if distance < 0 {
                continue;
            }
            if tiers[members].map_or(true, |best| distance < best) {
                tiers[members] = Some(distance);
            }
        }
        for tier in tiers.iter().rev() {
            if let Some(distance) = tier {
                return *distance;
            }
        }
        -1
    }
}

/// Construction and serialization.
impl PathStore {
    pub(crate) fn new(graph: &Graph, traversals: &BTreeMap<String, Vec<Traversal>>) -> PathStore {
        let mut names: Vec<u8> = Vec::new();
        let mut paths: Vec<IndexedPath> = Vec::with_capacity(traversals.len());
        for (name, path) in traversals.iter() {
            names.push(START_MARKER);
            names.extend_from_slice(name.as_bytes());
            names.push(END_MARKER);
            paths.push(IndexedPath::new(name, path, graph));
        }

        let mut starts = RawVector::with_len(names.len(), false);
        for (i, c) in names.iter().enumerate() {
            if *c == START_MARKER {
                starts.set_bit(i, true);
            }
        }
        let mut name_starts = BitVector::from(starts);
        name_starts.enable_rank();
        name_starts.enable_select();
        let name_index = NameCsa::new(&names);

        let (entity_paths, entity_path_starts) = Self::invert_membership(graph, &paths);

        PathStore {
            names: names,
            name_index: name_index,
            name_starts: name_starts,
            paths: paths,
            entity_paths: entity_paths,
            entity_path_starts: entity_path_starts,
        }
    }

    pub(crate) fn check_graph(&self, graph: &Graph) -> Result<(), String> {
        for (i, path) in self.paths.iter().enumerate() {
            if path.members.len() != graph.entity_count() {
                return Err(format!("PathStore: Membership of path {} does not match the entity count", i + 1));
            }
        }
        if self.entity_path_starts.count_ones() != graph.entity_count() {
            return Err(String::from("PathStore: Inverted index does not match the entity count"));
        }
        Ok(())
    }

    // Builds the entity -> path ranks inverted index: for every entity a 0
    // placeholder followed by the ranks of the paths containing it.
    fn invert_membership(graph: &Graph, paths: &[IndexedPath]) -> (IntVector, BitVector) {
        let mut values: Vec<u64> = Vec::new();
        let mut start_positions: Vec<usize> = Vec::new();
        for entity in 1..=graph.entity_count() {
            start_positions.push(values.len());
            values.push(0);
            for (i, path) in paths.iter().enumerate() {
                if path.contains_entity(entity) {
                    values.push((i + 1) as u64);
                }
            }
        }

        let mut entity_paths = IntVector::with_capacity(values.len(), bits::bit_len(paths.len() as u64)).unwrap();
        let mut starts = RawVector::with_len(values.len(), false);
        for value in values {
            entity_paths.push(value);
        }
        for pos in start_positions {
            starts.set_bit(pos, true);
        }
        let mut entity_path_starts = BitVector::from(starts);
        entity_path_starts.enable_rank();
        entity_path_starts.enable_select();
        (entity_paths, entity_path_starts)
    }
}

impl Serialize for PathStore {
    fn serialize_header<T: io::Write>(&self, _: &mut T) -> io::Result<()> {
        Ok(())
    }

    fn serialize_body<T: io::Write>(&self, writer: &mut T) -> io::Result<()> {
        self.names.serialize(writer)?;
        self.name_index.serialize(writer)?;
        self.name_starts.serialize(writer)?;
        self.paths.len().serialize(writer)?;
        for path in self.paths.iter() {
            path.serialize(writer)?;
        }
        self.entity_paths.serialize(writer)?;
        self.entity_path_starts.serialize(writer)?;
        Ok(())
    }

    fn load<T: io::Read>(reader: &mut T) -> io::Result<Self> {
        let names = Vec::<u8>::load(reader)?;
        let name_index = NameCsa::load(reader)?;
        if name_index.len() != names.len() {
            return Err(Error::new(ErrorKind::InvalidData, "PathStore: Name index length mismatch"));
        }
        let mut name_starts = BitVector::load(reader)?;
        if name_starts.len() != names.len() {
            return Err(Error::new(ErrorKind::InvalidData, "PathStore: Name start bitmap length mismatch"));
        }
        name_starts.enable_rank();
        name_starts.enable_select();

        let path_count = usize::load(reader)?;
        if name_starts.count_ones() != path_count {
            return Err(Error::new(ErrorKind::InvalidData, "PathStore: Name store does not match the path count"));
        }
        let mut paths: Vec<IndexedPath> = Vec::with_capacity(path_count);
        for _ in 0..path_count {
            paths.push(IndexedPath::load(reader)?);
        }

        let entity_paths = IntVector::load(reader)?;
        let mut entity_path_starts = BitVector::load(reader)?;
        if entity_path_starts.len() != entity_paths.len() {
            return Err(Error::new(ErrorKind::InvalidData, "PathStore: Inverted index length mismatch"));
        }
        entity_path_starts.enable_rank();
        entity_path_starts.enable_select();

        Ok(PathStore {
            names: names,
            name_index: name_index,
            name_starts: name_starts,
            paths: paths,
            entity_paths: entity_paths,
            entity_path_starts: entity_path_starts,
        })
    }

    fn size_in_elements(&self) -> usize {
        let mut result = self.names.size_in_elements() + self.name_index.size_in_elements()
            + self.name_starts.size_in_elements() + self.paths.len().size_in_elements();
        for path in self.paths.iter() {
            result += path.size_in_elements();
        }
        result + self.entity_paths.size_in_elements() + self.entity_path_starts.size_in_elements()
    }
}

//-----------------------------------------------------------------------------
