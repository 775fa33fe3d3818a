use super::*;

use crate::builder::{BuildParameters, GraphBuilder, GraphChunk};
use crate::graph::Edge;
use crate::threads::ThreadMapping;

use simple_sds::serialize::Serialize;
use simple_sds::serialize;

//-----------------------------------------------------------------------------

fn build_index(store_threads: bool) -> GraphIndex {
    let mut chunk = GraphChunk::new();
    chunk.add_node(1, "ACG");
    chunk.add_node(2, "TTT");
    chunk.add_node(3, "CA");
    chunk.add_edge(Edge::new(1, false, 2, false));
    chunk.add_edge(Edge::new(2, false, 3, false));
    chunk.add_path("P1", &[
        (1, Orientation::Forward), (2, Orientation::Forward), (3, Orientation::Forward),
    ]);
    chunk.add_path("P2", &[(1, Orientation::Forward), (2, Orientation::Forward)]);
    let parameters = BuildParameters {
        store_threads: store_threads,
        sorted_dag: store_threads,
        validate: true,
    };
    let mut builder = GraphBuilder::new(parameters);
    builder.add_chunk(&chunk);
    builder.finish().unwrap()
}

fn round_trip(index: &GraphIndex) -> GraphIndex {
    let mut buffer: Vec<u8> = Vec::new();
    index.serialize(&mut buffer).unwrap();
    assert_eq!(buffer.len(), index.size_in_elements() * 8, "Serialized size does not match the estimate");
    GraphIndex::load(&mut buffer.as_slice()).unwrap()
}

//-----------------------------------------------------------------------------

#[test]
fn statistics() {
    let index = build_index(true);
    assert_eq!(index.node_count(), 3, "Incorrect node count");
    assert_eq!(index.edge_count(), 2, "Incorrect edge count");
    assert_eq!(index.path_count(), 2, "Incorrect path count");
    assert_eq!(index.sequence_len(), 8, "Incorrect sequence length");
}

#[test]
fn validation() {
    // Both builds validated themselves in `finish`; validate once more by
    // hand.
    build_index(false).validate().unwrap();
    build_index(true).validate().unwrap();
}

#[test]
fn serialization() {
    let index = build_index(true);
    let loaded = round_trip(&index);
    assert_eq!(loaded, index, "The index changed in the round trip");
    let _ = serialize::test(&index, "graph-index", None, true);
}

#[test]
fn serialization_without_threads() {
    let index = build_index(false);
    let loaded = round_trip(&index);
    assert_eq!(loaded, index, "The index changed in the round trip");
}

#[test]
fn queries_after_loading() {
    let index = build_index(true);
    let loaded = round_trip(&index);
    let graph = loaded.graph();

    assert_eq!(graph.node_sequence(2), b"TTT", "Incorrect label after loading");
    assert!(graph.has_edge(2, false, 3, false), "Missing edge after loading");

    let rank = loaded.paths().path_rank("P1");
    assert_eq!(loaded.paths().path_length(rank), 8, "Incorrect path length after loading");
    assert_eq!(loaded.paths().node_at_path_position(rank, 6), 3, "Incorrect positional query after loading");

    let query = vec![
        ThreadMapping::new(1, Orientation::Forward),
        ThreadMapping::new(2, Orientation::Forward),
    ];
    assert_eq!(loaded.threads().count_matches(graph, &query), 2, "Incorrect thread count after loading");
    loaded.validate().unwrap();
}

#[test]
fn empty_index() {
    let builder = GraphBuilder::new(BuildParameters::default());
    let index = builder.finish().unwrap();
    index.validate().unwrap();
    assert_eq!(index.node_count(), 0, "An empty index has nodes");
    let loaded = round_trip(&index);
    assert_eq!(loaded, index, "The empty index changed in the round trip");
}

#[test]
fn truncated_input() {
    let index = build_index(true);
    let mut buffer: Vec<u8> = Vec::new();
    index.serialize(&mut buffer).unwrap();
    for len in [0, 8, buffer.len() / 2, buffer.len() - 8] {
        let truncated = &buffer[..len];
        assert!(GraphIndex::load(&mut &truncated[..]).is_err(), "Loaded an index from {} bytes", len);
    }
}

//-----------------------------------------------------------------------------
