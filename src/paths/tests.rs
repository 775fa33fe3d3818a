use super::*;

use crate::builder::{BuildParameters, GraphBuilder, GraphChunk};
use crate::index::GraphIndex;

//-----------------------------------------------------------------------------

// Three nodes on a line with two reference paths. P2 steps over an edge the
// graph does not have.
fn line_graph_with_paths() -> GraphIndex {
    let mut chunk = GraphChunk::new();
    chunk.add_node(1, "ACG");
    chunk.add_node(2, "TTT");
    chunk.add_node(3, "CA");
    chunk.add_edge(Edge::new(1, false, 2, false));
    chunk.add_edge(Edge::new(2, false, 3, false));
    chunk.add_path("P1", &[
        (1, Orientation::Forward), (2, Orientation::Forward), (3, Orientation::Forward),
    ]);
    chunk.add_path("P2", &[(1, Orientation::Forward), (3, Orientation::Forward)]);
    let mut builder = GraphBuilder::new(BuildParameters::default());
    builder.add_chunk(&chunk);
    builder.finish().unwrap()
}

//-----------------------------------------------------------------------------

#[test]
fn name_lookups() {
    let index = line_graph_with_paths();
    let paths = index.paths();

    assert_eq!(paths.path_count(), 2, "Incorrect path count");
    assert_eq!(paths.max_path_rank(), 2, "Incorrect maximum path rank");
    let p1 = paths.path_rank("P1");
    let p2 = paths.path_rank("P2");
    assert_eq!(p1, 1, "Incorrect rank for P1");
    assert_eq!(p2, 2, "Incorrect rank for P2");
    assert_eq!(paths.path_rank("nonexistent"), 0, "Unknown names should map to rank 0");
    assert_eq!(paths.path_name(p1), b"P1", "Incorrect name for rank 1");
    assert_eq!(paths.path_name(p2), b"P2", "Incorrect name for rank 2");
}

#[test]
fn names_with_shared_prefixes() {
    let mut chunk = GraphChunk::new();
    chunk.add_node(1, "A");
    chunk.add_path("chr1", &[(1, Orientation::Forward)]);
    chunk.add_path("chr10", &[(1, Orientation::Forward)]);
    let mut builder = GraphBuilder::new(BuildParameters::default());
    builder.add_chunk(&chunk);
    let index = builder.finish().unwrap();
    let paths = index.paths();

    // The markers keep "chr1" from matching inside "chr10".
    let chr1 = paths.path_rank("chr1");
    let chr10 = paths.path_rank("chr10");
    assert!(chr1 > 0 && chr10 > 0 && chr1 != chr10, "Prefix names are confused");
    assert_eq!(paths.path_name(chr1), b"chr1");
    assert_eq!(paths.path_name(chr10), b"chr10");
    assert_eq!(paths.path_rank("chr"), 0, "A bare prefix should not match");
}

//-----------------------------------------------------------------------------

#[test]
fn path_contents() {
    let index = line_graph_with_paths();
    let paths = index.paths();
    let p1 = paths.path_rank("P1");

    assert_eq!(paths.path_length(p1), 8, "Incorrect length for P1");
    let truth = vec![
        Traversal::new(1, Orientation::Forward, 1),
        Traversal::new(2, Orientation::Forward, 2),
        Traversal::new(3, Orientation::Forward, 3),
    ];
    assert_eq!(paths.path(p1), truth, "Incorrect traversals for P1");

    let indexed = paths.indexed_path(p1);
    assert_eq!(indexed.visit_count(), 3, "Incorrect visit count");
    assert_eq!(indexed.position(1), 3, "Incorrect position for visit 1");
    assert_eq!(indexed.traversal(2), truth[2], "Incorrect traversal for visit 2");
}

#[test]
fn positional_queries() {
    let index = line_graph_with_paths();
    let paths = index.paths();
    let p1 = paths.path_rank("P1");

    assert_eq!(paths.node_at_path_position(p1, 4), 2, "Incorrect node at offset 4");
    assert_eq!(paths.node_at_path_position(p1, 6), 3, "Incorrect node at offset 6");
    for offset in 0..paths.path_length(p1) {
        let truth = if offset < 3 { 1 } else if offset < 6 { 2 } else { 3 };
        assert_eq!(paths.node_at_path_position(p1, offset), truth, "Incorrect node at offset {}", offset);
        let mapping = paths.mapping_at_path_position(p1, offset);
        assert_eq!(mapping.id, truth, "Incorrect mapping at offset {}", offset);
        assert_eq!(mapping.orientation, Orientation::Forward, "Incorrect direction at offset {}", offset);
    }
}

#[test]
fn membership() {
    let index = line_graph_with_paths();
    let graph = index.graph();
    let paths = index.paths();
    let p1 = paths.path_rank("P1");
    let p2 = paths.path_rank("P2");

    for id in 1..=3 {
        assert!(paths.path_contains_node(graph, p1, id), "P1 should contain node {}", id);
    }
    assert!(paths.path_contains_node(graph, p2, 1), "P2 should contain node 1");
    assert!(!paths.path_contains_node(graph, p2, 2), "P2 should not contain node 2");

    let first = Edge::new(1, false, 2, false);
    assert!(paths.path_contains_edge(graph, p1, &first), "P1 should contain edge 1 -> 2");
    assert!(paths.path_contains_edge(graph, p1, &first.reverse()), "Membership should accept either articulation");
    assert!(!paths.path_contains_edge(graph, p2, &first), "P2 should not contain edge 1 -> 2");

    // P2 steps from 1 to 3 without an edge: the step is simply not a member.
    assert!(!paths.path_contains_edge(graph, p2, &Edge::new(1, false, 3, false)),
        "A missing edge cannot be on a path");

    assert_eq!(paths.paths_of_node(graph, 1), vec![p1, p2], "Incorrect paths of node 1");
    assert_eq!(paths.paths_of_node(graph, 2), vec![p1], "Incorrect paths of node 2");
    assert_eq!(paths.paths_of_edge(graph, &first), vec![p1], "Incorrect paths of edge 1 -> 2");
    assert!(paths.paths_of_edge(graph, &Edge::new(1, false, 3, false)).is_empty(),
        "A missing edge is on no path");
}

#[test]
fn repeated_visits() {
    let mut chunk = GraphChunk::new();
    chunk.add_node(1, "ACG");
    chunk.add_node(2, "TT");
    chunk.add_edge(Edge::new(1, false, 2, false));
    chunk.add_edge(Edge::new(2, false, 1, false));
    chunk.add_path("loop", &[
        (1, Orientation::Forward), (2, Orientation::Forward), (1, Orientation::Forward),
    ]);
    let mut builder = GraphBuilder::new(BuildParameters::default());
    builder.add_chunk(&chunk);
    let index = builder.finish().unwrap();
    let paths = index.paths();
    let rank = paths.path_rank("loop");

    assert_eq!(paths.node_occs_in_path(1, rank), 2, "Incorrect occurrence count for node 1");
    assert_eq!(paths.node_occs_in_path(2, rank), 1, "Incorrect occurrence count for node 2");
    assert_eq!(paths.node_visits_in_path(1, rank), vec![0, 2], "Incorrect visits for node 1");
    assert_eq!(paths.node_positions_in_path(1, rank), vec![0, 5], "Incorrect positions for node 1");
    assert_eq!(paths.path_length(rank), 8, "Incorrect length for the looping path");
}

#[test]
fn reverse_traversals() {
    let mut chunk = GraphChunk::new();
    chunk.add_node(1, "ACG");
    chunk.add_node(2, "TT");
    chunk.add_edge(Edge::new(1, false, 2, false));
    // Walk the same chain backwards along the reverse strand.
    chunk.add_path("back", &[(2, Orientation::Reverse), (1, Orientation::Reverse)]);
    let mut builder = GraphBuilder::new(BuildParameters::default());
    builder.add_chunk(&chunk);
    let index = builder.finish().unwrap();
    let graph = index.graph();
    let paths = index.paths();
    let rank = paths.path_rank("back");

    // The step 2- to 1- uses the stored articulation of the edge 1 -> 2.
    assert!(paths.path_contains_edge(graph, rank, &Edge::new(1, false, 2, false)),
        "Reverse walk should mark the underlying edge");
    let mapping = paths.mapping_at_path_position(rank, 0);
    assert_eq!(mapping.id, 2, "Incorrect node at the start of the reverse walk");
    assert_eq!(mapping.orientation, Orientation::Reverse, "Incorrect direction on the reverse walk");
}

#[test]
fn mappings_by_name() {
    let index = line_graph_with_paths();
    let graph = index.graph();
    let paths = index.paths();

    let positions = paths.node_positions_in_paths(graph, 1);
    assert_eq!(positions.len(), 2, "Node 1 should be on two paths");
    assert_eq!(positions["P1"], vec![0], "Incorrect positions on P1");
    assert_eq!(positions["P2"], vec![0], "Incorrect positions on P2");

    let mappings = paths.node_mappings(graph, 3);
    assert_eq!(mappings["P1"], vec![Traversal::new(3, Orientation::Forward, 3)], "Incorrect mappings on P1");
    assert_eq!(mappings["P2"], vec![Traversal::new(3, Orientation::Forward, 2)], "Incorrect mappings on P2");
}

//-----------------------------------------------------------------------------

#[test]
fn path_distances() {
    let index = line_graph_with_paths();
    let graph = index.graph();
    let paths = index.paths();
    let p1 = paths.path_rank("P1");

    assert_eq!(paths.approx_path_distance(graph, "P1", 1, 3), 3, "Incorrect distance from 1 to 3");
    assert_eq!(paths.approx_path_distance(graph, "P1", 3, 1), 3, "Distance should ignore argument order");
    assert_eq!(paths.approx_path_distance(graph, "P1", 1, 2), 0, "Adjacent nodes should be at distance 0");
    assert_eq!(paths.approx_path_distance(graph, "nonexistent", 1, 3), -1, "Unknown paths have no distance");

    assert_eq!(paths.next_path_node_by_id(graph, p1, 2), Some(2), "A member node is its own successor");
    assert_eq!(paths.prev_path_node_by_id(graph, p1, 2), Some(2), "A member node is its own predecessor");
}

#[test]
fn distance_anchors() {
    // Node 2 is not on the path; its neighbors in id space are.
    let mut chunk = GraphChunk::new();
    chunk.add_node(1, "AAAA");
    chunk.add_node(2, "C");
    chunk.add_node(3, "G");
    chunk.add_edge(Edge::new(1, false, 2, false));
    chunk.add_edge(Edge::new(2, false, 3, false));
    chunk.add_edge(Edge::new(1, false, 3, false));
    chunk.add_path("skip", &[(1, Orientation::Forward), (3, Orientation::Forward)]);
    let mut builder = GraphBuilder::new(BuildParameters::default());
    builder.add_chunk(&chunk);
    let index = builder.finish().unwrap();
    let graph = index.graph();
    let paths = index.paths();
    let rank = paths.path_rank("skip");

    assert_eq!(paths.next_path_node_by_id(graph, rank, 2), Some(3), "Incorrect successor for node 2");
    assert_eq!(paths.prev_path_node_by_id(graph, rank, 2), Some(1), "Incorrect predecessor for node 2");
    // Node 2 anchors to node 1 on its left, so the estimate spans node 1.
    assert_eq!(paths.approx_path_distance(graph, "skip", 1, 2), 4, "Incorrect anchored distance");
}

#[test]
fn minimum_distance_tiers() {
    let mut chunk = GraphChunk::new();
    chunk.add_node(1, "A");
    chunk.add_node(2, "C");
    chunk.add_node(3, "G");
    chunk.add_edge(Edge::new(1, false, 2, false));
    chunk.add_edge(Edge::new(2, false, 3, false));
    chunk.add_edge(Edge::new(1, false, 3, false));
    // Contains both endpoints: distance 1.
    chunk.add_path("both", &[
        (1, Orientation::Forward), (2, Orientation::Forward), (3, Orientation::Forward),
    ]);
    // Contains only node 3: anchored distance 0, but a worse tier.
    chunk.add_path("one", &[(3, Orientation::Forward)]);
    let mut builder = GraphBuilder::new(BuildParameters::default());
    builder.add_chunk(&chunk);
    let index = builder.finish().unwrap();
    let graph = index.graph();
    let paths = index.paths();

    assert_eq!(paths.approx_path_distance(graph, "both", 1, 3), 1, "Incorrect distance on path both");
    assert_eq!(paths.approx_path_distance(graph, "one", 1, 3), 0, "Incorrect anchored distance on path one");

    // The path containing both endpoints wins even with a larger distance.
    let empty: Vec<&str> = Vec::new();
    assert_eq!(paths.min_approx_path_distance(graph, &empty, 1, 3), 1, "Best tier not preferred");
    assert_eq!(paths.min_approx_path_distance(graph, &["both", "one"], 1, 3), 1, "Best tier not preferred in a name list");
    assert_eq!(paths.min_approx_path_distance(graph, &["one"], 1, 3), 0, "A single name should restrict the search");
    assert_eq!(paths.min_approx_path_distance(graph, &["nonexistent"], 1, 3), -1, "Unknown names should give no distance");
}

//-----------------------------------------------------------------------------
