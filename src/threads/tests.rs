use super::*;

use crate::builder::{BuildParameters, GraphBuilder, GraphChunk};
use crate::index::GraphIndex;

//-----------------------------------------------------------------------------

fn thread(visits: &[(i64, Orientation)]) -> Vec<ThreadMapping> {
    visits.iter().map(|(id, orientation)| ThreadMapping::new(*id, *orientation)).collect()
}

fn params(sorted_dag: bool) -> BuildParameters {
    BuildParameters {
        store_threads: true,
        sorted_dag: sorted_dag,
        validate: false,
    }
}

// 1:ACG -> 2:TTT -> 3:CA with haplotypes [1+, 2+, 3+] and [1+, 2+].
fn line_graph_with_threads(sorted_dag: bool) -> GraphIndex {
    let mut chunk = GraphChunk::new();
    chunk.add_node(1, "ACG");
    chunk.add_node(2, "TTT");
    chunk.add_node(3, "CA");
    chunk.add_edge(Edge::new(1, false, 2, false));
    chunk.add_edge(Edge::new(2, false, 3, false));
    chunk.add_path("long", &[
        (1, Orientation::Forward), (2, Orientation::Forward), (3, Orientation::Forward),
    ]);
    chunk.add_path("short", &[(1, Orientation::Forward), (2, Orientation::Forward)]);
    let mut builder = GraphBuilder::new(params(sorted_dag));
    builder.add_chunk(&chunk);
    builder.finish().unwrap()
}

//-----------------------------------------------------------------------------

#[test]
fn sides() {
    assert_eq!(encode_side(1, Orientation::Forward), 2, "Incorrect side for rank 1 forward");
    assert_eq!(encode_side(1, Orientation::Reverse), 3, "Incorrect side for rank 1 reverse");
    assert_eq!(side_to_rank(7), 3, "Incorrect rank for side 7");
    assert_eq!(side_orientation(6), Orientation::Forward, "Incorrect orientation for side 6");
    assert_eq!(side_orientation(7), Orientation::Reverse, "Incorrect orientation for side 7");
}

#[test]
fn thread_reversal() {
    let forward = thread(&[(1, Orientation::Forward), (2, Orientation::Reverse), (3, Orientation::Forward)]);
    let reverse = reverse_thread(&forward);
    assert_eq!(reverse, thread(&[(3, Orientation::Reverse), (2, Orientation::Forward), (1, Orientation::Reverse)]),
        "Invalid reverse complement walk");
    assert_eq!(reverse_thread(&reverse), forward, "Thread reversal is not an involution");
}

//-----------------------------------------------------------------------------

#[test]
fn subpath_counts() {
    let index = line_graph_with_threads(true);
    let graph = index.graph();
    let threads = index.threads();

    assert_eq!(threads.count_matches(graph, &thread(&[(1, Orientation::Forward)])), 2, "Incorrect count for [1+]");
    assert_eq!(threads.count_matches(graph, &thread(&[(1, Orientation::Forward), (2, Orientation::Forward)])), 2,
        "Incorrect count for [1+, 2+]");
    assert_eq!(threads.count_matches(graph,
        &thread(&[(1, Orientation::Forward), (2, Orientation::Forward), (3, Orientation::Forward)])), 1,
        "Incorrect count for the long haplotype");
    assert_eq!(threads.count_matches(graph, &thread(&[(2, Orientation::Forward), (3, Orientation::Forward)])), 1,
        "Incorrect count for [2+, 3+]");
    // No edge reaches the start of node 1, so nothing continues to it.
    assert_eq!(threads.count_matches(graph, &thread(&[(3, Orientation::Forward), (1, Orientation::Forward)])), 0,
        "Found a match over a missing edge");
    // The reverse complement haplotypes are stored as well.
    assert_eq!(threads.count_matches(graph, &thread(&[(2, Orientation::Reverse), (1, Orientation::Reverse)])), 2,
        "Incorrect count for the reverse strand");
}

#[test]
fn search_states() {
    let index = line_graph_with_threads(true);
    let graph = index.graph();
    let threads = index.threads();

    let mut state = ThreadSearchState::new();
    assert_eq!(state.side, 0, "A fresh state has a side");

    // Extending never increases the count.
    let query = thread(&[
        (1, Orientation::Forward), (2, Orientation::Forward), (3, Orientation::Forward),
    ]);
    let mut previous = usize::MAX;
    for mapping in query.iter() {
        threads.extend_search(graph, &mut state, &[*mapping]);
        assert!(state.len() <= previous, "Extension increased the count");
        previous = state.len();
    }
    assert_eq!(state.len(), 1, "Incorrect final count");

    // A dead state stays dead.
    threads.extend_search(graph, &mut state, &thread(&[(1, Orientation::Forward)]));
    assert!(state.is_empty(), "A match continued over a missing edge");
    threads.extend_search(graph, &mut state, &thread(&[(2, Orientation::Forward)]));
    assert!(state.is_empty(), "An empty state came back to life");
}

#[test]
fn extraction() {
    let index = line_graph_with_threads(true);
    let graph = index.graph();
    let threads = index.threads();

    let extracted = threads.extract_threads(graph);
    assert_eq!(extracted.len(), 4, "Incorrect number of stored orientations");
    assert_eq!(threads.stored_orientations(), 4, "Extraction disagrees with the start counts");

    let long = thread(&[(1, Orientation::Forward), (2, Orientation::Forward), (3, Orientation::Forward)]);
    let short = thread(&[(1, Orientation::Forward), (2, Orientation::Forward)]);
    assert!(extracted.contains(&long), "The long haplotype was not extracted");
    assert!(extracted.contains(&short), "The short haplotype was not extracted");
    assert!(extracted.contains(&reverse_thread(&long)), "The reverse of the long haplotype was not extracted");
    assert!(extracted.contains(&reverse_thread(&short)), "The reverse of the short haplotype was not extracted");

    // Every extracted orientation can be found again, in both orientations.
    for extracted_thread in extracted.iter() {
        assert!(threads.count_matches(graph, extracted_thread) >= 1, "An extracted thread does not match");
        assert!(threads.count_matches(graph, &reverse_thread(extracted_thread)) >= 1,
            "The reverse of an extracted thread does not match");
    }
}

#[test]
fn usage_counts() {
    let index = line_graph_with_threads(true);
    let graph = index.graph();
    let threads = index.threads();

    // Both orientations of both haplotypes visit nodes 1 and 2.
    for id in [1, 2] {
        assert_eq!(threads.node_visits(graph, id, Orientation::Forward), 2,
            "Incorrect forward usage for node {}", id);
        assert_eq!(threads.node_visits(graph, id, Orientation::Reverse), 2,
            "Incorrect reverse usage for node {}", id);
    }
    assert_eq!(threads.node_visits(graph, 3, Orientation::Forward), 1, "Incorrect forward usage for node 3");
    assert_eq!(threads.threads_starting_at(graph, 1, Orientation::Forward), 2,
        "Incorrect start count at node 1 forward");
    assert_eq!(threads.threads_starting_at(graph, 2, Orientation::Reverse), 1,
        "Incorrect start count at node 2 reverse");
    assert_eq!(threads.threads_starting_at(graph, 3, Orientation::Reverse), 1,
        "Incorrect start count at node 3 reverse");
}

//-----------------------------------------------------------------------------

#[test]
fn batch_and_incremental_agree() {
    // The two insertion algorithms may order co-starting threads
    // differently, but everything observable must agree on a DAG.
    let batch = line_graph_with_threads(true);
    let incremental = line_graph_with_threads(false);

    let mut batch_threads = batch.threads().extract_threads(batch.graph());
    let mut incremental_threads = incremental.threads().extract_threads(incremental.graph());
    batch_threads.sort();
    incremental_threads.sort();
    assert_eq!(batch_threads, incremental_threads, "Insertion algorithms extract different threads");

    assert_eq!(batch.threads().stored_orientations(), incremental.threads().stored_orientations(),
        "Insertion algorithms disagree on the start counts");
    for id in 1..=3 {
        for orientation in [Orientation::Forward, Orientation::Reverse] {
            assert_eq!(
                batch.threads().node_visits(batch.graph(), id, orientation),
                incremental.threads().node_visits(incremental.graph(), id, orientation),
                "Insertion algorithms disagree on the usage of node {}", id
            );
        }
    }
    for query in batch_threads.iter() {
        assert_eq!(
            batch.threads().count_matches(batch.graph(), query),
            incremental.threads().count_matches(incremental.graph(), query),
            "Insertion algorithms disagree on a subpath count"
        );
    }
}

#[test]
fn batch_insert_counts() {
    // Two identical haplotypes over a two-node DAG.
    let mut chunk = GraphChunk::new();
    chunk.add_node(1, "A");
    chunk.add_node(2, "T");
    chunk.add_edge(Edge::new(1, false, 2, false));
    chunk.add_path("h1", &[(1, Orientation::Forward), (2, Orientation::Forward)]);
    chunk.add_path("h2", &[(1, Orientation::Forward), (2, Orientation::Forward)]);
    let mut builder = GraphBuilder::new(params(true));
    builder.add_chunk(&chunk);
    let index = builder.finish().unwrap();
    let graph = index.graph();
    let threads = index.threads();

    assert_eq!(threads.node_visits(graph, 1, Orientation::Forward), 2, "Incorrect usage for node 1");
    assert_eq!(threads.node_visits(graph, 2, Orientation::Forward), 2, "Incorrect usage for node 2");
    assert_eq!(threads.threads_starting_at(graph, 1, Orientation::Forward), 2, "Incorrect start count");
    assert_eq!(threads.stored_orientations(), 4, "Incorrect number of stored orientations");
    assert_eq!(threads.count_matches(graph, &thread(&[(1, Orientation::Forward), (2, Orientation::Forward)])), 2,
        "Incorrect count for the duplicated haplotype");

    let extracted = threads.extract_threads(graph);
    assert_eq!(extracted.len(), 4, "Incorrect number of extracted orientations");
}

#[test]
fn reversing_self_loop() {
    // A single node with a reversing self-loop on its end side; the
    // haplotype crosses to the reverse strand. This is not a DAG, so the
    // threads go through the incremental insertion path.
    let mut chunk = GraphChunk::new();
    chunk.add_node(1, "ACGT");
    chunk.add_edge(Edge::new(1, false, 1, true));
    chunk.add_path("loop", &[(1, Orientation::Forward), (1, Orientation::Reverse)]);
    let mut builder = GraphBuilder::new(params(false));
    builder.add_chunk(&chunk);
    let index = builder.finish().unwrap();
    let graph = index.graph();
    let threads = index.threads();

    let walk = thread(&[(1, Orientation::Forward), (1, Orientation::Reverse)]);

    // The walk is its own reverse complement, so both stored orientations
    // match it.
    assert_eq!(threads.count_matches(graph, &walk), 2, "Incorrect count for the palindromic walk");
    assert_eq!(threads.count_matches(graph, &thread(&[(1, Orientation::Forward), (1, Orientation::Forward)])), 0,
        "Found a walk over a missing edge");
    assert_eq!(threads.stored_orientations(), 2, "Incorrect number of stored orientations");

    let extracted = threads.extract_threads(graph);
    assert_eq!(extracted.len(), 2, "Incorrect number of extracted orientations");
    for extracted_thread in extracted.iter() {
        assert_eq!(*extracted_thread, walk, "Extraction does not reproduce the walk");
    }
}

#[test]
fn empty_thread_store() {
    let mut chunk = GraphChunk::new();
    chunk.add_node(1, "ACG");
    chunk.add_node(2, "T");
    chunk.add_edge(Edge::new(1, false, 2, false));
    chunk.add_path("p", &[(1, Orientation::Forward), (2, Orientation::Forward)]);
    // Threads are not stored unless asked for.
    let mut builder = GraphBuilder::new(BuildParameters::default());
    builder.add_chunk(&chunk);
    let index = builder.finish().unwrap();
    let graph = index.graph();
    let threads = index.threads();

    assert_eq!(threads.stored_orientations(), 0, "Found threads in an empty store");
    assert!(threads.extract_threads(graph).is_empty(), "Extracted threads from an empty store");
    assert_eq!(threads.count_matches(graph, &thread(&[(1, Orientation::Forward)])), 0,
        "Found a match in an empty store");
}

//-----------------------------------------------------------------------------
