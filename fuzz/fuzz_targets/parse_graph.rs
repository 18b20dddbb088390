#![no_main]

use libfuzzer_sys::fuzz_target;

use astar::algorithms::astar::search;
use astar::float_cost::FloatCost;
use astar::problem::ZeroHeuristic;
use astar::problems::graph::Graph;
use astar::space::Space;

// Parses arbitrary text and searches between its first and last nodes.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(graph) = Graph::<FloatCost>::try_from(text) else {
        return;
    };
    let (Some(start), Some(goal)) = (graph.nodes().next(), graph.nodes().last()) else {
        return;
    };

    // Edges are validated while building, but free self loops and overflowing
    // sums are only found while searching.
    if let Ok(Some(path)) = search::<ZeroHeuristic, _, _, _>(&graph, start, goal) {
        assert_eq!(path.start(), Some(&start));
        assert_eq!(path.end(), Some(&goal));
        assert!(graph.valid_path(&path));
    }
});
