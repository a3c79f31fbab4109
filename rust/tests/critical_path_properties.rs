use graph_tools::{
    find_critical_path, CriticalPathError, CriticalPathSolver, GraphNode, Node, NodeId,
    SchedulerConfig, Vertex,
};
use proptest::prelude::*;
use rustc_hash::FxHashMap;

const EPS: f64 = 1e-9;

// Strategy to generate a DAG with integer weights and a few shared workers.
// Acyclic by construction: node i only depends on nodes after it.
fn dag_strategy(max_nodes: usize) -> impl Strategy<Value = Vec<Node>> {
    (1..=max_nodes).prop_flat_map(|n| {
        (
            proptest::collection::vec(proptest::collection::vec(any::<usize>(), 0..n), n),
            proptest::collection::vec(0u8..=10, n),
            proptest::collection::vec(0i64..=3, n),
        )
            .prop_map(move |(raw_deps, weights, workers)| {
                (0..n)
                    .map(|i| {
                        let later = n - i - 1;
                        let mut deps: Vec<NodeId> = Vec::new();
                        if later > 0 {
                            for raw in &raw_deps[i] {
                                let dep = (i + 1 + raw % later) as NodeId + 1;
                                if !deps.contains(&dep) {
                                    deps.push(dep);
                                }
                            }
                        }
                        // Worker 0 stands for "unassigned"
                        let worker = (workers[i] != 0).then_some(workers[i]);
                        Node::new(i as NodeId + 1, deps, f64::from(weights[i]), worker)
                    })
                    .collect()
            })
    })
}

fn no_durations() -> FxHashMap<NodeId, f64> {
    FxHashMap::default()
}

fn unleveled() -> SchedulerConfig {
    SchedulerConfig {
        leveling_rounds: 0,
        ..SchedulerConfig::default()
    }
}

// Enough rounds for every same-worker pair to be serialized once
fn until_stable(graph: &[Node]) -> SchedulerConfig {
    SchedulerConfig::until_stable(graph.len() * graph.len() + 1)
}

proptest! {
    #[test]
    fn test_cycle_rejected_before_any_timing(graph in dag_strategy(8)) {
        let mut graph = graph;
        // Close a cycle over the first edge, if there is one
        let Some((from, to)) = graph
            .iter()
            .find_map(|n| n.dependencies.first().map(|&d| (n.id, d)))
        else {
            return Ok(());
        };
        let target = graph.iter_mut().find(|n| n.id == to).unwrap();
        target.dependencies.push(from);

        let result = find_critical_path(&mut graph, &no_durations(), &SchedulerConfig::default());

        prop_assert!(
            matches!(result, Err(CriticalPathError::CycleDetected { .. })),
            "expected CycleDetected, got {:?}",
            result
        );
        prop_assert!(graph.iter().all(|n| n.additional_dependencies.is_empty()));
    }

    #[test]
    fn test_sink_convergence(graph in dag_strategy(8)) {
        let mut solver = CriticalPathSolver::new(&graph, &no_durations(), &unleveled()).unwrap();
        solver.forward_pass().unwrap();

        let terminals: Vec<NodeId> = graph
            .iter()
            .filter(|n| n.all_dependencies().next().is_none())
            .map(|n| n.id)
            .collect();
        prop_assert_eq!(solver.terminal_nodes(), terminals.clone());

        let expected = terminals
            .iter()
            .map(|&id| solver.timing(Vertex::Node(id)).unwrap().earliest_finish())
            .fold(0.0, f64::max);
        prop_assert!((solver.makespan() - expected).abs() <= EPS);
    }

    #[test]
    fn test_zero_slack_paths(graph in dag_strategy(8)) {
        let mut graph = graph;
        let result = find_critical_path(&mut graph, &no_durations(), &SchedulerConfig::default()).unwrap();

        prop_assert!(!result.paths.is_empty());
        for path in &result.paths {
            let first = &result.timings[&path[0]];
            prop_assert!(first.earliest_start.abs() <= EPS);
            for id in path {
                prop_assert!(result.timings[id].is_critical(EPS));
            }
        }
        for timing in result.timings.values() {
            prop_assert!(timing.slack() >= -EPS);
            prop_assert!(timing.earliest_finish() <= result.makespan + EPS);
        }
    }

    #[test]
    fn test_resource_exclusivity_until_stable(graph in dag_strategy(8)) {
        let mut graph = graph;
        let config = until_stable(&graph);
        let result = find_critical_path(&mut graph, &no_durations(), &config).unwrap();

        for (i, a) in graph.iter().enumerate() {
            for b in &graph[i + 1..] {
                if a.assigned_to().is_none() || a.assigned_to() != b.assigned_to() {
                    continue;
                }
                let (ta, tb) = (&result.timings[&a.id], &result.timings[&b.id]);
                let overlap = ta.earliest_finish().min(tb.earliest_finish())
                    - ta.earliest_start.max(tb.earliest_start);
                prop_assert!(
                    overlap <= EPS,
                    "nodes {} and {} overlap on worker {:?}",
                    a.id,
                    b.id,
                    a.assigned_to()
                );
            }
        }
    }

    #[test]
    fn test_injected_edges_are_idempotent(graph in dag_strategy(8)) {
        let mut graph = graph;
        let config = until_stable(&graph);
        let first = find_critical_path(&mut graph, &no_durations(), &config).unwrap();

        let additional: usize = graph.iter().map(|n| n.additional_dependencies.len()).sum();
        prop_assert_eq!(additional, first.injected_edges.len());

        let second = find_critical_path(&mut graph, &no_durations(), &config).unwrap();
        prop_assert!(second.injected_edges.is_empty());
        prop_assert!((second.makespan - first.makespan).abs() <= EPS);
    }
}

#[test]
fn test_single_round_matches_first_correction() {
    // Same graph, one round vs. until stable: the first injected edge agrees
    let make = || {
        vec![
            Node::new(1, vec![2, 3, 4], 1.0, None),
            Node::new(2, vec![], 4.0, Some(1)),
            Node::new(3, vec![], 4.0, Some(1)),
            Node::new(4, vec![], 4.0, Some(1)),
        ]
    };

    let mut once = make();
    let single = find_critical_path(&mut once, &no_durations(), &SchedulerConfig::default()).unwrap();
    let mut stable = make();
    let config = until_stable(&stable);
    let full = find_critical_path(&mut stable, &no_durations(), &config).unwrap();

    assert_eq!(single.injected_edges, vec![(2, 3), (3, 4)]);
    assert_eq!(full.injected_edges, single.injected_edges);
    assert_eq!(full.makespan, 13.0);
    // Node 1 still reaches 3 and 4 directly, and stays critical as the origin
    assert_eq!(
        full.paths,
        vec![vec![1, 4], vec![1, 3, 4], vec![1, 2, 3, 4]]
    );
}
