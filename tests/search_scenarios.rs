mod common;

use std::sync::Arc;

use common::{STRATEGIES, init_tracing, solve_checked};
use dagsched::errors::SchedError;
use dagsched::search::{SearchEngine, SearchMonitor, solve};
use dagsched::types::ExecutionStrategy;
use dagsched_test_utils::brute_force::optimal_finish_time;
use dagsched_test_utils::builders::{GraphBuilder, chain, fork_join, from_edges, independent};

#[test]
fn test_three_task_chain_stays_on_one_processor() {
    init_tracing();
    // A -> B -> C, every duration and cost 2.
    let graph = chain(&[2, 2, 2], &[2, 2]);

    for strategy in STRATEGIES {
        let schedule = solve_checked(&graph, 2, strategy);
        assert_eq!(schedule.finish_time, 6, "{strategy:?}");

        let processor = schedule.placement(0).processor;
        assert!(
            graph.tasks().all(|t| schedule.placement(t).processor == processor),
            "chain should not be split across processors"
        );
    }
}

#[test]
fn test_empty_graph_finishes_at_zero() {
    init_tracing();
    let graph = independent(&[]);

    for strategy in STRATEGIES {
        let schedule = solve_checked(&graph, 3, strategy);
        assert_eq!(schedule.finish_time, 0);
        assert!(schedule.placements.is_empty());
    }

    let engine = SearchEngine::new(&graph, 2, ExecutionStrategy::Sequential).unwrap();
    let found = engine.search(5).unwrap().expect("empty schedule beats any positive bound");
    assert_eq!(found.finish_time, 0);
}

#[test]
fn test_single_task_finish_time_is_its_duration() {
    init_tracing();
    let graph = GraphBuilder::new().task("only", 7).build();

    for processors in 1..=4 {
        for strategy in STRATEGIES {
            let schedule = solve_checked(&graph, processors, strategy);
            assert_eq!(schedule.finish_time, 7);
            assert_eq!(schedule.placement(0).start, 0);
        }
    }
}

#[test]
fn test_chain_is_never_parallelised() {
    init_tracing();
    let durations = [3, 1, 4, 1, 5, 2];
    let graph = chain(&durations, &[0, 1, 0, 2, 0]);
    let total: u64 = durations.iter().sum();

    for processors in 1..=4 {
        for strategy in STRATEGIES {
            let schedule = solve_checked(&graph, processors, strategy);
            assert_eq!(schedule.finish_time, total);
        }
    }
}

#[test]
fn test_independent_tasks_balance_across_processors() {
    init_tracing();
    let graph = independent(&[3, 3, 3, 3]);

    for strategy in STRATEGIES {
        assert_eq!(solve_checked(&graph, 2, strategy).finish_time, 6);
        assert_eq!(solve_checked(&graph, 4, strategy).finish_time, 3);
        assert_eq!(solve_checked(&graph, 8, strategy).finish_time, 3);
    }
}

#[test]
fn test_fork_join_pays_one_communication_delay() {
    init_tracing();
    // src(2) -> {w0(3), w1(3)} -> sink(2), all costs 1.
    let graph = fork_join(2, &[(3, 1, 1), (3, 1, 1)], 2);

    for strategy in STRATEGIES {
        let schedule = solve_checked(&graph, 2, strategy);
        assert_eq!(schedule.finish_time, 8);
        assert_eq!(schedule.finish_time, optimal_finish_time(&graph, 2));
    }
}

#[test]
fn test_short_parent_of_shared_child_is_not_delayed() {
    init_tracing();
    // t1 -> t3 alongside unrelated t0 and t2. Optimum 6: t1 then t0 on one
    // processor, t2 then t3 on the other.
    let graph = from_edges(&[5, 1, 4, 2], &[(1, 3, 0)]);
    assert_eq!(optimal_finish_time(&graph, 2), 6);

    for strategy in STRATEGIES {
        assert_eq!(solve_checked(&graph, 2, strategy).finish_time, 6, "{strategy:?}");

        let engine = SearchEngine::new(&graph, 2, strategy).unwrap();
        let found = engine.search(graph.total_duration() + 1).unwrap().expect("beats the bound");
        assert_eq!(found.finish_time, 6, "{strategy:?}");
    }
}

#[test]
fn test_unseeded_search_reaches_optimum_with_childless_siblings() {
    init_tracing();
    // t2 -> t3; optimum 5 runs t2 then t1 next to t0 then t3.
    let graph = from_edges(&[2, 4, 1, 3], &[(2, 3, 0)]);
    assert_eq!(optimal_finish_time(&graph, 2), 5);

    for strategy in STRATEGIES {
        let engine = SearchEngine::new(&graph, 2, strategy).unwrap();
        let found = engine.search(graph.total_duration() + 100).unwrap().expect("beats the bound");
        assert_eq!(found.finish_time, 5, "{strategy:?}");
        found.validate(&graph).unwrap();
    }
}

#[test]
fn test_lower_bottom_level_candidate_is_branched_first() {
    init_tracing();
    // t0(1) -> t2(1) and t1(3) -> t3(1). t0 has the lower bottom level, so
    // the first optimum found keeps t0 on the first processor.
    let graph = from_edges(&[1, 3, 1, 1], &[(0, 2, 0), (1, 3, 0)]);
    let engine = SearchEngine::new(&graph, 2, ExecutionStrategy::Sequential).unwrap();

    let found = engine.search(graph.total_duration() + 1).unwrap().expect("beats the bound");
    assert_eq!(found.finish_time, 4);
    assert_eq!(found.placement(0).processor, 0);
    assert_eq!(found.placement(1).processor, 1);
}

#[test]
fn test_search_only_reports_strict_improvements() {
    init_tracing();
    let graph = chain(&[2, 2, 2], &[2, 2]);
    let engine = SearchEngine::new(&graph, 2, ExecutionStrategy::Sequential).unwrap();

    assert!(engine.search(6).unwrap().is_none());

    let engine = SearchEngine::new(&graph, 2, ExecutionStrategy::Sequential).unwrap();
    let found = engine.search(7).unwrap().expect("6 beats 7");
    assert_eq!(found.finish_time, 6);
    found.validate(&graph).unwrap();
}

#[test]
fn test_swapping_equivalent_task_labels_keeps_finish_time() {
    init_tracing();
    // b and c are equivalent (same duration, parent, child and costs).
    let first = GraphBuilder::new()
        .task("a", 2)
        .task("b", 3)
        .task("c", 3)
        .task("d", 4)
        .task("e", 1)
        .edge("a", "b", 1)
        .edge("a", "c", 1)
        .edge("a", "d", 3)
        .edge("b", "e", 2)
        .edge("c", "e", 2)
        .edge("d", "e", 1)
        .build();
    let swapped = GraphBuilder::new()
        .task("a", 2)
        .task("c", 3)
        .task("d", 4)
        .task("b", 3)
        .task("e", 1)
        .edge("a", "c", 1)
        .edge("a", "b", 1)
        .edge("a", "d", 3)
        .edge("c", "e", 2)
        .edge("b", "e", 2)
        .edge("d", "e", 1)
        .build();

    let expected = optimal_finish_time(&first, 3);
    for strategy in STRATEGIES {
        assert_eq!(solve_checked(&first, 3, strategy).finish_time, expected);
        assert_eq!(solve_checked(&swapped, 3, strategy).finish_time, expected);
    }
}

#[test]
fn test_sequential_and_parallel_agree() {
    init_tracing();
    let graph = from_edges(
        &[2, 3, 3, 2, 4, 1, 2, 3],
        &[
            (0, 1, 2),
            (0, 2, 1),
            (0, 3, 3),
            (1, 4, 1),
            (2, 4, 2),
            (2, 5, 1),
            (3, 6, 2),
            (4, 7, 1),
            (5, 7, 3),
            (6, 7, 1),
        ],
    );

    for processors in 2..=3 {
        let sequential = solve_checked(&graph, processors, ExecutionStrategy::Sequential);
        let parallel = solve_checked(&graph, processors, ExecutionStrategy::Parallel { threads: 4 });
        assert_eq!(sequential.finish_time, parallel.finish_time);
        assert_eq!(sequential.finish_time, optimal_finish_time(&graph, processors));
    }
}

#[test]
fn test_monitor_reports_final_state() {
    init_tracing();
    let graph = fork_join(1, &[(2, 2, 1), (3, 1, 2), (2, 1, 1)], 1);
    let monitor = Arc::new(SearchMonitor::new());

    let schedule = solve(&graph, 2, ExecutionStrategy::Sequential, Arc::clone(&monitor)).unwrap();

    assert!(monitor.is_finished());
    assert!(monitor.states_explored() > 0);
    assert_eq!(monitor.best_finish_time(), Some(schedule.finish_time));
    assert_eq!(monitor.best_schedule().map(|s| s.finish_time), Some(schedule.finish_time));
    assert!(monitor.take_best_changed());
    assert!(!monitor.take_best_changed());
}

#[test]
fn test_best_finish_time_never_increases_while_polling() {
    init_tracing();
    let durations: Vec<u64> = (0..10).map(|i| 1 + (i * 7 % 5) as u64).collect();
    let edges = [(0, 3, 2), (1, 4, 1), (2, 5, 3), (3, 6, 1), (4, 7, 2), (5, 8, 1), (6, 9, 2)];
    let graph = from_edges(&durations, &edges);
    let monitor = Arc::new(SearchMonitor::new());

    let result = std::thread::scope(|scope| {
        let handle = scope.spawn(|| {
            solve(
                &graph,
                3,
                ExecutionStrategy::Parallel { threads: 2 },
                Arc::clone(&monitor),
            )
        });

        let mut last = u64::MAX;
        while !monitor.is_finished() {
            if let Some(best) = monitor.best_finish_time() {
                assert!(best <= last, "best finish time went from {last} to {best}");
                last = best;
            }
            std::thread::yield_now();
        }
        handle.join().expect("search thread panicked")
    });

    let schedule = result.unwrap();
    assert_eq!(monitor.best_finish_time(), Some(schedule.finish_time));
}

#[test]
fn test_cancelled_search_reports_abort() {
    init_tracing();
    let graph = independent(&[1, 2, 3, 4]);
    let monitor = Arc::new(SearchMonitor::new());
    monitor.cancel();

    let engine = SearchEngine::new(&graph, 2, ExecutionStrategy::Sequential)
        .unwrap()
        .with_monitor(Arc::clone(&monitor));

    match engine.search(100) {
        Err(SchedError::SearchAborted) => {}
        other => panic!("Expected SearchAborted, got: {:?}", other),
    }
    assert!(monitor.is_finished());
}

#[test]
fn test_zero_processors_is_rejected() {
    let graph = independent(&[1]);

    match SearchEngine::new(&graph, 0, ExecutionStrategy::Sequential) {
        Err(SchedError::InvalidProcessorCount(0)) => {}
        other => panic!("Expected InvalidProcessorCount, got: {:?}", other.map(|_| ())),
    }

    let monitor = Arc::new(SearchMonitor::new());
    assert!(matches!(
        solve(&graph, 0, ExecutionStrategy::Sequential, monitor),
        Err(SchedError::InvalidProcessorCount(0))
    ));
}
