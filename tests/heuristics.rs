use dagsched::graph::bottom_levels;
use dagsched::heuristics::{Priority, greedy_schedule, list_schedule, sequential_schedule};
use dagsched_test_utils::builders::{chain, fork_join, from_edges, independent};

#[test]
fn test_sequential_schedule_concatenates_in_topological_order() {
    let graph = fork_join(1, &[(2, 5, 5), (3, 5, 5)], 4);
    let schedule = sequential_schedule(&graph);

    assert_eq!(schedule.finish_time, 10);
    assert_eq!(schedule.processors, 1);
    assert!(schedule.placements.iter().all(|p| p.processor == 0));
    schedule.validate(&graph).unwrap();
}

#[test]
fn test_every_priority_yields_a_valid_schedule() {
    let graph = from_edges(
        &[3, 2, 4, 1, 2, 3],
        &[(0, 2, 1), (1, 2, 2), (1, 3, 1), (2, 4, 3), (3, 4, 1), (3, 5, 2)],
    );
    let levels = bottom_levels(&graph);

    for priority in Priority::ALL {
        for processors in 1..=3 {
            let schedule = list_schedule(&graph, processors, priority, &levels);
            if let Err(v) = schedule.validate(&graph) {
                panic!("{priority:?} on {processors} processors: {v}");
            }
        }
    }
}

#[test]
fn test_greedy_keeps_the_best_policy() {
    let graph = from_edges(
        &[3, 2, 4, 1, 2, 3],
        &[(0, 2, 1), (1, 2, 2), (1, 3, 1), (2, 4, 3), (3, 4, 1), (3, 5, 2)],
    );
    let levels = bottom_levels(&graph);

    let best = greedy_schedule(&graph, 2, &levels);
    for priority in Priority::ALL {
        assert!(best.finish_time <= list_schedule(&graph, 2, priority, &levels).finish_time);
    }
}

#[test]
fn test_greedy_balances_independent_tasks() {
    let graph = independent(&[2, 2, 2, 2]);
    let levels = bottom_levels(&graph);
    assert_eq!(greedy_schedule(&graph, 2, &levels).finish_time, 4);
    assert_eq!(greedy_schedule(&graph, 4, &levels).finish_time, 2);
}

#[test]
fn test_greedy_keeps_chain_local() {
    let graph = chain(&[2, 2, 2], &[2, 2]);
    let levels = bottom_levels(&graph);
    assert_eq!(greedy_schedule(&graph, 3, &levels).finish_time, 6);
}
