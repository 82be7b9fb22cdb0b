mod common;

use common::{STRATEGIES, search_unseeded, solve_checked};
use dagsched::graph::bottom_levels;
use dagsched::heuristics::greedy_schedule;
use dagsched::types::ExecutionStrategy;
use dagsched_test_utils::brute_force::optimal_finish_time;
use dagsched_test_utils::strategies::{in_forest, small_dag, small_dag_with_zero_durations};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_search_matches_brute_force(graph in small_dag(6), processors in 1usize..=3) {
        let expected = optimal_finish_time(&graph, processors);

        let sequential = solve_checked(&graph, processors, ExecutionStrategy::Sequential);
        prop_assert_eq!(sequential.finish_time, expected);

        let parallel = solve_checked(&graph, processors, ExecutionStrategy::Parallel { threads: 2 });
        prop_assert_eq!(parallel.finish_time, expected);
    }

    #[test]
    fn test_unseeded_search_matches_brute_force(
        graph in prop_oneof![small_dag_with_zero_durations(6), in_forest(7)],
        processors in 1usize..=3,
    ) {
        let expected = optimal_finish_time(&graph, processors);

        for strategy in STRATEGIES {
            let found = search_unseeded(&graph, processors, strategy);
            prop_assert_eq!(found.finish_time, expected, "{:?}", strategy);
        }
    }

    #[test]
    fn test_greedy_is_valid_upper_bound(graph in small_dag(7), processors in 1usize..=3) {
        let levels = bottom_levels(&graph);
        let greedy = greedy_schedule(&graph, processors, &levels);
        prop_assert!(greedy.validate(&graph).is_ok());

        let optimal = solve_checked(&graph, processors, ExecutionStrategy::Sequential);
        prop_assert!(optimal.finish_time <= greedy.finish_time);
    }
}
