use dagsched::schedule::{Placement, Schedule, ScheduleViolation};
use dagsched::types::SummaryStyle;
use dagsched_test_utils::builders::{GraphBuilder, independent};

fn at(start: u64, processor: usize) -> Placement {
    Placement { start, processor }
}

#[test]
fn test_valid_schedule_passes() {
    let graph = GraphBuilder::new()
        .task("a", 2)
        .task("b", 2)
        .edge("a", "b", 3)
        .build();

    let remote = Schedule::from_placements(&graph, vec![at(0, 0), at(5, 1)], 2);
    assert_eq!(remote.finish_time, 7);
    remote.validate(&graph).unwrap();

    let local = Schedule::from_placements(&graph, vec![at(0, 0), at(2, 0)], 2);
    local.validate(&graph).unwrap();
}

#[test]
fn test_precedence_violation_is_reported() {
    let graph = GraphBuilder::new()
        .task("a", 2)
        .task("b", 2)
        .edge("a", "b", 3)
        .build();

    let early = Schedule::from_placements(&graph, vec![at(0, 0), at(4, 1)], 2);
    assert_eq!(
        early.validate(&graph),
        Err(ScheduleViolation::Precedence {
            parent: 0,
            child: 1,
            ready: 5,
            start: 4
        })
    );
}

#[test]
fn test_overlap_is_reported() {
    let graph = independent(&[3, 3]);
    let clash = Schedule::from_placements(&graph, vec![at(0, 0), at(2, 0)], 1);
    assert!(matches!(
        clash.validate(&graph),
        Err(ScheduleViolation::Overlap { processor: 0, .. })
    ));
}

#[test]
fn test_zero_length_tasks_never_overlap() {
    let graph = independent(&[3, 0]);
    let schedule = Schedule::from_placements(&graph, vec![at(0, 0), at(1, 0)], 1);
    schedule.validate(&graph).unwrap();
}

#[test]
fn test_structural_violations_are_reported() {
    let graph = independent(&[1, 1]);

    let short = Schedule::from_placements(&graph, vec![at(0, 0)], 1);
    assert_eq!(
        short.validate(&graph),
        Err(ScheduleViolation::WrongLength {
            expected: 2,
            actual: 1
        })
    );

    let outside = Schedule::from_placements(&graph, vec![at(0, 0), at(0, 2)], 2);
    assert!(matches!(
        outside.validate(&graph),
        Err(ScheduleViolation::ProcessorOutOfRange { task: 1, .. })
    ));

    let mut wrong_finish = Schedule::from_placements(&graph, vec![at(0, 0), at(0, 1)], 2);
    wrong_finish.finish_time = 5;
    assert_eq!(
        wrong_finish.validate(&graph),
        Err(ScheduleViolation::FinishMismatch {
            reported: 5,
            actual: 1
        })
    );
}

#[test]
fn test_summary_rendering() {
    let graph = GraphBuilder::new().task("a", 2).task("b", 1).build();
    let schedule = Schedule::from_placements(&graph, vec![at(0, 0), at(0, 1)], 2);

    let brief = schedule.render_summary(&graph, SummaryStyle::Brief);
    assert_eq!(brief, "finish time 2 (2 tasks on 2 processors)\n");

    let timeline = schedule.render_summary(&graph, SummaryStyle::Timeline);
    assert!(timeline.contains("  P1: a[0..2]\n"));
    assert!(timeline.contains("  P2: b[0..1]\n"));
}
