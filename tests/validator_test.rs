// ==========================================
// ScheduleValidator 集成测试
// ==========================================
// 测试目标: 上下限违规、不可用日期违规、偏好命中统计
// ==========================================

mod test_helpers;

use duty_roster::domain::staff::StaffRecord;
use duty_roster::domain::violation::Violation;
use duty_roster::engine::ScheduleValidator;
use test_helpers::assignment_from;

#[test]
fn test_min_unmet_only() {
    let roster = vec![StaffRecord::new("A", 4, 8)];
    let assignment = assignment_from(10, |day| {
        if day < 3 {
            [Some(0), None]
        } else {
            [None, None]
        }
    });

    let report = ScheduleValidator::new().validate(&assignment, &roster);

    assert_eq!(
        report.violations,
        vec![Violation::MinUnmet {
            staff_index: 0,
            assigned: 3,
            min: 4
        }]
    );
    assert!(!report
        .violations
        .iter()
        .any(|v| matches!(v, Violation::MaxExceeded { .. })));
    assert_eq!(report.unfilled_slots, 17);
}

#[test]
fn test_unavailable_day_assigned() {
    let roster = vec![
        StaffRecord::from_parts("A", Vec::<u32>::new(), [5], 0, 10, false).unwrap(),
        StaffRecord::new("B", 0, 10),
    ];
    let assignment = assignment_from(10, |day| {
        if day == 5 {
            [Some(0), Some(1)]
        } else {
            [Some(1), None]
        }
    });

    let report = ScheduleValidator::new().validate(&assignment, &roster);

    let unavailable: Vec<_> = report
        .violations
        .iter()
        .filter(|v| matches!(v, Violation::UnavailableViolation { .. }))
        .collect();
    assert_eq!(
        unavailable,
        vec![&Violation::UnavailableViolation {
            staff_index: 0,
            day: 5
        }]
    );
    assert_eq!(report.violations_for(1).count(), 0);
}

#[test]
fn test_max_exceeded_and_doubles() {
    let roster = vec![StaffRecord::new("A", 0, 2)];
    // 两岗同一人计一天
    let assignment = assignment_from(4, |day| {
        if day == 0 {
            [Some(0), Some(0)]
        } else {
            [Some(0), None]
        }
    });

    let report = ScheduleValidator::new().validate(&assignment, &roster);

    assert_eq!(
        report.violations,
        vec![Violation::MaxExceeded {
            staff_index: 0,
            assigned: 4,
            max: 2
        }]
    );
    let tally = report.tally_for(0).unwrap();
    assert_eq!(tally.assigned, 4);
    assert_eq!(tally.double_days, 1);
}

#[test]
fn test_preferred_hits_are_not_violations() {
    let roster =
        vec![StaffRecord::from_parts("A", [0, 1, 2], Vec::<u32>::new(), 1, 5, false).unwrap()];
    let assignment = assignment_from(5, |day| {
        if day == 1 || day == 3 {
            [None, Some(0)]
        } else {
            [None, None]
        }
    });

    let report = ScheduleValidator::new().validate(&assignment, &roster);

    assert!(report.is_clean());
    let tally = report.tally_for(0).unwrap();
    assert_eq!(tally.preferred_hits, 1);
    assert_eq!(tally.assigned, 2);
    assert_eq!(tally.name, "A");
}
