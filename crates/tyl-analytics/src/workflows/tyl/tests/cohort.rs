use super::common::*;
use crate::workflows::tyl::domain::EvaluationScope;
use crate::workflows::tyl::{summarize, CohortFilter};

#[test]
fn filter_matches_department_case_insensitively() {
    let filter = CohortFilter::department("cse");
    assert!(filter.matches(&profile("S1", "CSE", "A", 3)));
    assert!(!filter.matches(&profile("S2", "ISE", "A", 3)));
}

#[test]
fn filter_narrows_by_section_and_year() {
    let filter = CohortFilter::department("CSE").with_section("b").with_year(2);
    assert!(filter.matches(&profile("S1", "CSE", "B", 2)));
    assert!(!filter.matches(&profile("S2", "CSE", "A", 2)));
    assert!(!filter.matches(&profile("S3", "CSE", "B", 3)));

    let mut unsectioned = profile("S4", "CSE", "B", 2);
    unsectioned.section = None;
    assert!(!filter.matches(&unsectioned));
}

#[test]
fn empty_department_matches_everyone() {
    let filter = CohortFilter::default();
    assert!(filter.matches(&profile("S1", "CSE", "A", 3)));
    assert!(filter.matches(&profile("S2", "MECH", "C", 1)));
}

#[test]
fn students_without_marks_still_count_toward_the_total() {
    let mut students = Vec::new();
    for index in 0..10 {
        let id = format!("S{index}");
        let marks = if index < 7 {
            vec![mark(&id, "a1", 5, 30.0, 25.0)]
        } else {
            Vec::new()
        };
        students.push(student(profile(&id, "CSE", "A", 3), marks));
    }

    let filter = CohortFilter::department("CSE");
    let summary = summarize(&evaluator(), &filter, EvaluationScope::AllHistory, &students);

    assert_eq!(summary.total_students, 10);
    assert_eq!(summary.passed_counts.get("a1"), Some(&7));
    assert_eq!(summary.levels_reached.ax, 7);
    assert_eq!(summary.filter, filter);
}

#[test]
fn empty_cohort_summarizes_to_zero() {
    let summary = summarize(
        &evaluator(),
        &CohortFilter::department("CSE"),
        EvaluationScope::Semester(5),
        &[],
    );
    assert_eq!(summary.total_students, 0);
    assert!(summary.passed_counts.is_empty());
    assert_eq!(summary.scope, EvaluationScope::Semester(5));
}

#[test]
fn summary_serializes_scope_as_a_tagged_value() {
    let summary = summarize(
        &evaluator(),
        &CohortFilter::department("CSE"),
        EvaluationScope::Semester(5),
        &[],
    );
    let value = serde_json::to_value(&summary).expect("summary serializes");
    assert_eq!(value["scope"]["kind"], "semester");
    assert_eq!(value["scope"]["semester"], 5);

    let all = serde_json::to_value(EvaluationScope::AllHistory).expect("scope serializes");
    assert_eq!(all["kind"], "all_history");
}
