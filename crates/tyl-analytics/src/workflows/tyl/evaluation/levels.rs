use std::cmp::Ordering;

use super::super::domain::{BaseCode, MarkRecord};
use super::TylEvaluator;

struct Attempt {
    level: u8,
    passed: bool,
}

/// Levels must be passed contiguously from the bottom of the category.
///
/// Bases without an entered record are skipped. Any failure among the entered ones yields 0;
/// otherwise the result is the highest entered level.
pub(crate) fn level_reached(
    evaluator: &TylEvaluator,
    marks: &[MarkRecord],
    subjects: &[BaseCode],
) -> u8 {
    let mut ordered = subjects.to_vec();
    ordered.sort_by_key(|base| base.level);

    let attempts: Vec<Attempt> = ordered
        .iter()
        .filter_map(|base| best_attempt(evaluator, marks, *base))
        .collect();

    let Some(highest) = attempts.last().map(|attempt| attempt.level) else {
        return 0;
    };

    for attempt in &attempts {
        if !attempt.passed {
            return 0;
        }
    }

    highest
}

/// Re-entries across semesters share a base code; a passing attempt beats a failing one,
/// then the higher combined score wins.
fn best_attempt(evaluator: &TylEvaluator, marks: &[MarkRecord], base: BaseCode) -> Option<Attempt> {
    marks
        .iter()
        .filter(|record| record.is_entered())
        .filter(|record| {
            record
                .tyl_code()
                .map(|code| code.base() == base)
                .unwrap_or(false)
        })
        .map(|record| (evaluator.passes(record), record.combined_score()))
        .max_by(|left, right| {
            left.0
                .cmp(&right.0)
                .then_with(|| left.1.partial_cmp(&right.1).unwrap_or(Ordering::Equal))
        })
        .map(|(passed, _)| Attempt {
            level: base.level,
            passed,
        })
}
