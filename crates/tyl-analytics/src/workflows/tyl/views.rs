use chrono::{DateTime, Utc};
use serde::Serialize;

use super::cohort::CohortSummary;
use super::domain::{EvaluationScope, StudentProfile};
use super::evaluation::{LevelsReached, SubjectOutcome};

/// Single-student view: per-subject outcomes plus level reached per category.
#[derive(Debug, Clone, Serialize)]
pub struct StudentReport {
    pub generated_at: DateTime<Utc>,
    pub profile: StudentProfile,
    pub scope: EvaluationScope,
    pub subjects: Vec<SubjectOutcome>,
    /// Always computed over the full mark history, whatever `scope` narrows `subjects` to.
    pub levels: LevelsReached,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unrecognized_thresholds: Vec<String>,
}

impl StudentReport {
    pub fn passed_subjects(&self) -> usize {
        self.subjects.iter().filter(|subject| subject.passed).count()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CohortReport {
    pub generated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub summary: CohortSummary,
}
