use serde::{Deserialize, Serialize};

use super::domain::{EvaluationScope, StudentMarks, StudentProfile};
use super::evaluation::{CategoryReach, PassCounts, TylEvaluator};

/// Reporting scope. Applied to profiles only; marks are never filtered by department or year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CohortFilter {
    pub department: String,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub year: Option<u8>,
}

impl CohortFilter {
    pub fn department(department: impl Into<String>) -> Self {
        Self {
            department: department.into(),
            section: None,
            year: None,
        }
    }

    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    pub fn with_year(mut self, year: u8) -> Self {
        self.year = Some(year);
        self
    }

    /// Case-insensitive on department and section. An empty department matches every profile.
    pub fn matches(&self, profile: &StudentProfile) -> bool {
        let department = self.department.trim();
        if !department.is_empty() && !department.eq_ignore_ascii_case(profile.department.trim()) {
            return false;
        }

        if let Some(section) = &self.section {
            let matches_section = profile
                .section
                .as_deref()
                .map(|value| value.trim().eq_ignore_ascii_case(section.trim()))
                .unwrap_or(false);
            if !matches_section {
                return false;
            }
        }

        match self.year {
            Some(year) => profile.year == year,
            None => true,
        }
    }
}

/// Cohort-level counts for reporting views. Percentages are left to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CohortSummary {
    pub filter: CohortFilter,
    pub scope: EvaluationScope,
    pub total_students: usize,
    pub passed_counts: PassCounts,
    pub levels_reached: CategoryReach,
}

/// Summarise an already-scoped student set.
///
/// Every profile counts toward `total_students`, including those with no TYL marks.
pub fn summarize(
    evaluator: &TylEvaluator,
    filter: &CohortFilter,
    scope: EvaluationScope,
    students: &[StudentMarks],
) -> CohortSummary {
    CohortSummary {
        filter: filter.clone(),
        scope,
        total_students: students.len(),
        passed_counts: evaluator.cohort_pass_counts(students),
        levels_reached: evaluator.category_reach(students),
    }
}
