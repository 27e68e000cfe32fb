mod aggregate;
mod config;
mod levels;
mod thresholds;

pub use aggregate::{CategoryReach, PassCounts};
pub use config::{CoreThreshold, LevelThreshold, RulesError, TylRules};
pub use thresholds::{ResolvedThreshold, ThresholdSource};

use serde::{Deserialize, Serialize};

use super::domain::{BaseCode, Category, CoreVariant, MarkRecord, StudentMarks};

/// Stateless evaluator applying one immutable rules table.
#[derive(Debug, Clone)]
pub struct TylEvaluator {
    rules: TylRules,
}

impl TylEvaluator {
    pub fn new(rules: TylRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &TylRules {
        &self.rules
    }

    /// Passing threshold for a raw code. Never fails: unknown codes get the flagged fallback.
    pub fn threshold_for(&self, code: &str, variant: Option<CoreVariant>) -> ResolvedThreshold {
        thresholds::resolve_raw(&self.rules, code, variant)
    }

    /// Combined internal assessment (nulls as zero) against the threshold of `subject_code`.
    pub fn did_pass(&self, record: &MarkRecord, subject_code: &str) -> bool {
        let threshold = self.threshold_for(subject_code, None);
        record.combined_score() >= f32::from(threshold.value)
    }

    /// [`Self::did_pass`] using the record's own subject code.
    pub fn passes(&self, record: &MarkRecord) -> bool {
        self.did_pass(record, &record.subject_code)
    }

    /// Pass/fail detail for a TYL record; `None` when the code is not a TYL subject.
    pub fn subject_outcome(&self, record: &MarkRecord) -> Option<SubjectOutcome> {
        let code = record.tyl_code()?;
        let threshold = thresholds::resolve(&self.rules, &code);
        let combined_score = record.combined_score();

        Some(SubjectOutcome {
            subject_code: code.to_string(),
            base_code: code.base().to_string(),
            category: code.category,
            level: code.level,
            semester: record.semester,
            entered: record.is_entered(),
            combined_score,
            threshold: threshold.value,
            threshold_source: threshold.source,
            passed: combined_score >= f32::from(threshold.value),
        })
    }

    /// Highest contiguously passed level of `category` over the supplied history.
    pub fn level_reached(&self, marks: &[MarkRecord], category: Category) -> u8 {
        let subjects = self.rules.category_subjects(category);
        self.level_reached_for(marks, &subjects)
    }

    /// Level reached for an explicit list of base codes.
    pub fn level_reached_for(&self, marks: &[MarkRecord], subjects: &[BaseCode]) -> u8 {
        levels::level_reached(self, marks, subjects)
    }

    pub fn levels(&self, marks: &[MarkRecord]) -> LevelsReached {
        LevelsReached {
            lx: self.level_reached(marks, Category::Language),
            sx: self.level_reached(marks, Category::SoftSkills),
            ax: self.level_reached(marks, Category::Aptitude),
            px: self.level_reached(marks, Category::Programming),
            cx: self.level_reached(marks, Category::Core),
        }
    }

    /// Students passing each base code and variant across the supplied histories.
    pub fn cohort_pass_counts(&self, students: &[StudentMarks]) -> PassCounts {
        aggregate::pass_counts(self, students)
    }

    /// Students with at least one pass in each category.
    pub fn category_reach(&self, students: &[StudentMarks]) -> CategoryReach {
        aggregate::category_reach(self, students)
    }
}

impl Default for TylEvaluator {
    fn default() -> Self {
        Self::new(TylRules::standard())
    }
}

/// Per-subject evaluation detail for single-student views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectOutcome {
    pub subject_code: String,
    pub base_code: String,
    pub category: Category,
    pub level: u8,
    pub semester: u8,
    pub entered: bool,
    pub combined_score: f32,
    pub threshold: u16,
    pub threshold_source: ThresholdSource,
    pub passed: bool,
}

/// Level reached per category for one student.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelsReached {
    pub lx: u8,
    pub sx: u8,
    pub ax: u8,
    pub px: u8,
    pub cx: u8,
}

impl LevelsReached {
    pub fn get(&self, category: Category) -> u8 {
        match category {
            Category::Language => self.lx,
            Category::SoftSkills => self.sx,
            Category::Aptitude => self.ax,
            Category::Programming => self.px,
            Category::Core => self.cx,
        }
    }
}
