//! TYL skill-track evaluation: subject classification, passing thresholds, contiguous level
//! tracking and cohort summaries.
//!
//! Evaluation always runs over whatever mark history the caller hands in. Reports built through
//! [`TylAnalysisService`] take an explicit [`EvaluationScope`]; `AllHistory` ignores the semester a
//! student is currently enrolled in so promotion never hides earlier TYL attempts.

pub mod classifier;
pub mod cohort;
pub mod domain;
pub(crate) mod evaluation;
pub mod import;
pub mod repository;
pub mod router;
pub mod service;
pub mod views;

#[cfg(test)]
mod tests;

pub use classifier::is_tyl_subject;
pub use cohort::{summarize, CohortFilter, CohortSummary};
pub use domain::{
    BaseCode, Category, CoreVariant, EvaluationScope, MarkEntry, MarkRecord, StudentId,
    StudentMarks, StudentProfile, SubjectCode, Variant,
};
pub use evaluation::{
    CategoryReach, CoreThreshold, LevelThreshold, LevelsReached, PassCounts, ResolvedThreshold,
    RulesError, SubjectOutcome, ThresholdSource, TylEvaluator, TylRules,
};
pub use import::{MarkImportError, MarkImporter};
pub use repository::{RepositoryError, TylRecordStore};
pub use router::{tyl_router, CohortRequest};
pub use service::{MarkValidationError, TylAnalysisService, TylServiceError};
pub use views::{CohortReport, StudentReport};
