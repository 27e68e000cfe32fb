use super::cohort::CohortFilter;
use super::domain::{EvaluationScope, MarkRecord, StudentId, StudentProfile};

/// Storage abstraction over profiles and mark records so the service can be exercised in isolation.
///
/// Implementations must not consult a student's current semester when asked for
/// [`EvaluationScope::AllHistory`].
pub trait TylRecordStore: Send + Sync {
    fn profile(&self, id: &StudentId) -> Result<Option<StudentProfile>, RepositoryError>;
    fn profiles(&self, filter: &CohortFilter) -> Result<Vec<StudentProfile>, RepositoryError>;
    fn marks_for(
        &self,
        id: &StudentId,
        scope: EvaluationScope,
    ) -> Result<Vec<MarkRecord>, RepositoryError>;
    /// Insert or replace the record keyed by (student, normalised code, semester).
    fn upsert_mark(&self, record: MarkRecord) -> Result<(), RepositoryError>;
    fn update_profile(&self, profile: StudentProfile) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
