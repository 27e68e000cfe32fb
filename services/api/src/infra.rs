use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tyl_analytics::error::AppError;
use tyl_analytics::workflows::tyl::{
    CohortFilter, CoreVariant, EvaluationScope, MarkImporter, MarkRecord, RepositoryError,
    StudentId, StudentProfile, TylRecordStore,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

type MarkKey = (StudentId, String, u8);

#[derive(Default, Clone)]
pub(crate) struct InMemoryRecordStore {
    profiles: Arc<Mutex<HashMap<StudentId, StudentProfile>>>,
    marks: Arc<Mutex<HashMap<MarkKey, MarkRecord>>>,
}

impl InMemoryRecordStore {
    /// Later rows win when a CSV repeats a (student, code, semester) key.
    pub(crate) fn seeded(
        profiles: Vec<StudentProfile>,
        marks: Vec<MarkRecord>,
    ) -> Result<Self, RepositoryError> {
        let store = Self::default();
        for profile in profiles {
            store.update_profile(profile)?;
        }
        for record in marks {
            store.upsert_mark(record)?;
        }
        Ok(store)
    }

    pub(crate) fn from_csv(profiles: &Path, marks: &Path) -> Result<Self, AppError> {
        let profiles = MarkImporter::profiles_from_path(profiles)?;
        let marks = MarkImporter::marks_from_path(marks)?;
        Self::seeded(profiles, marks).map_err(|err| AppError::Analysis(err.into()))
    }

    fn poisoned(name: &str) -> RepositoryError {
        RepositoryError::Unavailable(format!("{name} mutex poisoned"))
    }
}

impl TylRecordStore for InMemoryRecordStore {
    fn profile(&self, id: &StudentId) -> Result<Option<StudentProfile>, RepositoryError> {
        let guard = self.profiles.lock().map_err(|_| Self::poisoned("profile"))?;
        Ok(guard.get(id).cloned())
    }

    fn profiles(&self, filter: &CohortFilter) -> Result<Vec<StudentProfile>, RepositoryError> {
        let guard = self.profiles.lock().map_err(|_| Self::poisoned("profile"))?;
        let mut matched: Vec<StudentProfile> = guard
            .values()
            .filter(|profile| filter.matches(profile))
            .cloned()
            .collect();
        matched.sort_by(|left, right| left.student_id.cmp(&right.student_id));
        Ok(matched)
    }

    fn marks_for(
        &self,
        id: &StudentId,
        scope: EvaluationScope,
    ) -> Result<Vec<MarkRecord>, RepositoryError> {
        let guard = self.marks.lock().map_err(|_| Self::poisoned("mark"))?;
        Ok(guard
            .values()
            .filter(|record| &record.student_id == id && scope.includes(record))
            .cloned()
            .collect())
    }

    fn upsert_mark(&self, record: MarkRecord) -> Result<(), RepositoryError> {
        let mut guard = self.marks.lock().map_err(|_| Self::poisoned("mark"))?;
        guard.insert(record.key(), record);
        Ok(())
    }

    fn update_profile(&self, profile: StudentProfile) -> Result<(), RepositoryError> {
        let mut guard = self.profiles.lock().map_err(|_| Self::poisoned("profile"))?;
        guard.insert(profile.student_id.clone(), profile);
        Ok(())
    }
}

pub(crate) fn parse_core_variant(raw: &str) -> Result<CoreVariant, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "odd" => Ok(CoreVariant::Odd),
        "full" => Ok(CoreVariant::Full),
        other => Err(format!("'{other}' is not a core variant (expected odd or full)")),
    }
}
