use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::workflows::tyl::cohort::CohortFilter;
use crate::workflows::tyl::domain::{
    EvaluationScope, MarkRecord, StudentId, StudentMarks, StudentProfile,
};
use crate::workflows::tyl::repository::{RepositoryError, TylRecordStore};
use crate::workflows::tyl::{TylAnalysisService, TylEvaluator, TylRules};

pub(super) fn evaluator() -> TylEvaluator {
    TylEvaluator::new(TylRules::standard())
}

pub(super) fn profile(id: &str, department: &str, section: &str, year: u8) -> StudentProfile {
    StudentProfile {
        student_id: StudentId(id.to_string()),
        name: format!("Student {id}"),
        department: department.to_string(),
        section: Some(section.to_string()),
        year,
        current_semester: year * 2 - 1,
    }
}

pub(super) fn mark(id: &str, code: &str, semester: u8, ia1: f32, ia2: f32) -> MarkRecord {
    MarkRecord {
        student_id: StudentId(id.to_string()),
        subject_code: code.to_string(),
        semester,
        ia1: Some(ia1),
        ia2: Some(ia2),
        assignment1: None,
        assignment2: None,
    }
}

pub(super) fn blank_mark(id: &str, code: &str, semester: u8) -> MarkRecord {
    MarkRecord {
        ia1: None,
        ia2: None,
        ..mark(id, code, semester, 0.0, 0.0)
    }
}

pub(super) fn student(profile: StudentProfile, marks: Vec<MarkRecord>) -> StudentMarks {
    StudentMarks { profile, marks }
}

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    profiles: Arc<Mutex<BTreeMap<StudentId, StudentProfile>>>,
    marks: Arc<Mutex<BTreeMap<(StudentId, String, u8), MarkRecord>>>,
}

impl MemoryStore {
    pub(super) fn with(profiles: Vec<StudentProfile>, marks: Vec<MarkRecord>) -> Self {
        let store = Self::default();
        for profile in profiles {
            store
                .update_profile(profile)
                .expect("memory store accepts profiles");
        }
        for record in marks {
            store.upsert_mark(record).expect("memory store accepts marks");
        }
        store
    }

    pub(super) fn mark_count(&self) -> usize {
        self.marks.lock().expect("marks mutex poisoned").len()
    }
}

impl TylRecordStore for MemoryStore {
    fn profile(&self, id: &StudentId) -> Result<Option<StudentProfile>, RepositoryError> {
        let guard = self.profiles.lock().expect("profiles mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn profiles(&self, filter: &CohortFilter) -> Result<Vec<StudentProfile>, RepositoryError> {
        let guard = self.profiles.lock().expect("profiles mutex poisoned");
        Ok(guard
            .values()
            .filter(|profile| filter.matches(profile))
            .cloned()
            .collect())
    }

    fn marks_for(
        &self,
        id: &StudentId,
        scope: EvaluationScope,
    ) -> Result<Vec<MarkRecord>, RepositoryError> {
        let guard = self.marks.lock().expect("marks mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| &record.student_id == id && scope.includes(record))
            .cloned()
            .collect())
    }

    fn upsert_mark(&self, record: MarkRecord) -> Result<(), RepositoryError> {
        let mut guard = self.marks.lock().expect("marks mutex poisoned");
        guard.insert(record.key(), record);
        Ok(())
    }

    fn update_profile(&self, profile: StudentProfile) -> Result<(), RepositoryError> {
        let mut guard = self.profiles.lock().expect("profiles mutex poisoned");
        guard.insert(profile.student_id.clone(), profile);
        Ok(())
    }
}

pub(super) struct UnavailableStore;

impl TylRecordStore for UnavailableStore {
    fn profile(&self, _id: &StudentId) -> Result<Option<StudentProfile>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn profiles(&self, _filter: &CohortFilter) -> Result<Vec<StudentProfile>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn marks_for(
        &self,
        _id: &StudentId,
        _scope: EvaluationScope,
    ) -> Result<Vec<MarkRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn upsert_mark(&self, _record: MarkRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_profile(&self, _profile: StudentProfile) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Two CSE students in section A and one ISE student, marks spread over several semesters.
pub(super) fn seeded_store() -> MemoryStore {
    let profiles = vec![
        profile("S1", "CSE", "A", 3),
        profile("S2", "CSE", "A", 3),
        profile("S3", "ISE", "B", 2),
    ];
    let marks = vec![
        mark("S1", "a1", 3, 30.0, 25.0),
        mark("S1", "a2", 4, 20.0, 20.0),
        mark("S1", "l1", 4, 40.0, 30.0),
        mark("S1", "p4-mad", 5, 35.0, 35.0),
        mark("S2", "a1", 5, 10.0, 10.0),
        mark("S2", "c2-odd", 5, 6.0, 5.0),
        mark("S3", "s1", 3, 25.0, 25.0),
    ];
    MemoryStore::with(profiles, marks)
}

pub(super) fn build_service(
    store: MemoryStore,
) -> (TylAnalysisService<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(store);
    let service = TylAnalysisService::new(store.clone(), TylRules::standard());
    (service, store)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
