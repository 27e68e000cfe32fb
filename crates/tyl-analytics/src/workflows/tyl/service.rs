use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::classifier;
use super::cohort::{self, CohortFilter};
use super::domain::{
    EvaluationScope, MarkEntry, MarkRecord, StudentId, StudentMarks, StudentProfile,
    FINAL_SEMESTER, MAX_ASSIGNMENT, MAX_INTERNAL_ASSESSMENT,
};
use super::evaluation::{TylEvaluator, TylRules};
use super::repository::{RepositoryError, TylRecordStore};
use super::views::{CohortReport, StudentReport};

/// Service composing the record store and the evaluator.
pub struct TylAnalysisService<S> {
    store: Arc<S>,
    evaluator: Arc<TylEvaluator>,
}

impl<S> TylAnalysisService<S>
where
    S: TylRecordStore + 'static,
{
    pub fn new(store: Arc<S>, rules: TylRules) -> Self {
        Self {
            store,
            evaluator: Arc::new(TylEvaluator::new(rules)),
        }
    }

    pub fn evaluator(&self) -> &TylEvaluator {
        &self.evaluator
    }

    /// Per-subject outcomes within `scope` and levels reached over the full history.
    pub fn student_report(
        &self,
        student_id: &StudentId,
        scope: EvaluationScope,
    ) -> Result<StudentReport, TylServiceError> {
        check_scope(scope)?;
        let profile = self
            .store
            .profile(student_id)?
            .ok_or_else(|| TylServiceError::UnknownStudent(student_id.clone()))?;

        let history = self
            .store
            .marks_for(student_id, EvaluationScope::AllHistory)?;

        let mut subjects: Vec<_> = history
            .iter()
            .filter(|record| scope.includes(record))
            .filter_map(|record| self.evaluator.subject_outcome(record))
            .collect();
        subjects.sort_by(|left, right| {
            (left.semester, left.category, left.level, &left.subject_code).cmp(&(
                right.semester,
                right.category,
                right.level,
                &right.subject_code,
            ))
        });

        let mistyped = history
            .iter()
            .filter(|record| scope.includes(record) && record.tyl_code().is_none())
            .filter(|record| classifier::shape(&record.subject_code).is_some())
            .filter(|record| {
                self.evaluator
                    .threshold_for(&record.subject_code, None)
                    .is_fallback()
            })
            .map(|record| classifier::normalize(&record.subject_code));
        let mut unrecognized_thresholds: Vec<String> = subjects
            .iter()
            .filter(|subject| subject.threshold_source.is_fallback())
            .map(|subject| subject.subject_code.clone())
            .chain(mistyped)
            .collect();
        unrecognized_thresholds.sort();
        unrecognized_thresholds.dedup();
        for code in &unrecognized_thresholds {
            warn!(
                student = %student_id,
                code = %code,
                "no threshold rule matched; fallback applied"
            );
        }

        let levels = self.evaluator.levels(&history);
        debug!(
            student = %student_id,
            scope = %scope.label(),
            subjects = subjects.len(),
            "student report evaluated"
        );

        Ok(StudentReport {
            generated_at: Utc::now(),
            profile,
            scope,
            subjects,
            levels,
            unrecognized_thresholds,
        })
    }

    /// Summarise every profile matching `filter`; `scope` only narrows which marks are counted.
    pub fn cohort_report(
        &self,
        filter: &CohortFilter,
        scope: EvaluationScope,
    ) -> Result<CohortReport, TylServiceError> {
        check_scope(scope)?;
        let profiles = self.store.profiles(filter)?;
        let mut students = Vec::with_capacity(profiles.len());

        for profile in profiles {
            let marks = self.store.marks_for(&profile.student_id, scope)?;
            students.push(StudentMarks { profile, marks });
        }

        let summary = cohort::summarize(&self.evaluator, filter, scope, &students);
        info!(
            department = %filter.department,
            scope = %scope.label(),
            total_students = summary.total_students,
            "cohort summary computed"
        );

        Ok(CohortReport {
            generated_at: Utc::now(),
            summary,
        })
    }

    /// Validate and upsert faculty-entered marks. Re-entry replaces the earlier record.
    pub fn record_marks(&self, entry: MarkEntry) -> Result<MarkRecord, TylServiceError> {
        let record = validate_entry(entry)?;

        if self.store.profile(&record.student_id)?.is_none() {
            return Err(TylServiceError::UnknownStudent(record.student_id));
        }

        if !classifier::is_tyl_subject(&record.subject_code) {
            debug!(code = %record.subject_code, "recording marks for a non-TYL subject");
        }

        self.store.upsert_mark(record.clone())?;
        Ok(record)
    }

    /// Move a student to the next semester. Mark records are left untouched.
    pub fn promote(&self, student_id: &StudentId) -> Result<StudentProfile, TylServiceError> {
        let mut profile = self
            .store
            .profile(student_id)?
            .ok_or_else(|| TylServiceError::UnknownStudent(student_id.clone()))?;

        if profile.current_semester >= FINAL_SEMESTER {
            return Err(MarkValidationError::FinalSemester(profile.current_semester).into());
        }

        profile.current_semester += 1;
        profile.year = profile.current_semester.div_ceil(2);
        self.store.update_profile(profile.clone())?;

        info!(student = %student_id, semester = profile.current_semester, "student promoted");
        Ok(profile)
    }
}

fn validate_entry(entry: MarkEntry) -> Result<MarkRecord, MarkValidationError> {
    let record = MarkRecord {
        student_id: entry.student_id,
        subject_code: classifier::normalize(&entry.subject_code),
        semester: entry.semester,
        ia1: entry.ia1,
        ia2: entry.ia2,
        assignment1: entry.assignment1,
        assignment2: entry.assignment2,
    };
    check_record(&record)?;
    Ok(record)
}

/// Bounds shared by faculty entry and CSV import.
pub(crate) fn check_record(record: &MarkRecord) -> Result<(), MarkValidationError> {
    if record.subject_code.trim().is_empty() {
        return Err(MarkValidationError::EmptySubjectCode);
    }

    check_semester(record.semester)?;
    check_score("ia1", record.ia1, MAX_INTERNAL_ASSESSMENT)?;
    check_score("ia2", record.ia2, MAX_INTERNAL_ASSESSMENT)?;
    check_score("assignment1", record.assignment1, MAX_ASSIGNMENT)?;
    check_score("assignment2", record.assignment2, MAX_ASSIGNMENT)
}

fn check_semester(semester: u8) -> Result<(), MarkValidationError> {
    if (1..=FINAL_SEMESTER).contains(&semester) {
        Ok(())
    } else {
        Err(MarkValidationError::SemesterOutOfRange(semester))
    }
}

fn check_scope(scope: EvaluationScope) -> Result<(), MarkValidationError> {
    match scope {
        EvaluationScope::AllHistory => Ok(()),
        EvaluationScope::Semester(semester) => check_semester(semester),
    }
}

fn check_score(
    field: &'static str,
    value: Option<f32>,
    max: f32,
) -> Result<(), MarkValidationError> {
    match value {
        Some(score) if !score.is_finite() || score < 0.0 || score > max => {
            Err(MarkValidationError::ScoreOutOfRange {
                field,
                value: score,
                max,
            })
        }
        _ => Ok(()),
    }
}

/// Rejected mark entry or promotion.
#[derive(Debug, thiserror::Error)]
pub enum MarkValidationError {
    #[error("subject code must not be empty")]
    EmptySubjectCode,
    #[error("semester {0} is outside 1-8")]
    SemesterOutOfRange(u8),
    #[error("{field} score {value} is outside 0-{max}")]
    ScoreOutOfRange {
        field: &'static str,
        value: f32,
        max: f32,
    },
    #[error("student is already in semester {0}, the final semester")]
    FinalSemester(u8),
}

/// Error raised by the analysis service.
#[derive(Debug, thiserror::Error)]
pub enum TylServiceError {
    #[error(transparent)]
    Validation(#[from] MarkValidationError),
    #[error("unknown student {0}")]
    UnknownStudent(StudentId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
