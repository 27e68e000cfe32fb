use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::cohort::CohortFilter;
use super::domain::{EvaluationScope, MarkEntry, StudentId};
use super::repository::TylRecordStore;
use super::service::{TylAnalysisService, TylServiceError};

/// Cohort request body: the profile filter plus an optional semester narrowing.
#[derive(Debug, Deserialize)]
pub struct CohortRequest {
    #[serde(flatten)]
    pub filter: CohortFilter,
    #[serde(default)]
    pub semester: Option<u8>,
}

/// Router builder exposing TYL reports, mark entry and promotion.
pub fn tyl_router<S>(service: Arc<TylAnalysisService<S>>) -> Router
where
    S: TylRecordStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/tyl/students/:student_id",
            get(student_handler::<S>),
        )
        .route(
            "/api/v1/tyl/students/:student_id/semesters/:semester",
            get(student_semester_handler::<S>),
        )
        .route(
            "/api/v1/tyl/students/:student_id/promote",
            post(promote_handler::<S>),
        )
        .route("/api/v1/tyl/cohort", post(cohort_handler::<S>))
        .route("/api/v1/tyl/marks", put(marks_handler::<S>))
        .with_state(service)
}

pub(crate) async fn student_handler<S>(
    State(service): State<Arc<TylAnalysisService<S>>>,
    Path(student_id): Path<String>,
) -> Response
where
    S: TylRecordStore + 'static,
{
    let id = StudentId(student_id);
    match service.student_report(&id, EvaluationScope::AllHistory) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn student_semester_handler<S>(
    State(service): State<Arc<TylAnalysisService<S>>>,
    Path((student_id, semester)): Path<(String, u8)>,
) -> Response
where
    S: TylRecordStore + 'static,
{
    let id = StudentId(student_id);
    match service.student_report(&id, EvaluationScope::Semester(semester)) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn promote_handler<S>(
    State(service): State<Arc<TylAnalysisService<S>>>,
    Path(student_id): Path<String>,
) -> Response
where
    S: TylRecordStore + 'static,
{
    let id = StudentId(student_id);
    match service.promote(&id) {
        Ok(profile) => (StatusCode::OK, axum::Json(profile)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn cohort_handler<S>(
    State(service): State<Arc<TylAnalysisService<S>>>,
    axum::Json(request): axum::Json<CohortRequest>,
) -> Response
where
    S: TylRecordStore + 'static,
{
    let scope = EvaluationScope::from_optional(request.semester);
    match service.cohort_report(&request.filter, scope) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn marks_handler<S>(
    State(service): State<Arc<TylAnalysisService<S>>>,
    axum::Json(entry): axum::Json<MarkEntry>,
) -> Response
where
    S: TylRecordStore + 'static,
{
    match service.record_marks(entry) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: TylServiceError) -> Response {
    let status = match &error {
        TylServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        TylServiceError::UnknownStudent(_) => StatusCode::NOT_FOUND,
        TylServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
