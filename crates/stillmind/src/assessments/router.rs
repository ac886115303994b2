use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use crate::auth::AuthenticatedUser;
use crate::storage::RepositoryError;

use super::domain::AssessmentId;
use super::repository::AssessmentRepository;
use super::scoring::ScoringError;
use super::service::{AssessmentService, AssessmentServiceError, AssessmentSubmission};

/// Router builder exposing the assessment HTTP surface. Every route derives
/// the owner from the verified session token.
pub fn assessment_router<R>(service: Arc<AssessmentService<R>>) -> Router
where
    R: AssessmentRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/assessments",
            post(submit_handler::<R>).get(list_handler::<R>),
        )
        .route("/api/v1/assessments/summary", get(summary_handler::<R>))
        .route(
            "/api/v1/assessments/:assessment_id",
            get(get_handler::<R>).delete(delete_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    user: AuthenticatedUser,
    axum::Json(submission): axum::Json<AssessmentSubmission>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    match service.submit(&user.id, submission) {
        Ok(record) => (
            StatusCode::OK,
            axum::Json(json!({
                "message": "assessment recorded",
                "assessment": record,
            })),
        )
            .into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    user: AuthenticatedUser,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    match service.list(&user.id) {
        Ok(records) => (StatusCode::OK, axum::Json(records)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn summary_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    user: AuthenticatedUser,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    match service.summary(&user.id) {
        Ok(summary) => {
            (StatusCode::OK, axum::Json(json!({ "summary": summary }))).into_response()
        }
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn get_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    user: AuthenticatedUser,
    Path(assessment_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    let id = AssessmentId(assessment_id);
    match service.get(&user.id, &id) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn delete_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    user: AuthenticatedUser,
    Path(assessment_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    let id = AssessmentId(assessment_id);
    match service.delete(&user.id, &id) {
        Ok(()) => (
            StatusCode::OK,
            axum::Json(json!({ "message": "assessment deleted successfully" })),
        )
            .into_response(),
        Err(err) => service_error_response(err),
    }
}

/// Map a validation error to its structured payload: a stable `kind` tag, a
/// human-readable message, and `expected` for length mismatches.
fn validation_payload(err: &ScoringError) -> serde_json::Value {
    let kind = match err {
        ScoringError::MissingInput => "missing_input",
        ScoringError::InvalidType { .. } => "invalid_type",
        ScoringError::LengthMismatch { .. } => "length_mismatch",
        ScoringError::OutOfRangeResponse { .. } => "out_of_range_response",
    };

    let mut payload = json!({
        "kind": kind,
        "message": err.to_string(),
    });

    if let ScoringError::LengthMismatch { expected, .. } = err {
        payload["expected"] = json!(expected);
    }

    payload
}

fn service_error_response(err: AssessmentServiceError) -> Response {
    match err {
        AssessmentServiceError::Validation(validation) => (
            StatusCode::BAD_REQUEST,
            axum::Json(json!({ "error": validation_payload(&validation) })),
        )
            .into_response(),
        AssessmentServiceError::Repository(RepositoryError::NotFound) => (
            StatusCode::NOT_FOUND,
            axum::Json(json!({ "error": "assessment not found" })),
        )
            .into_response(),
        AssessmentServiceError::Repository(other) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            axum::Json(json!({ "error": other.to_string() })),
        )
            .into_response(),
    }
}
