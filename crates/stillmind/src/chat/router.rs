use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;

use crate::auth::AuthenticatedUser;

use super::service::{ActionPlanRequest, ChatRequest, ChatService, ChatServiceError};
use super::ChatProvider;

/// Router builder exposing the assistant proxy.
pub fn chat_router<P>(service: Arc<ChatService<P>>) -> Router
where
    P: ChatProvider + 'static,
{
    Router::new()
        .route("/api/v1/ai/chat", post(chat_handler::<P>))
        .route("/api/v1/ai/action-plan", post(action_plan_handler::<P>))
        .with_state(service)
}

pub(crate) async fn chat_handler<P>(
    State(service): State<Arc<ChatService<P>>>,
    _user: AuthenticatedUser,
    axum::Json(request): axum::Json<ChatRequest>,
) -> Response
where
    P: ChatProvider + 'static,
{
    match service.chat(request).await {
        Ok(reply) => (StatusCode::OK, axum::Json(json!({ "response": reply }))).into_response(),
        Err(err) => chat_error_response(err),
    }
}

pub(crate) async fn action_plan_handler<P>(
    State(service): State<Arc<ChatService<P>>>,
    _user: AuthenticatedUser,
    axum::Json(request): axum::Json<ActionPlanRequest>,
) -> Response
where
    P: ChatProvider + 'static,
{
    match service.action_plan(request).await {
        Ok(reply) => (StatusCode::OK, axum::Json(json!({ "response": reply }))).into_response(),
        Err(err) => chat_error_response(err),
    }
}

fn chat_error_response(err: ChatServiceError) -> Response {
    let status = match &err {
        ChatServiceError::MissingMessages | ChatServiceError::MissingAssessmentFields => {
            StatusCode::BAD_REQUEST
        }
        ChatServiceError::Provider(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (status, axum::Json(json!({ "error": err.to_string() }))).into_response()
}
