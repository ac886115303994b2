use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use stillmind::assessments::{assessment_router, AssessmentRepository, AssessmentService};
use stillmind::auth::{auth_router, AccountDirectory, AuthService};
use stillmind::chat::{chat_router, ChatProvider, ChatService};
use stillmind::community::{community_router, CommunityRepository, CommunityService};
use stillmind::profiles::profile_router;

pub(crate) fn with_api_routes<R, D, C, P>(
    assessments: Arc<AssessmentService<R>>,
    auth: Arc<AuthService<D>>,
    directory: Arc<D>,
    community: Arc<CommunityService<C>>,
    chat: Arc<ChatService<P>>,
) -> axum::Router
where
    R: AssessmentRepository + 'static,
    D: AccountDirectory + 'static,
    C: CommunityRepository + 'static,
    P: ChatProvider + 'static,
{
    assessment_router(assessments)
        .merge(auth_router(auth))
        .merge(profile_router(directory))
        .merge(community_router(community))
        .merge(chat_router(chat))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
