use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;

use crate::auth::AuthenticatedUser;
use crate::storage::RepositoryError;

use super::domain::PostId;
use super::repository::CommunityRepository;
use super::service::{CommunityService, CommunityServiceError, NewComment, NewPost};

/// Router builder exposing the community feed.
pub fn community_router<R>(service: Arc<CommunityService<R>>) -> Router
where
    R: CommunityRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/posts",
            post(create_post_handler::<R>).get(feed_handler::<R>),
        )
        .route("/api/v1/posts/:post_id/like", post(like_handler::<R>))
        .route(
            "/api/v1/posts/:post_id/comments",
            post(comment_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn create_post_handler<R>(
    State(service): State<Arc<CommunityService<R>>>,
    user: AuthenticatedUser,
    axum::Json(post): axum::Json<NewPost>,
) -> Response
where
    R: CommunityRepository + 'static,
{
    match service.create_post(&user.id, post) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record)).into_response(),
        Err(err) => community_error_response(err),
    }
}

pub(crate) async fn feed_handler<R>(
    State(service): State<Arc<CommunityService<R>>>,
    _user: AuthenticatedUser,
) -> Response
where
    R: CommunityRepository + 'static,
{
    match service.feed() {
        Ok(views) => (StatusCode::OK, axum::Json(views)).into_response(),
        Err(err) => community_error_response(err),
    }
}

pub(crate) async fn like_handler<R>(
    State(service): State<Arc<CommunityService<R>>>,
    user: AuthenticatedUser,
    Path(post_id): Path<String>,
) -> Response
where
    R: CommunityRepository + 'static,
{
    match service.like(&PostId(post_id), &user.id) {
        Ok(()) => (
            StatusCode::OK,
            axum::Json(json!({ "success": true, "message": "post liked" })),
        )
            .into_response(),
        Err(err) => community_error_response(err),
    }
}

pub(crate) async fn comment_handler<R>(
    State(service): State<Arc<CommunityService<R>>>,
    user: AuthenticatedUser,
    Path(post_id): Path<String>,
    axum::Json(comment): axum::Json<NewComment>,
) -> Response
where
    R: CommunityRepository + 'static,
{
    match service.comment(&PostId(post_id), &user.id, comment) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record)).into_response(),
        Err(err) => community_error_response(err),
    }
}

fn community_error_response(err: CommunityServiceError) -> Response {
    let status = match &err {
        CommunityServiceError::MissingFields
        | CommunityServiceError::MissingContent
        | CommunityServiceError::AlreadyLiked => StatusCode::BAD_REQUEST,
        CommunityServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        CommunityServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (status, axum::Json(json!({ "error": err.to_string() }))).into_response()
}
