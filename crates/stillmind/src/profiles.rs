//! Profile read/update routes over the account directory.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;

use crate::auth::accounts::{AccountDirectory, DirectoryError, ProfileChanges};
use crate::auth::AuthenticatedUser;

/// Router builder exposing the caller's own profile.
pub fn profile_router<D>(directory: Arc<D>) -> Router
where
    D: AccountDirectory + 'static,
{
    Router::new()
        .route(
            "/api/v1/profile",
            get(profile_handler::<D>).patch(update_profile_handler::<D>),
        )
        .with_state(directory)
}

pub(crate) async fn profile_handler<D>(
    State(directory): State<Arc<D>>,
    user: AuthenticatedUser,
) -> Response
where
    D: AccountDirectory + 'static,
{
    match directory.fetch(&user.id) {
        Ok(Some(account)) => (StatusCode::OK, axum::Json(account)).into_response(),
        Ok(None) => not_found_response(),
        Err(err) => directory_error_response(err),
    }
}

pub(crate) async fn update_profile_handler<D>(
    State(directory): State<Arc<D>>,
    user: AuthenticatedUser,
    axum::Json(changes): axum::Json<ProfileChanges>,
) -> Response
where
    D: AccountDirectory + 'static,
{
    match directory.update_profile(&user.id, changes) {
        Ok(account) => (
            StatusCode::OK,
            axum::Json(json!({
                "message": "profile updated",
                "user": account,
            })),
        )
            .into_response(),
        Err(DirectoryError::NotFound) => not_found_response(),
        Err(err) => directory_error_response(err),
    }
}

fn not_found_response() -> Response {
    (
        StatusCode::NOT_FOUND,
        axum::Json(json!({ "error": "user not found" })),
    )
        .into_response()
}

fn directory_error_response(err: DirectoryError) -> Response {
    match err {
        DirectoryError::NotFound => not_found_response(),
        other => (
            StatusCode::INTERNAL_SERVER_ERROR,
            axum::Json(json!({ "error": other.to_string() })),
        )
            .into_response(),
    }
}
