use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::accounts::{AccountDirectory, DirectoryError};
use super::service::{AuthFlowError, AuthService};

#[derive(Debug, Deserialize)]
pub(crate) struct CredentialsRequest {
    #[serde(default)]
    pub(crate) email: Option<String>,
    #[serde(default)]
    pub(crate) password: Option<String>,
}

impl CredentialsRequest {
    fn split(self) -> (String, String) {
        (
            self.email.unwrap_or_default(),
            self.password.unwrap_or_default(),
        )
    }
}

/// Router builder exposing registration and login.
pub fn auth_router<D>(service: Arc<AuthService<D>>) -> Router
where
    D: AccountDirectory + 'static,
{
    Router::new()
        .route("/api/v1/auth/register", post(register_handler::<D>))
        .route("/api/v1/auth/login", post(login_handler::<D>))
        .with_state(service)
}

pub(crate) async fn register_handler<D>(
    State(service): State<Arc<AuthService<D>>>,
    axum::Json(request): axum::Json<CredentialsRequest>,
) -> Response
where
    D: AccountDirectory + 'static,
{
    let (email, password) = request.split();
    match service.register(&email, &password) {
        Ok(account) => (
            StatusCode::CREATED,
            axum::Json(json!({
                "message": "user registered successfully",
                "user": account,
            })),
        )
            .into_response(),
        Err(err) => auth_error_response(err),
    }
}

pub(crate) async fn login_handler<D>(
    State(service): State<Arc<AuthService<D>>>,
    axum::Json(request): axum::Json<CredentialsRequest>,
) -> Response
where
    D: AccountDirectory + 'static,
{
    let (email, password) = request.split();
    match service.login(&email, &password) {
        Ok(token) => (StatusCode::OK, axum::Json(json!({ "token": token }))).into_response(),
        Err(err) => auth_error_response(err),
    }
}

fn auth_error_response(err: AuthFlowError) -> Response {
    let status = match &err {
        AuthFlowError::MissingCredentials
        | AuthFlowError::Directory(DirectoryError::EmailTaken)
        | AuthFlowError::Directory(DirectoryError::InvalidCredentials)
        | AuthFlowError::Directory(DirectoryError::NotFound) => StatusCode::BAD_REQUEST,
        AuthFlowError::Directory(DirectoryError::Unavailable(_)) | AuthFlowError::Token(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (status, axum::Json(json!({ "error": err.to_string() }))).into_response()
}
