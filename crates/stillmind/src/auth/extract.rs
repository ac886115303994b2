use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::assessments::domain::UserId;

use super::token::TokenAuthenticator;

/// Request identity recovered from a verified bearer token.
///
/// Requires an `Extension<Arc<TokenAuthenticator>>` layer on the router;
/// the server wires that in once at startup.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub email: String,
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": message })),
    )
        .into_response()
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let authenticator = parts
            .extensions
            .get::<Arc<TokenAuthenticator>>()
            .cloned()
            .ok_or_else(|| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "token authenticator not configured" })),
                )
                    .into_response()
            })?;

        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| unauthorized("missing or malformed authorization header"))?;

        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or_else(|| unauthorized("missing or malformed authorization header"))?;

        let claims = authenticator
            .verify(token)
            .map_err(|_| unauthorized("invalid or expired token"))?;

        Ok(AuthenticatedUser {
            id: UserId(claims.sub),
            email: claims.email,
        })
    }
}
