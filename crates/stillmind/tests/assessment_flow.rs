//! End-to-end specifications for the assessment workflow delivered through
//! the public routers: register, log in, submit, list, summarize, and delete
//! over HTTP with real bearer tokens.

mod common {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::{Arc, Mutex};

    use chrono::Utc;

    use stillmind::assessments::domain::{AssessmentId, ScoredAssessment, UserId};
    use stillmind::assessments::AssessmentRepository;
    use stillmind::auth::{
        AccountDirectory, DirectoryError, ProfileChanges, TokenAuthenticator, UserAccount,
    };
    use stillmind::config::AuthConfig;
    use stillmind::storage::RepositoryError;

    pub(super) fn token_authenticator() -> Arc<TokenAuthenticator> {
        Arc::new(TokenAuthenticator::new(&AuthConfig {
            jwt_secret: "integration-test-secret".to_string(),
            token_ttl_minutes: 60,
        }))
    }

    #[derive(Default, Clone)]
    pub(super) struct MemoryRepository {
        records: Arc<Mutex<HashMap<AssessmentId, ScoredAssessment>>>,
    }

    impl AssessmentRepository for MemoryRepository {
        fn insert(&self, record: ScoredAssessment) -> Result<ScoredAssessment, RepositoryError> {
            let mut guard = self.records.lock().expect("repository mutex poisoned");
            if guard.contains_key(&record.id) {
                return Err(RepositoryError::Conflict);
            }
            guard.insert(record.id.clone(), record.clone());
            Ok(record)
        }

        fn list_for_owner(
            &self,
            owner: &UserId,
        ) -> Result<Vec<ScoredAssessment>, RepositoryError> {
            let guard = self.records.lock().expect("repository mutex poisoned");
            Ok(guard
                .values()
                .filter(|record| &record.owner == owner)
                .cloned()
                .collect())
        }

        fn fetch(
            &self,
            owner: &UserId,
            id: &AssessmentId,
        ) -> Result<Option<ScoredAssessment>, RepositoryError> {
            let guard = self.records.lock().expect("repository mutex poisoned");
            Ok(guard
                .get(id)
                .filter(|record| &record.owner == owner)
                .cloned())
        }

        fn delete(&self, owner: &UserId, id: &AssessmentId) -> Result<bool, RepositoryError> {
            let mut guard = self.records.lock().expect("repository mutex poisoned");
            match guard.get(id) {
                Some(record) if &record.owner == owner => {
                    guard.remove(id);
                    Ok(true)
                }
                _ => Ok(false),
            }
        }
    }

    struct StoredAccount {
        account: UserAccount,
        password: String,
    }

    /// Development-grade directory: deployments back this trait with a
    /// managed identity service instead.
    #[derive(Default)]
    pub(super) struct MemoryDirectory {
        accounts: Mutex<HashMap<String, StoredAccount>>,
        sequence: AtomicU64,
    }

    impl AccountDirectory for MemoryDirectory {
        fn create(&self, email: &str, password: &str) -> Result<UserAccount, DirectoryError> {
            let mut guard = self.accounts.lock().expect("account mutex poisoned");
            if guard.contains_key(email) {
                return Err(DirectoryError::EmailTaken);
            }
            let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
            let account = UserAccount {
                id: UserId(format!("user-{id:06}")),
                email: email.to_string(),
                username: None,
                bio: None,
                avatar_url: None,
                preferences: None,
                created_at: Utc::now(),
            };
            guard.insert(
                email.to_string(),
                StoredAccount {
                    account: account.clone(),
                    password: password.to_string(),
                },
            );
            Ok(account)
        }

        fn verify_credentials(
            &self,
            email: &str,
            password: &str,
        ) -> Result<UserAccount, DirectoryError> {
            let guard = self.accounts.lock().expect("account mutex poisoned");
            match guard.get(email) {
                Some(stored) if stored.password == password => Ok(stored.account.clone()),
                _ => Err(DirectoryError::InvalidCredentials),
            }
        }

        fn fetch(&self, id: &UserId) -> Result<Option<UserAccount>, DirectoryError> {
            let guard = self.accounts.lock().expect("account mutex poisoned");
            Ok(guard
                .values()
                .find(|stored| &stored.account.id == id)
                .map(|stored| stored.account.clone()))
        }

        fn update_profile(
            &self,
            id: &UserId,
            changes: ProfileChanges,
        ) -> Result<UserAccount, DirectoryError> {
            let mut guard = self.accounts.lock().expect("account mutex poisoned");
            let stored = guard
                .values_mut()
                .find(|stored| &stored.account.id == id)
                .ok_or(DirectoryError::NotFound)?;
            if let Some(username) = changes.username {
                stored.account.username = Some(username);
            }
            if let Some(bio) = changes.bio {
                stored.account.bio = Some(bio);
            }
            if let Some(avatar_url) = changes.avatar_url {
                stored.account.avatar_url = Some(avatar_url);
            }
            if let Some(preferences) = changes.preferences {
                stored.account.preferences = Some(preferences);
            }
            Ok(stored.account.clone())
        }
    }
}

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Extension;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{token_authenticator, MemoryDirectory, MemoryRepository};
use stillmind::assessments::{assessment_router, AssessmentService};
use stillmind::auth::{auth_router, AuthService};
use stillmind::profiles::profile_router;

fn app() -> axum::Router {
    let tokens = token_authenticator();
    let directory = Arc::new(MemoryDirectory::default());
    let repository = Arc::new(MemoryRepository::default());

    let auth = Arc::new(AuthService::new(directory.clone(), tokens.clone()));
    let assessments = Arc::new(AssessmentService::new(repository));

    assessment_router(assessments)
        .merge(auth_router(auth))
        .merge(profile_router(directory))
        .layer(Extension(tokens))
}

async fn read_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

fn post_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

fn get_authed(uri: &str, token: &str) -> Request<Body> {
    Request::get(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request builds")
}

async fn register_and_login(app: &axum::Router, email: &str) -> String {
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/v1/auth/register",
            None,
            json!({ "email": email, "password": "s3cret" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/v1/auth/login",
            None,
            json!({ "email": email, "password": "s3cret" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);

    read_json(response).await["token"]
        .as_str()
        .expect("token issued")
        .to_string()
}

#[tokio::test]
async fn submitted_assessments_round_trip_through_list_and_summary() {
    let app = app();
    let token = register_and_login(&app, "river@example.com").await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/v1/assessments",
            Some(&token),
            json!({ "type": "PHQ-9", "responses": [0, 1, 1, 1, 0, 1, 1, 0, 0] }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let submitted = read_json(response).await["assessment"].clone();
    assert_eq!(submitted["score"], json!(5));
    assert_eq!(submitted["severity"], json!("Mild"));

    let response = app
        .clone()
        .oneshot(get_authed("/api/v1/assessments", &token))
        .await
        .expect("route executes");
    let listed = read_json(response).await;
    let records = listed.as_array().expect("array body");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["type"], submitted["type"]);
    assert_eq!(records[0]["responses"], submitted["responses"]);
    assert_eq!(records[0]["score"], submitted["score"]);
    assert_eq!(records[0]["severity"], submitted["severity"]);

    let response = app
        .clone()
        .oneshot(get_authed("/api/v1/assessments/summary", &token))
        .await
        .expect("route executes");
    let summary = read_json(response).await;
    assert_eq!(summary["summary"]["PHQ-9"]["count"], json!(1));
    assert_eq!(summary["summary"]["PHQ-9"]["averageScore"], json!(5.0));
    assert_eq!(summary["summary"]["PHQ-9"]["latestSeverity"], json!("Mild"));
}

#[tokio::test]
async fn assessment_routes_require_a_valid_token() {
    let app = app();

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/v1/assessments",
            None,
            json!({ "type": "PHQ-9", "responses": [0, 0, 0, 0, 0, 0, 0, 0, 0] }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(get_authed("/api/v1/assessments", "not-a-token"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn validation_failures_identify_the_error_kind_over_http() {
    let app = app();
    let token = register_and_login(&app, "aspen@example.com").await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/v1/assessments",
            Some(&token),
            json!({ "type": "PHQ-9", "responses": [0, 1, 1, 1, 0, 1, 1, 0] }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json(response).await;
    assert_eq!(payload["error"]["kind"], json!("length_mismatch"));
    assert_eq!(payload["error"]["expected"], json!(9));

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/v1/assessments",
            Some(&token),
            json!({ "type": "GAD-7", "responses": [3, 3, 3, 3, 3, 3, 4] }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json(response).await;
    assert_eq!(payload["error"]["kind"], json!("out_of_range_response"));

    // A fractional element is a validation failure, not a decode failure.
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/v1/assessments",
            Some(&token),
            json!({ "type": "PHQ-9", "responses": [0, 1, 1.5, 1, 0, 1, 1, 0, 0] }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json(response).await;
    assert_eq!(payload["error"]["kind"], json!("out_of_range_response"));
}

#[tokio::test]
async fn users_cannot_see_or_delete_each_others_records() {
    let app = app();
    let first = register_and_login(&app, "wren@example.com").await;
    let second = register_and_login(&app, "lark@example.com").await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/v1/assessments",
            Some(&first),
            json!({ "type": "GAD-7", "responses": [1, 1, 1, 1, 1, 1, 1] }),
        ))
        .await
        .expect("route executes");
    let id = read_json(response).await["assessment"]["id"]
        .as_str()
        .expect("record id")
        .to_string();

    let response = app
        .clone()
        .oneshot(get_authed(&format!("/api/v1/assessments/{id}"), &second))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(
            Request::delete(format!("/api/v1/assessments/{id}"))
                .header(header::AUTHORIZATION, format!("Bearer {second}"))
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(get_authed(&format!("/api/v1/assessments/{id}"), &first))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn duplicate_registration_and_bad_logins_are_rejected() {
    let app = app();
    register_and_login(&app, "sage@example.com").await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/v1/auth/register",
            None,
            json!({ "email": "sage@example.com", "password": "other" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/v1/auth/login",
            None,
            json!({ "email": "sage@example.com", "password": "wrong" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json(response).await;
    assert_eq!(payload["error"], json!("invalid credentials"));

    // Unknown email gets the same response as a wrong password.
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/v1/auth/login",
            None,
            json!({ "email": "nobody@example.com", "password": "wrong" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json(response).await;
    assert_eq!(payload["error"], json!("invalid credentials"));
}

#[tokio::test]
async fn profile_updates_apply_only_the_provided_fields() {
    let app = app();
    let token = register_and_login(&app, "fern@example.com").await;

    let response = app
        .clone()
        .oneshot(
            Request::patch("/api/v1/profile")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::from(
                    json!({ "username": "fern", "bio": "one day at a time" }).to_string(),
                ))
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get_authed("/api/v1/profile", &token))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let profile = read_json(response).await;
    assert_eq!(profile["username"], json!("fern"));
    assert_eq!(profile["bio"], json!("one day at a time"));
    assert_eq!(profile["avatar_url"], Value::Null);
    assert_eq!(profile["email"], json!("fern@example.com"));
}
