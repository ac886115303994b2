use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use serde_json::json;

use stillmind::assessments::domain::{AssessmentId, ScoredAssessment, UserId};
use stillmind::assessments::AssessmentRepository;
use stillmind::auth::{AccountDirectory, DirectoryError, ProfileChanges, UserAccount};
use stillmind::chat::{ChatError, ChatMessage, ChatProvider};
use stillmind::community::{CommunityPost, CommunityRepository, PostComment, PostId};
use stillmind::config::AiConfig;
use stillmind::storage::RepositoryError;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryAssessmentRepository {
    records: Arc<Mutex<HashMap<AssessmentId, ScoredAssessment>>>,
}

impl AssessmentRepository for InMemoryAssessmentRepository {
    fn insert(&self, record: ScoredAssessment) -> Result<ScoredAssessment, RepositoryError> {
        let mut guard = self.records.lock().map_err(poisoned)?;
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn list_for_owner(&self, owner: &UserId) -> Result<Vec<ScoredAssessment>, RepositoryError> {
        let guard = self.records.lock().map_err(poisoned)?;
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
        let guard = self.records.lock().map_err(poisoned)?;
        Ok(guard
            .get(id)
            .filter(|record| &record.owner == owner)
            .cloned())
    }

    fn delete(&self, owner: &UserId, id: &AssessmentId) -> Result<bool, RepositoryError> {
        let mut guard = self.records.lock().map_err(poisoned)?;
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

/// Development-grade directory keyed by email. Credentials are held in plain
/// text; deployments back [`AccountDirectory`] with a managed identity
/// service instead of this store.
#[derive(Default)]
pub(crate) struct InMemoryAccountDirectory {
    accounts: Mutex<HashMap<String, StoredAccount>>,
    sequence: AtomicU64,
}

impl AccountDirectory for InMemoryAccountDirectory {
    fn create(&self, email: &str, password: &str) -> Result<UserAccount, DirectoryError> {
        let mut guard = self.accounts.lock().map_err(directory_poisoned)?;
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
        let guard = self.accounts.lock().map_err(directory_poisoned)?;
        match guard.get(email) {
            Some(stored) if stored.password == password => Ok(stored.account.clone()),
            _ => Err(DirectoryError::InvalidCredentials),
        }
    }

    fn fetch(&self, id: &UserId) -> Result<Option<UserAccount>, DirectoryError> {
        let guard = self.accounts.lock().map_err(directory_poisoned)?;
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
        let mut guard = self.accounts.lock().map_err(directory_poisoned)?;
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

#[derive(Default)]
pub(crate) struct InMemoryCommunityRepository {
    posts: Mutex<HashMap<PostId, CommunityPost>>,
    likes: Mutex<HashMap<PostId, HashSet<UserId>>>,
    comments: Mutex<Vec<PostComment>>,
}

impl CommunityRepository for InMemoryCommunityRepository {
    fn insert_post(&self, post: CommunityPost) -> Result<CommunityPost, RepositoryError> {
        let mut guard = self.posts.lock().map_err(poisoned)?;
        if guard.contains_key(&post.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(post.id.clone(), post.clone());
        Ok(post)
    }

    fn list_posts(&self) -> Result<Vec<CommunityPost>, RepositoryError> {
        let guard = self.posts.lock().map_err(poisoned)?;
        Ok(guard.values().cloned().collect())
    }

    fn fetch_post(&self, id: &PostId) -> Result<Option<CommunityPost>, RepositoryError> {
        let guard = self.posts.lock().map_err(poisoned)?;
        Ok(guard.get(id).cloned())
    }

    fn insert_like(&self, post: &PostId, user: &UserId) -> Result<bool, RepositoryError> {
        let mut guard = self.likes.lock().map_err(poisoned)?;
        Ok(guard.entry(post.clone()).or_default().insert(user.clone()))
    }

    fn insert_comment(&self, comment: PostComment) -> Result<PostComment, RepositoryError> {
        let mut guard = self.comments.lock().map_err(poisoned)?;
        guard.push(comment.clone());
        Ok(comment)
    }

    fn like_count(&self, post: &PostId) -> Result<usize, RepositoryError> {
        let guard = self.likes.lock().map_err(poisoned)?;
        Ok(guard.get(post).map_or(0, HashSet::len))
    }

    fn comment_count(&self, post: &PostId) -> Result<usize, RepositoryError> {
        let guard = self.comments.lock().map_err(poisoned)?;
        Ok(guard
            .iter()
            .filter(|comment| &comment.post_id == post)
            .count())
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> RepositoryError {
    RepositoryError::Unavailable("store mutex poisoned".to_string())
}

fn directory_poisoned<T>(_: std::sync::PoisonError<T>) -> DirectoryError {
    DirectoryError::Unavailable("store mutex poisoned".to_string())
}

/// OpenAI-compatible completion client. Returns [`ChatError::NotConfigured`]
/// until an API key is supplied through the environment.
pub(crate) struct OpenAiChatProvider {
    client: reqwest::Client,
    config: AiConfig,
}

impl OpenAiChatProvider {
    pub(crate) fn new(config: AiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: ChatMessage,
}

impl ChatProvider for OpenAiChatProvider {
    fn complete(
        &self,
        messages: Vec<ChatMessage>,
    ) -> impl Future<Output = Result<ChatMessage, ChatError>> + Send {
        async move {
            let api_key = self
                .config
                .api_key
                .as_deref()
                .ok_or(ChatError::NotConfigured)?;

            let url = format!(
                "{}/chat/completions",
                self.config.base_url.trim_end_matches('/')
            );
            let response = self
                .client
                .post(&url)
                .bearer_auth(api_key)
                .json(&json!({
                    "model": self.config.model,
                    "messages": messages,
                }))
                .send()
                .await
                .map_err(|err| ChatError::Provider(err.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(ChatError::Provider(format!(
                    "completion request failed with status {status}"
                )));
            }

            let completion: CompletionResponse = response
                .json()
                .await
                .map_err(|err| ChatError::Provider(err.to_string()))?;

            completion
                .choices
                .into_iter()
                .next()
                .map(|choice| choice.message)
                .ok_or_else(|| ChatError::Provider("completion had no choices".to_string()))
        }
    }
}
