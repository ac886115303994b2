use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::assessments::domain::{AssessmentId, ScoredAssessment, UserId};
use crate::assessments::repository::AssessmentRepository;
use crate::assessments::service::{AssessmentService, AssessmentSubmission};
use crate::auth::AuthenticatedUser;
use crate::storage::RepositoryError;

pub(super) fn owner() -> UserId {
    UserId("user-000001".to_string())
}

pub(super) fn other_owner() -> UserId {
    UserId("user-000002".to_string())
}

pub(super) fn authenticated(user: &UserId) -> AuthenticatedUser {
    AuthenticatedUser {
        id: user.clone(),
        email: format!("{}@example.com", user.0),
    }
}

pub(super) fn responses(values: &[i64]) -> Option<Vec<Value>> {
    Some(values.iter().copied().map(Value::from).collect())
}

pub(super) fn phq9_submission() -> AssessmentSubmission {
    AssessmentSubmission {
        kind: Some("PHQ-9".to_string()),
        responses: responses(&[0, 1, 1, 1, 0, 1, 1, 0, 0]),
    }
}

pub(super) fn gad7_submission() -> AssessmentSubmission {
    AssessmentSubmission {
        kind: Some("GAD-7".to_string()),
        responses: responses(&[3, 3, 3, 3, 3, 3, 3]),
    }
}

pub(super) fn build_service() -> (AssessmentService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = AssessmentService::new(repository.clone());
    (service, repository)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<AssessmentId, ScoredAssessment>>>,
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

    fn list_for_owner(&self, owner: &UserId) -> Result<Vec<ScoredAssessment>, RepositoryError> {
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

pub(super) struct UnavailableRepository;

impl AssessmentRepository for UnavailableRepository {
    fn insert(&self, _record: ScoredAssessment) -> Result<ScoredAssessment, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_for_owner(&self, _owner: &UserId) -> Result<Vec<ScoredAssessment>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(
        &self,
        _owner: &UserId,
        _id: &AssessmentId,
    ) -> Result<Option<ScoredAssessment>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _owner: &UserId, _id: &AssessmentId) -> Result<bool, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
