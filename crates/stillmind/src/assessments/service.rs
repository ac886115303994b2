use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;

use super::domain::{AssessmentId, AssessmentType, ScoredAssessment, UserId};
use super::repository::AssessmentRepository;
use super::scoring::{self, ScoringError};
use super::summary::{summarize, SummaryEntry};
use crate::storage::RepositoryError;

/// Inbound submission body. Both fields are optional at the serde layer so
/// the service can report `MissingInput` instead of a generic decode failure,
/// and responses stay raw JSON values so a non-integer element is classified
/// as an out-of-range response rather than a decode failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssessmentSubmission {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub responses: Option<Vec<serde_json::Value>>,
}

static ASSESSMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_assessment_id() -> AssessmentId {
    let id = ASSESSMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AssessmentId(format!("asmt-{id:06}"))
}

/// Service composing validation, the scoring engine, and the repository.
pub struct AssessmentService<R> {
    repository: Arc<R>,
}

impl<R> AssessmentService<R>
where
    R: AssessmentRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Validate and score a submission, then persist the resulting record.
    /// Validation completes before any persistence attempt.
    pub fn submit(
        &self,
        owner: &UserId,
        submission: AssessmentSubmission,
    ) -> Result<ScoredAssessment, AssessmentServiceError> {
        let raw_kind = submission.kind.ok_or(ScoringError::MissingInput)?;
        let responses = submission.responses.ok_or(ScoringError::MissingInput)?;

        let kind = AssessmentType::parse(&raw_kind).ok_or_else(|| ScoringError::InvalidType {
            raw: raw_kind.trim().to_string(),
        })?;

        let outcome = scoring::score_raw(kind, &responses)?;
        // Elements are known 0-3 integers once scoring succeeds.
        let responses = scoring::integer_responses(&responses)?;

        let record = ScoredAssessment {
            id: next_assessment_id(),
            owner: owner.clone(),
            kind,
            responses: responses.iter().map(|&value| value as u8).collect(),
            score: outcome.score,
            severity: outcome.severity.to_string(),
            created_at: Utc::now(),
        };

        let stored = self.repository.insert(record)?;
        tracing::debug!(
            id = %stored.id.0,
            kind = %stored.kind,
            score = stored.score,
            "assessment recorded"
        );
        Ok(stored)
    }

    /// All of the owner's records, newest first.
    pub fn list(&self, owner: &UserId) -> Result<Vec<ScoredAssessment>, AssessmentServiceError> {
        let mut records = self.repository.list_for_owner(owner)?;
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    /// Per-type statistics over the owner's full history. An owner with no
    /// records gets an empty mapping, not an error.
    pub fn summary(
        &self,
        owner: &UserId,
    ) -> Result<BTreeMap<AssessmentType, SummaryEntry>, AssessmentServiceError> {
        let records = self.repository.list_for_owner(owner)?;
        Ok(summarize(&records))
    }

    pub fn get(
        &self,
        owner: &UserId,
        id: &AssessmentId,
    ) -> Result<ScoredAssessment, AssessmentServiceError> {
        let record = self
            .repository
            .fetch(owner, id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    pub fn delete(
        &self,
        owner: &UserId,
        id: &AssessmentId,
    ) -> Result<(), AssessmentServiceError> {
        if self.repository.delete(owner, id)? {
            Ok(())
        } else {
            Err(RepositoryError::NotFound.into())
        }
    }
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error(transparent)]
    Validation(#[from] ScoringError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
