use super::domain::{AssessmentId, ScoredAssessment, UserId};
use crate::storage::RepositoryError;

/// Storage abstraction so the service module can be exercised in isolation.
///
/// Every query is owner-scoped: a fetch or delete against a record owned by
/// someone else behaves exactly like a missing record, so the HTTP surface
/// never leaks the existence of other users' data.
pub trait AssessmentRepository: Send + Sync {
    fn insert(&self, record: ScoredAssessment) -> Result<ScoredAssessment, RepositoryError>;
    fn list_for_owner(&self, owner: &UserId) -> Result<Vec<ScoredAssessment>, RepositoryError>;
    fn fetch(
        &self,
        owner: &UserId,
        id: &AssessmentId,
    ) -> Result<Option<ScoredAssessment>, RepositoryError>;
    /// Returns `true` when a record was removed.
    fn delete(&self, owner: &UserId, id: &AssessmentId) -> Result<bool, RepositoryError>;
}
