//! Self-report assessment intake, scoring, and summary aggregation.
//!
//! The scoring engine and summary aggregator are pure functions; persistence
//! sits behind [`repository::AssessmentRepository`] so the service and router
//! can be exercised against in-memory stores.

pub mod domain;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod summary;

#[cfg(test)]
mod tests;

pub use domain::{AssessmentId, AssessmentType, ScoredAssessment, UserId};
pub use repository::AssessmentRepository;
pub use router::assessment_router;
pub use scoring::{score, score_raw, ScoreOutcome, ScoringError};
pub use service::{AssessmentService, AssessmentServiceError, AssessmentSubmission};
pub use summary::{summarize, SummaryEntry};
