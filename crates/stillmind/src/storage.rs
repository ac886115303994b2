//! Shared failure vocabulary for the storage trait seams.

/// Error enumeration for repository failures.
///
/// `Unavailable` is the opaque storage-failure class: routers surface it as an
/// internal error without interpreting the payload, and never retry.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
