use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::assessments::domain::UserId;

/// A user account as exposed to the rest of the system. Credential material
/// never leaves the directory implementation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: UserId,
    pub email: String,
    pub username: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub preferences: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// Partial profile update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileChanges {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub preferences: Option<serde_json::Value>,
}

/// Identity boundary. Deployments back this trait with a managed identity
/// service; the workspace ships an in-memory implementation for development
/// and tests.
pub trait AccountDirectory: Send + Sync {
    fn create(&self, email: &str, password: &str) -> Result<UserAccount, DirectoryError>;
    /// The same failure is returned for an unknown email and a wrong
    /// password, so login responses cannot be used to probe for accounts.
    fn verify_credentials(&self, email: &str, password: &str)
        -> Result<UserAccount, DirectoryError>;
    fn fetch(&self, id: &UserId) -> Result<Option<UserAccount>, DirectoryError>;
    fn update_profile(
        &self,
        id: &UserId,
        changes: ProfileChanges,
    ) -> Result<UserAccount, DirectoryError>;
}

/// Error enumeration for directory failures.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("email already registered")]
    EmailTaken,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("account not found")]
    NotFound,
    #[error("directory unavailable: {0}")]
    Unavailable(String),
}
