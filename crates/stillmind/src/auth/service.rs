use std::sync::Arc;

use super::accounts::{AccountDirectory, DirectoryError, UserAccount};
use super::token::{AuthError, TokenAuthenticator};

/// Registration and login flows over the directory and token boundary.
pub struct AuthService<D> {
    directory: Arc<D>,
    tokens: Arc<TokenAuthenticator>,
}

impl<D> AuthService<D>
where
    D: AccountDirectory + 'static,
{
    pub fn new(directory: Arc<D>, tokens: Arc<TokenAuthenticator>) -> Self {
        Self { directory, tokens }
    }

    pub fn register(&self, email: &str, password: &str) -> Result<UserAccount, AuthFlowError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AuthFlowError::MissingCredentials);
        }
        let account = self.directory.create(email.trim(), password)?;
        tracing::info!(user = %account.id.0, "account registered");
        Ok(account)
    }

    /// Verify credentials and mint a session token.
    pub fn login(&self, email: &str, password: &str) -> Result<String, AuthFlowError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AuthFlowError::MissingCredentials);
        }
        let account = self.directory.verify_credentials(email.trim(), password)?;
        let token = self.tokens.issue(&account)?;
        tracing::info!(user = %account.id.0, "session token issued");
        Ok(token)
    }
}

/// Error raised by the registration and login flows.
#[derive(Debug, thiserror::Error)]
pub enum AuthFlowError {
    #[error("email and password are required")]
    MissingCredentials,
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    #[error(transparent)]
    Token(#[from] AuthError),
}
