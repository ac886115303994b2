use jsonwebtoken::{
    decode, encode, get_current_timestamp, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;

use super::accounts::UserAccount;

/// Claims carried by a session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub iat: u64,
    pub exp: u64,
}

/// Token failures surfaced to the HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing or malformed authorization header")]
    MissingCredentials,
    #[error("invalid or expired token")]
    Token(#[from] jsonwebtoken::errors::Error),
}

/// Issues and verifies HS256 session tokens with a fixed TTL.
pub struct TokenAuthenticator {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_seconds: u64,
}

impl TokenAuthenticator {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            ttl_seconds: config.token_ttl_minutes * 60,
        }
    }

    pub fn issue(&self, account: &UserAccount) -> Result<String, AuthError> {
        let iat = get_current_timestamp();
        let claims = Claims {
            sub: account.id.0.clone(),
            email: account.email.clone(),
            iat,
            exp: iat + self.ttl_seconds,
        };
        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        Ok(data.claims)
    }
}
