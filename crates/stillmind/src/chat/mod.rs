//! Assistant proxy boundary. The provider itself is out of scope; the core
//! validates requests, builds prompts, and forwards them through the
//! [`ChatProvider`] trait.

pub mod router;
pub mod service;

use std::future::Future;

use serde::{Deserialize, Serialize};

pub use router::chat_router;
pub use service::{ActionPlanRequest, ChatRequest, ChatService, ChatServiceError};

/// One turn in a conversation with the assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Failures from the outbound provider, surfaced opaquely to callers.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("assistant provider not configured")]
    NotConfigured,
    #[error("assistant provider unavailable: {0}")]
    Provider(String),
}

/// Outbound completion boundary. Implementations live with the deployment
/// (an OpenAI-compatible HTTP client in the service binary, scripted
/// providers in tests).
pub trait ChatProvider: Send + Sync {
    fn complete(
        &self,
        messages: Vec<ChatMessage>,
    ) -> impl Future<Output = Result<ChatMessage, ChatError>> + Send;
}
