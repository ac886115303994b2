use std::sync::Arc;

use serde::Deserialize;

use super::{ChatError, ChatMessage, ChatProvider};

/// Inbound chat body: a full conversation so far.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Option<Vec<ChatMessage>>,
}

/// Inbound action-plan body: the scored assessment the plan is based on.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActionPlanRequest {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub score: Option<u16>,
    #[serde(default)]
    pub severity: Option<String>,
}

const SYSTEM_PROMPT: &str = "You are a helpful mental health assistant.";

/// Service validating assistant requests and delegating to the provider.
pub struct ChatService<P> {
    provider: Arc<P>,
}

impl<P> ChatService<P>
where
    P: ChatProvider + 'static,
{
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }

    pub async fn chat(&self, request: ChatRequest) -> Result<ChatMessage, ChatServiceError> {
        let messages = request
            .messages
            .filter(|messages| !messages.is_empty())
            .ok_or(ChatServiceError::MissingMessages)?;

        let reply = self.provider.complete(messages).await?;
        Ok(reply)
    }

    /// Build the action-plan prompt from a scored assessment and forward it.
    pub async fn action_plan(
        &self,
        request: ActionPlanRequest,
    ) -> Result<ChatMessage, ChatServiceError> {
        let (kind, score, severity) = match (request.kind, request.score, request.severity) {
            (Some(kind), Some(score), Some(severity)) => (kind, score, severity),
            _ => return Err(ChatServiceError::MissingAssessmentFields),
        };

        let prompt = format!(
            "Given the following assessment results:\n\n\
             Assessment Type: {kind}\n\
             Score: {score}\n\
             Severity: {severity}\n\n\
             Generate a detailed, compassionate, and practical action plan that a person \
             with these results can follow to improve their mental health. Include advice \
             on when to seek professional help.\n\n\
             Provide the action plan in a clear, organized format."
        );

        let reply = self
            .provider
            .complete(vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)])
            .await?;
        Ok(reply)
    }
}

/// Error raised by the assistant proxy.
#[derive(Debug, thiserror::Error)]
pub enum ChatServiceError {
    #[error("messages array is required")]
    MissingMessages,
    #[error("type, score, and severity are required")]
    MissingAssessmentFields,
    #[error(transparent)]
    Provider(#[from] ChatError),
}
