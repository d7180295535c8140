use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use crate::types::ConversationTurn;
use crate::Result;

/// Everything the completion service needs for one call.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ConversationTurn>,
    pub temperature: f32,
}

#[async_trait]
pub trait CompletionModel: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Send the request and return the raw generated text.
    ///
    /// Every failure (rate limit, API error, transport, malformed body) is
    /// reported as `Error::Service`.
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}
