use std::sync::Arc;
use serde::de::DeserializeOwned;
use quill_core::{CompletionModel, CompletionRequest, ConversationTurn, Error, Result, Transcript};
use tracing::{debug, warn};
use crate::outline::strip_code_fences;
use crate::Config;

/// Conversation with a completion model that keeps its own transcript.
///
/// Every call sends the whole transcript, so later answers see earlier ones.
/// The client never retries; callers decide whether to skip or substitute.
#[derive(Debug)]
pub struct CompletionClient {
    model: Arc<dyn CompletionModel>,
    model_name: String,
    temperature: f32,
    transcript: Transcript,
}

impl CompletionClient {
    pub fn new(
        model: Arc<dyn CompletionModel>,
        model_name: impl Into<String>,
        temperature: f32,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            model,
            model_name: model_name.into(),
            temperature,
            transcript: Transcript::new(system_prompt),
        }
    }

    pub fn from_config(
        model: Arc<dyn CompletionModel>,
        config: &Config,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self::new(model, config.model_name.clone(), config.temperature, system_prompt)
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn model(&self) -> &Arc<dyn CompletionModel> {
        &self.model
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    /// Send `user_text` with the full transcript and return the trimmed answer.
    ///
    /// On success the user turn and the answer are appended to the transcript.
    /// On failure the transcript is left as it was.
    pub async fn send_message(&mut self, user_text: &str) -> Result<String> {
        let mut messages = self.transcript.turns().to_vec();
        messages.push(ConversationTurn::user(user_text));

        let request = CompletionRequest {
            model: self.model_name.clone(),
            messages,
            temperature: self.temperature,
        };

        let answer = match self.model.complete(&request).await {
            Ok(answer) => answer.trim().to_string(),
            Err(Error::Service(message)) => return Err(Error::Service(message)),
            Err(other) => return Err(Error::Service(other.to_string())),
        };

        self.transcript.record_exchange(user_text, answer.clone());
        debug!(turns = self.transcript.len(), "Transcript updated");
        Ok(answer)
    }

    /// Like [`send_message`](Self::send_message), but parse the answer as `T`.
    pub async fn send_message_structured<T: DeserializeOwned>(
        &mut self,
        user_text: &str,
    ) -> Result<T> {
        let raw = self.send_message(user_text).await?;
        parse_structured(&raw)
    }

    /// Install a new system prompt and drop the rest of the history.
    ///
    /// Blank text keeps the current prompt and history.
    pub fn replace_system_prompt(&mut self, text: &str) {
        if !self.transcript.replace_system_prompt(text) {
            warn!("Ignoring empty system prompt, keeping the current one");
        }
    }

    pub fn reset(&mut self) {
        self.transcript.reset();
    }
}

/// Parse a model answer into `T`, tolerating code fences and surrounding prose.
///
/// First tries a direct typed parse of the fence-stripped text, then a generic
/// JSON parse of the outermost `{...}` span converted into `T`.
pub fn parse_structured<T: DeserializeOwned>(raw: &str) -> Result<T> {
    let cleaned = strip_code_fences(raw);

    let direct_error = match serde_json::from_str::<T>(&cleaned) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };
    debug!("Direct structured parse failed: {}", direct_error);

    serde_json::from_str::<serde_json::Value>(object_span(&cleaned))
        .and_then(serde_json::from_value::<T>)
        .map_err(|source| Error::Format {
            message: format!(
                "response does not match the expected structure (direct parse: {})",
                direct_error
            ),
            source,
        })
}

fn object_span(text: &str) -> &str {
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}
