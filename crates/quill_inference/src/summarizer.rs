use std::sync::Arc;
use quill_core::{CompletionModel, Result};
use tracing::{debug, info};
use crate::client::CompletionClient;
use crate::Config;

pub const DEFAULT_MAX_SENTENCES: usize = 20;

pub const SUMMARIZER_SYSTEM_PROMPT: &str = "You are a concise summarizer. Your task is to read long texts \
and provide short, clear summaries.";

/// Template placeholders: `{max_sentences}` and `{text}`.
pub const DEFAULT_SUMMARY_TEMPLATE: &str =
    "Please summarize the following text in no more than {max_sentences} sentences:\n\n{text}";

/// Condenses text with its own conversation, separate from the article's.
#[derive(Debug)]
pub struct Summarizer {
    client: CompletionClient,
    template: String,
}

impl Summarizer {
    pub fn new(client: CompletionClient) -> Self {
        Self {
            client,
            template: DEFAULT_SUMMARY_TEMPLATE.to_string(),
        }
    }

    /// Build a summarizer on the configured summarizer model.
    pub fn from_config(model: Arc<dyn CompletionModel>, config: &Config) -> Self {
        let client = CompletionClient::new(
            model,
            config.summarizer_model(),
            config.temperature,
            SUMMARIZER_SYSTEM_PROMPT,
        );
        Self::new(client)
    }

    /// Use a custom prompt template; blank templates are ignored.
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        let template = template.into();
        if !template.trim().is_empty() {
            self.template = template;
        }
        self
    }

    /// Summarize `text` in at most `max_sentences` sentences.
    ///
    /// Each call starts from a fresh transcript so earlier summaries do not
    /// pile up in the context.
    pub async fn summarize(&mut self, text: &str, max_sentences: usize) -> Result<String> {
        self.client.reset();
        let prompt = self
            .template
            .replace("{max_sentences}", &max_sentences.to_string())
            .replace("{text}", text);

        debug!("Summarizing {} characters", text.len());
        let summary = self.client.send_message(&prompt).await?;
        info!("📝 Summary generated ({} characters)", summary.len());
        Ok(summary)
    }
}
