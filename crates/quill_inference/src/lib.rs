use std::fmt;

pub mod client;
pub mod models;
pub mod outline;
pub mod summarizer;

pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Settings for the completion back-end and the clients built on it.
#[derive(Clone)]
pub struct Config {
    /// Back-end name, see [`models::AVAILABLE_BACKENDS`].
    pub backend: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model_name: String,
    /// Model used by the summarizer; falls back to `model_name`.
    pub summarizer_model_name: Option<String>,
    pub temperature: f32,
}

impl Config {
    pub fn summarizer_model(&self) -> &str {
        self.summarizer_model_name.as_deref().unwrap_or(&self.model_name)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("backend", &self.backend)
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model_name", &self.model_name)
            .field("summarizer_model_name", &self.summarizer_model_name)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: "openai".to_string(),
            api_key: None,
            base_url: None,
            model_name: DEFAULT_MODEL.to_string(),
            summarizer_model_name: None,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

pub use client::CompletionClient;
pub use models::create_model;
pub use outline::{extract_outline, strip_code_fences};
pub use summarizer::Summarizer;
