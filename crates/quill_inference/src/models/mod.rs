use std::sync::Arc;
use quill_core::{CompletionModel, Error, Result};
use tracing::info;
use crate::Config;

pub mod dummy;
pub mod openai;
pub mod scripted;

pub use dummy::DummyModel;
pub use openai::OpenAiModel;
pub use scripted::ScriptedModel;

/// Names accepted by [`create_model`].
pub const AVAILABLE_BACKENDS: &[&str] = &["openai", "dummy"];

pub fn create_model(config: &Config) -> Result<Arc<dyn CompletionModel>> {
    let model: Arc<dyn CompletionModel> = match config.backend.to_lowercase().as_str() {
        "openai" => Arc::new(OpenAiModel::new(
            config.api_key.clone(),
            config.base_url.clone(),
        )?),
        "dummy" => Arc::new(DummyModel::new()),
        other => {
            return Err(Error::Config(format!(
                "Unknown model backend: {}. Available backends: {}",
                other,
                AVAILABLE_BACKENDS.join(", ")
            )))
        }
    };
    info!("🧠 Using {} completion backend", model.name());
    Ok(model)
}
