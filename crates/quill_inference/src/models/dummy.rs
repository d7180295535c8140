use std::fmt;
use quill_core::{CompletionModel, CompletionRequest, Result, Role};

/// Offline model that answers without any network access.
///
/// Outline requests (prompts mentioning an `"outline"` key) get a small fixed
/// outline; every other prompt is echoed back in shortened form.
pub struct DummyModel;

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel").finish()
    }
}

impl DummyModel {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DummyModel {
    fn default() -> Self {
        Self::new()
    }
}

const DUMMY_OUTLINE: &str = r#"{
  "outline": [
    {"title": "Background", "subtopics": ["Origins", "Key terms"]},
    {"title": "Current State", "subtopics": ["Main approaches", "Open problems"]},
    {"title": "Outlook", "subtopics": ["Trends"]}
  ]
}"#;

#[async_trait::async_trait]
impl CompletionModel for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let prompt = request
            .messages
            .iter()
            .rev()
            .find(|turn| turn.role == Role::User)
            .map(|turn| turn.content.as_str())
            .unwrap_or_default();

        if prompt.contains("\"outline\"") {
            return Ok(DUMMY_OUTLINE.to_string());
        }

        // Take first 20 words and join them
        let words: Vec<&str> = prompt.split_whitespace().take(20).collect();
        Ok(format!("Offline draft based on: {}", words.join(" ")))
    }
}
