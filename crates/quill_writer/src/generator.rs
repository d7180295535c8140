use chrono::Utc;
use serde::Deserialize;
use quill_core::{
    Article, ArticleBlock, ArticleStatus, Language, OutlineOutcome, OutlineSection, Result,
};
use quill_inference::summarizer::DEFAULT_MAX_SENTENCES;
use quill_inference::{extract_outline, CompletionClient, Summarizer};
use tracing::{debug, error, info, warn};
use crate::classifier::{KeywordClassifier, SectionClassifier, SectionKind};
use crate::prompts::{bullets, PromptKind, PromptLibrary};

const SYSTEM_PROMPT_WRITER: &str =
    "You write system prompts for AI assistants that author long-form articles.";

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub language: Language,
    /// Ask the model for a topic-specific system prompt before each article.
    pub tailor_system_prompt: bool,
    pub include_introduction: bool,
    pub include_conclusion: bool,
    /// Summarize the body and hand the summary to the conclusion call.
    pub summarize_context: bool,
    pub summary_max_sentences: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            language: Language::En,
            tailor_system_prompt: false,
            include_introduction: true,
            include_conclusion: true,
            summarize_context: false,
            summary_max_sentences: DEFAULT_MAX_SENTENCES,
        }
    }
}

#[derive(Deserialize)]
struct TailoredPrompt {
    system_prompt: String,
}

/// Drives outline, introduction, body sections and conclusion for one topic
/// at a time.
///
/// Failures of the prose calls are replaced by placeholder text so a single
/// failing call never loses the rest of the article. Only a failing outline
/// call is returned as an error.
pub struct ArticleGenerator {
    client: CompletionClient,
    prompts: PromptLibrary,
    classifier: Box<dyn SectionClassifier>,
    summarizer: Option<Summarizer>,
    config: GeneratorConfig,
}

impl ArticleGenerator {
    pub fn new(client: CompletionClient, prompts: PromptLibrary, config: GeneratorConfig) -> Self {
        Self {
            client,
            prompts,
            classifier: Box::new(KeywordClassifier::for_language(config.language)),
            summarizer: None,
            config,
        }
    }

    pub fn with_classifier(mut self, classifier: impl SectionClassifier + 'static) -> Self {
        self.classifier = Box::new(classifier);
        self
    }

    pub fn with_summarizer(mut self, summarizer: Summarizer) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    pub fn client(&self) -> &CompletionClient {
        &self.client
    }

    pub async fn generate_article(&mut self, topic: &str) -> Result<Article> {
        let language = self.config.language;

        self.prepare_system_prompt(topic).await;

        let outline = self.generate_outline(topic).await?;
        if outline.is_empty() {
            warn!("No sections found in the outline for '{}'", topic);
            return Ok(Article::without_outline(topic, language));
        }
        if !outline.is_trusted() {
            warn!("Outline for '{}' is best-effort, sections may be incomplete", topic);
        }

        let sections = self.body_sections(outline.into_sections());

        let introduction = if self.config.include_introduction {
            Some(self.generate_introduction(topic).await)
        } else {
            None
        };

        let mut blocks = Vec::with_capacity(sections.len());
        for (i, section) in sections.iter().enumerate() {
            info!("📝 Writing section {}/{}: {}", i + 1, sections.len(), section.title);
            blocks.push(ArticleBlock {
                heading: section.title.clone(),
                body: self.generate_section(topic, section).await,
            });
        }

        let conclusion = if self.config.include_conclusion {
            let summary = self.summarize_body(&blocks).await;
            Some(self.generate_conclusion(topic, summary.as_deref()).await)
        } else {
            None
        };

        Ok(Article {
            title: topic.to_string(),
            language,
            introduction,
            sections: blocks,
            conclusion,
            status: ArticleStatus::Completed,
            generated_at: Utc::now(),
        })
    }

    /// Start the topic from a clean transcript, optionally with a tailored
    /// system prompt.
    pub async fn prepare_system_prompt(&mut self, topic: &str) {
        if !self.config.tailor_system_prompt {
            self.client.reset();
            return;
        }

        let prompt = match self.request_system_prompt(topic).await {
            Ok(prompt) if !prompt.trim().is_empty() => {
                info!("🎭 Using tailored system prompt for '{}'", topic);
                prompt
            }
            Ok(_) => {
                warn!("Tailored system prompt was empty, using the default");
                self.prompts.template(PromptKind::System)
            }
            Err(e) => {
                warn!("Failed to get a tailored system prompt: {}. Using the default.", e);
                self.prompts.template(PromptKind::System)
            }
        };
        self.client.replace_system_prompt(&prompt);
    }

    async fn request_system_prompt(&self, topic: &str) -> Result<String> {
        let mut writer = CompletionClient::new(
            self.client.model().clone(),
            self.client.model_name(),
            self.client.temperature(),
            SYSTEM_PROMPT_WRITER,
        );
        let request = self.prompts.render(PromptKind::SystemRequest, &[("topic", topic)]);
        let tailored: TailoredPrompt = writer.send_message_structured(&request).await?;
        Ok(tailored.system_prompt)
    }

    pub async fn generate_outline(&mut self, topic: &str) -> Result<OutlineOutcome> {
        let prompt = self.prompts.render(PromptKind::Outline, &[("topic", topic)]);
        let raw = self.client.send_message(&prompt).await?;
        debug!("Raw outline: {}", raw);
        Ok(extract_outline(&raw))
    }

    /// Drop sections that the dedicated introduction and conclusion already cover.
    fn body_sections(&self, sections: Vec<OutlineSection>) -> Vec<OutlineSection> {
        sections
            .into_iter()
            .filter(|section| match self.classifier.classify(&section.title) {
                SectionKind::Body => true,
                kind => {
                    info!("Skipping outline section '{}' ({:?})", section.title, kind);
                    false
                }
            })
            .collect()
    }

    async fn generate_introduction(&mut self, topic: &str) -> String {
        let prompt = self.prompts.render(PromptKind::Introduction, &[("topic", topic)]);
        match self.client.send_message(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                error!("Failed to generate the introduction for '{}': {}", topic, e);
                introduction_placeholder(self.config.language).to_string()
            }
        }
    }

    async fn generate_section(&mut self, topic: &str, section: &OutlineSection) -> String {
        let bullet_list = bullets(&section.subtopics);
        let prompt = self.prompts.render(
            PromptKind::Section,
            &[
                ("topic", topic),
                ("section_title", &section.title),
                ("bullets", &bullet_list),
            ],
        );
        match self.client.send_message(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                error!("Failed to generate section '{}': {}", section.title, e);
                section_placeholder(self.config.language, &section.title)
            }
        }
    }

    async fn summarize_body(&mut self, blocks: &[ArticleBlock]) -> Option<String> {
        if !self.config.summarize_context || blocks.is_empty() {
            return None;
        }
        let max_sentences = self.config.summary_max_sentences;
        let summarizer = self.summarizer.as_mut()?;

        let body = blocks
            .iter()
            .map(|block| format!("## {}\n{}", block.heading, block.body))
            .collect::<Vec<_>>()
            .join("\n\n");

        match summarizer.summarize(&body, max_sentences).await {
            Ok(summary) => Some(summary),
            Err(e) => {
                warn!("Failed to summarize the article body: {}", e);
                None
            }
        }
    }

    async fn generate_conclusion(&mut self, topic: &str, summary: Option<&str>) -> String {
        let mut prompt = self.prompts.render(PromptKind::Conclusion, &[("topic", topic)]);
        if let Some(summary) = summary {
            prompt = format!("{}\n{}\n\n{}", summary_label(self.config.language), summary, prompt);
        }
        match self.client.send_message(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                error!("Failed to generate the conclusion for '{}': {}", topic, e);
                conclusion_placeholder(self.config.language).to_string()
            }
        }
    }
}

pub fn introduction_placeholder(language: Language) -> &'static str {
    match language {
        Language::En => "[The introduction could not be generated.]",
        Language::Ru => "[Не удалось сгенерировать введение.]",
    }
}

pub fn section_placeholder(language: Language, title: &str) -> String {
    match language {
        Language::En => format!("[The section \"{}\" could not be generated.]", title),
        Language::Ru => format!("[Не удалось сгенерировать раздел «{}».]", title),
    }
}

pub fn conclusion_placeholder(language: Language) -> &'static str {
    match language {
        Language::En => "[The conclusion could not be generated.]",
        Language::Ru => "[Не удалось сгенерировать заключение.]",
    }
}

fn summary_label(language: Language) -> &'static str {
    match language {
        Language::En => "Summary of the article so far:",
        Language::Ru => "Краткое содержание статьи:",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use quill_core::Role;
    use quill_inference::models::ScriptedModel;
    use quill_inference::Config;

    const QUANTUM_OUTLINE: &str =
        r#"{"outline":[{"title":"Basics","subtopics":["Qubits","Superposition"]}]}"#;

    fn ok(text: &str) -> std::result::Result<String, String> {
        Ok(text.to_string())
    }

    fn err(text: &str) -> std::result::Result<String, String> {
        Err(text.to_string())
    }

    fn generator(
        responses: Vec<std::result::Result<String, String>>,
        config: GeneratorConfig,
    ) -> (ArticleGenerator, Arc<ScriptedModel>) {
        let model = Arc::new(ScriptedModel::new(responses));
        let library = PromptLibrary::builtin(config.language);
        let client = CompletionClient::new(
            model.clone(),
            "test-model",
            0.7,
            library.template(PromptKind::System),
        );
        (ArticleGenerator::new(client, library, config), model)
    }

    fn assert_in_order(text: &str, needles: &[&str]) {
        let mut from = 0;
        for needle in needles {
            let found = text[from..]
                .find(needle)
                .unwrap_or_else(|| panic!("'{}' not found in order in:\n{}", needle, text));
            from += found + needle.len();
        }
    }

    #[tokio::test]
    async fn test_quantum_computing_article() {
        let (mut generator, model) = generator(
            vec![ok(QUANTUM_OUTLINE), ok("Intro text"), ok("Body text"), ok("Concl text")],
            GeneratorConfig::default(),
        );

        let article = generator.generate_article("Quantum Computing").await.unwrap();
        assert_eq!(article.status, ArticleStatus::Completed);

        let text = article.render();
        assert_in_order(
            &text,
            &[
                "# Quantum Computing",
                "## Introduction",
                "Intro text",
                "## Basics",
                "Body text",
                "## Conclusion",
                "Concl text",
            ],
        );

        let requests = model.requests();
        assert_eq!(requests.len(), 4);
        let section_prompt = &requests[2].messages.last().unwrap().content;
        assert!(section_prompt.contains("Section title: Basics"));
        assert!(section_prompt.contains("- Qubits\n- Superposition"));
        // the conclusion call sees the whole conversation so far
        assert_eq!(requests[3].messages.len(), 8);
    }

    #[tokio::test]
    async fn test_unparseable_outline_short_circuits() {
        let (mut generator, model) = generator(vec![ok("not json")], GeneratorConfig::default());

        let article = generator.generate_article("Quantum Computing").await.unwrap();
        assert_eq!(article.status, ArticleStatus::CompletedEmpty);
        assert!(article.render().contains("Could not generate"));
        assert_eq!(model.call_count(), 1);
    }

    #[tokio::test]
    async fn test_outline_service_error_propagates() {
        let (mut generator, model) =
            generator(vec![err("rate limited")], GeneratorConfig::default());

        let error = generator.generate_article("Quantum Computing").await.unwrap_err();
        assert!(error.is_service());
        assert_eq!(model.call_count(), 1);
    }

    #[tokio::test]
    async fn test_failing_section_gets_placeholder() {
        let outline = r#"{"outline":[
            {"title":"One","subtopics":["a"]},
            {"title":"Two","subtopics":["b"]},
            {"title":"Three","subtopics":[]}
        ]}"#;
        let (mut generator, _model) = generator(
            vec![
                ok(outline),
                ok("Intro text"),
                ok("First body"),
                err("network down"),
                ok("Third body"),
                ok("Concl text"),
            ],
            GeneratorConfig::default(),
        );

        let article = generator.generate_article("Topic").await.unwrap();
        assert_eq!(article.sections.len(), 3);
        assert_eq!(article.sections[0].body, "First body");
        assert_eq!(article.sections[1].body, section_placeholder(Language::En, "Two"));
        assert_eq!(article.sections[2].body, "Third body");
        assert_eq!(article.conclusion.as_deref(), Some("Concl text"));
    }

    #[tokio::test]
    async fn test_failing_introduction_and_conclusion() {
        let (mut generator, _model) = generator(
            vec![ok(QUANTUM_OUTLINE), err("boom"), ok("Body text"), err("boom")],
            GeneratorConfig { language: Language::Ru, ..GeneratorConfig::default() },
        );

        let article = generator.generate_article("Квантовые вычисления").await.unwrap();
        assert_eq!(article.introduction.as_deref(), Some(introduction_placeholder(Language::Ru)));
        assert_eq!(article.sections[0].body, "Body text");
        assert_eq!(article.conclusion.as_deref(), Some(conclusion_placeholder(Language::Ru)));
        assert!(article.render().contains("## Введение"));
    }

    #[tokio::test]
    async fn test_intro_and_conclusion_sections_are_filtered() {
        let outline = r#"{"outline":[
            {"title":"Section 1: Introduction","subtopics":["Background"]},
            {"title":"Basics","subtopics":["Qubits"]},
            {"title":"Conclusion","subtopics":["Wrap-up"]}
        ]}"#;
        let (mut generator, model) = generator(
            vec![ok(outline), ok("Intro text"), ok("Body text"), ok("Concl text")],
            GeneratorConfig::default(),
        );

        let article = generator.generate_article("Quantum Computing").await.unwrap();
        assert_eq!(article.sections.len(), 1);
        assert_eq!(article.sections[0].heading, "Basics");
        assert_eq!(model.call_count(), 4);
    }

    #[tokio::test]
    async fn test_custom_classifier() {
        let outline = r#"{"outline":[
            {"title":"Einleitung","subtopics":[]},
            {"title":"Hauptteil","subtopics":[]}
        ]}"#;
        let (generator, _model) = generator(
            vec![ok(outline), ok("Intro"), ok("Body"), ok("End")],
            GeneratorConfig::default(),
        );
        let mut generator = generator.with_classifier(|title: &str| {
            if title == "Einleitung" {
                SectionKind::Introduction
            } else {
                SectionKind::Body
            }
        });

        let article = generator.generate_article("Thema").await.unwrap();
        assert_eq!(article.sections.len(), 1);
        assert_eq!(article.sections[0].heading, "Hauptteil");
    }

    #[tokio::test]
    async fn test_optional_blocks_can_be_disabled() {
        let (mut generator, model) = generator(
            vec![ok(QUANTUM_OUTLINE), ok("Body text")],
            GeneratorConfig {
                include_introduction: false,
                include_conclusion: false,
                ..GeneratorConfig::default()
            },
        );

        let article = generator.generate_article("Quantum Computing").await.unwrap();
        assert!(article.introduction.is_none());
        assert!(article.conclusion.is_none());
        let text = article.render();
        assert!(!text.contains("## Introduction"));
        assert!(text.contains("## Basics\nBody text"));
        assert_eq!(model.call_count(), 2);
    }

    #[tokio::test]
    async fn test_raw_fallback_outline_is_used() {
        let outline = r#"{"outline":[{"title":"Numbers","subtopics":[1,2]}]}"#;
        let (mut generator, _model) = generator(
            vec![ok(outline), ok("Intro"), ok("Body"), ok("End")],
            GeneratorConfig::default(),
        );

        let article = generator.generate_article("Topic").await.unwrap();
        assert_eq!(article.sections[0].heading, "Numbers");
        assert_eq!(article.sections[0].body, "Body");
    }

    #[tokio::test]
    async fn test_transcript_is_reset_between_topics() {
        let (mut generator, model) = generator(
            vec![
                ok(QUANTUM_OUTLINE),
                ok("I1"),
                ok("B1"),
                ok("C1"),
                ok(QUANTUM_OUTLINE),
                ok("I2"),
                ok("B2"),
                ok("C2"),
            ],
            GeneratorConfig::default(),
        );

        generator.generate_article("First").await.unwrap();
        generator.generate_article("Second").await.unwrap();

        let requests = model.requests();
        assert_eq!(requests[4].messages.len(), 2);
        assert_eq!(requests[4].messages[0].role, Role::System);
    }

    #[tokio::test]
    async fn test_tailored_system_prompt() {
        let (mut generator, model) = generator(
            vec![
                ok("```json\n{\"system_prompt\": \"You are a quantum physicist.\"}\n```"),
                ok(QUANTUM_OUTLINE),
                ok("Intro"),
                ok("Body"),
                ok("End"),
            ],
            GeneratorConfig { tailor_system_prompt: true, ..GeneratorConfig::default() },
        );

        generator.generate_article("Quantum Computing").await.unwrap();
        assert_eq!(
            generator.client().transcript().system_prompt(),
            "You are a quantum physicist."
        );

        let requests = model.requests();
        assert_eq!(requests[0].messages[0].content, SYSTEM_PROMPT_WRITER);
        assert_eq!(requests[1].messages[0].content, "You are a quantum physicist.");
        assert_eq!(requests[1].messages.len(), 2);
    }

    #[tokio::test]
    async fn test_tailored_system_prompt_falls_back_to_default() {
        let (mut generator, _model) = generator(
            vec![
                ok("I cannot produce JSON today."),
                ok(QUANTUM_OUTLINE),
                ok("Intro"),
                ok("Body"),
                ok("End"),
            ],
            GeneratorConfig { tailor_system_prompt: true, ..GeneratorConfig::default() },
        );

        generator.generate_article("Quantum Computing").await.unwrap();
        assert_eq!(
            generator.client().transcript().system_prompt(),
            PromptLibrary::builtin(Language::En).template(PromptKind::System)
        );
    }

    #[tokio::test]
    async fn test_summary_feeds_conclusion() {
        let summary_model = Arc::new(ScriptedModel::new(vec![ok("It was about qubits.")]));
        let summarizer = Summarizer::from_config(summary_model.clone(), &Config::default());
        let (generator, model) = generator(
            vec![ok(QUANTUM_OUTLINE), ok("Intro"), ok("Body text"), ok("End")],
            GeneratorConfig { summarize_context: true, ..GeneratorConfig::default() },
        );
        let mut generator = generator.with_summarizer(summarizer);

        generator.generate_article("Quantum Computing").await.unwrap();

        let summary_requests = summary_model.requests();
        let summary_prompt = &summary_requests[0].messages[1].content;
        assert!(summary_prompt.contains("## Basics\nBody text"));
        let requests = model.requests();
        let conclusion_prompt = &requests[3].messages.last().unwrap().content;
        assert!(conclusion_prompt
            .starts_with("Summary of the article so far:\nIt was about qubits."));
    }

    #[tokio::test]
    async fn test_failed_summary_is_skipped() {
        let summary_model = Arc::new(ScriptedModel::new(vec![err("down")]));
        let summarizer = Summarizer::from_config(summary_model, &Config::default());
        let (generator, model) = generator(
            vec![ok(QUANTUM_OUTLINE), ok("Intro"), ok("Body"), ok("End")],
            GeneratorConfig { summarize_context: true, ..GeneratorConfig::default() },
        );
        let mut generator = generator.with_summarizer(summarizer);

        let article = generator.generate_article("Quantum Computing").await.unwrap();
        assert_eq!(article.conclusion.as_deref(), Some("End"));
        let requests = model.requests();
        let conclusion_prompt = &requests[3].messages.last().unwrap().content;
        assert!(conclusion_prompt.starts_with("Topic: 'Quantum Computing'"));
    }
}
