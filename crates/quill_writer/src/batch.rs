use std::collections::HashMap;
use std::path::PathBuf;
use crate::generator::ArticleGenerator;
use crate::io::OutputWriter;
use crate::logging::Logger;

#[derive(Debug, Default)]
pub struct BatchReport {
    pub saved: Vec<PathBuf>,
    /// Topics that produced no file, with the reason.
    pub failed: Vec<(String, String)>,
    /// Topics whose file replaced an earlier topic's file in this run, with
    /// the earlier topic.
    pub overwritten: Vec<(String, String)>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.saved.len() + self.failed.len() + self.overwritten.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.overwritten.is_empty()
    }
}

/// Generate and save an article per topic, one after another.
///
/// A failing topic is logged and skipped; the run itself never fails.
/// Topics that sanitize to an already written file name are reported in
/// `overwritten`; `saved` lists each path once.
pub async fn run_batch(
    generator: &mut ArticleGenerator,
    topics: &[String],
    writer: &OutputWriter,
) -> BatchReport {
    let mut report = BatchReport::default();
    let total = topics.len();
    let mut written: HashMap<PathBuf, String> = HashMap::new();

    for (i, topic) in topics.iter().enumerate() {
        let logger = Logger::new()
            .with_prefix(format!("[{}/{}]", i + 1, total))
            .with_prefix(topic.clone());
        logger.info("🖋️ Generating article");

        let article = match generator.generate_article(topic).await {
            Ok(article) => article,
            Err(e) => {
                logger.error(&format!("Article generation failed: {:?}", e));
                report.failed.push((topic.clone(), e.to_string()));
                continue;
            }
        };

        match writer.save(topic, &article.render()) {
            Some(path) => {
                if let Some(previous) = written.insert(path.clone(), topic.clone()) {
                    logger.warn(&format!(
                        "⚠️ {} replaced the article on '{}' written earlier in this run",
                        path.display(),
                        previous
                    ));
                    report.overwritten.push((topic.clone(), previous));
                } else {
                    report.saved.push(path);
                }
                logger.info(&format!(
                    "✨ Done ({} sections, generated at {})",
                    article.sections.len(),
                    article.generated_at.format("%Y-%m-%d %H:%M:%S")
                ));
            }
            None => {
                logger.warn("Article was generated but could not be saved");
                report.failed.push((topic.clone(), "could not save the article".to_string()));
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use quill_inference::models::ScriptedModel;
    use quill_inference::CompletionClient;
    use crate::generator::GeneratorConfig;
    use crate::prompts::{PromptKind, PromptLibrary};

    const OUTLINE: &str = r#"{"outline":[{"title":"Basics","subtopics":["Qubits"]}]}"#;

    fn article_script() -> Vec<std::result::Result<String, String>> {
        vec![
            Ok(OUTLINE.to_string()),
            Ok("Intro text".to_string()),
            Ok("Body text".to_string()),
            Ok("Concl text".to_string()),
        ]
    }

    fn generator(model: Arc<ScriptedModel>) -> ArticleGenerator {
        let library = PromptLibrary::builtin(quill_core::Language::En);
        let system_prompt = library.template(PromptKind::System);
        let client = CompletionClient::new(model, "test-model", 0.7, system_prompt);
        ArticleGenerator::new(client, library, GeneratorConfig::default())
    }

    #[tokio::test]
    async fn test_failing_topic_does_not_stop_the_batch() {
        let mut script = article_script();
        script.push(Err("outline call failed".to_string()));
        script.extend(article_script());
        let model = Arc::new(ScriptedModel::new(script));
        let mut generator = generator(model.clone());

        let dir = tempfile::tempdir().unwrap();
        let writer = OutputWriter::new(dir.path());
        let topics = vec![
            "First Topic".to_string(),
            "Second Topic".to_string(),
            "Third Topic".to_string(),
        ];

        let report = run_batch(&mut generator, &topics, &writer).await;

        assert_eq!(report.total(), 3);
        assert_eq!(report.saved.len(), 2);
        assert!(!report.is_success());
        assert_eq!(report.failed[0].0, "Second Topic");
        assert!(report.failed[0].1.contains("outline call failed"));

        assert!(writer.path_for("First Topic").exists());
        assert!(!writer.path_for("Second Topic").exists());
        assert!(writer.path_for("Third Topic").exists());

        let third = std::fs::read_to_string(writer.path_for("Third Topic")).unwrap();
        assert!(third.starts_with("# Third Topic"));
        assert!(third.contains("## Basics\nBody text"));
        assert_eq!(model.remaining(), 0);
    }

    #[tokio::test]
    async fn test_empty_outline_is_still_saved() {
        let model = Arc::new(ScriptedModel::new(vec![Ok("not json".to_string())]));
        let mut generator = generator(model);
        let dir = tempfile::tempdir().unwrap();
        let writer = OutputWriter::new(dir.path());

        let report = run_batch(&mut generator, &["Topic".to_string()], &writer).await;
        assert!(report.is_success());
        let text = std::fs::read_to_string(&report.saved[0]).unwrap();
        assert!(text.contains("Could not generate"));
    }

    #[tokio::test]
    async fn test_colliding_file_names_are_reported() {
        let mut script = article_script();
        script.extend(article_script());
        script.extend(article_script());
        let model = Arc::new(ScriptedModel::new(script));
        let mut generator = generator(model);
        let dir = tempfile::tempdir().unwrap();
        let writer = OutputWriter::new(dir.path());
        let topics = vec![
            "Rust: Ownership".to_string(),
            "Rust? Ownership".to_string(),
            "Rust/ Ownership".to_string(),
        ];

        let report = run_batch(&mut generator, &topics, &writer).await;

        assert_eq!(report.saved, vec![writer.path_for("Rust: Ownership")]);
        assert_eq!(
            report.overwritten,
            vec![
                ("Rust? Ownership".to_string(), "Rust: Ownership".to_string()),
                ("Rust/ Ownership".to_string(), "Rust? Ownership".to_string()),
            ]
        );
        assert_eq!(report.total(), 3);
        assert!(!report.is_success());

        let text = std::fs::read_to_string(&report.saved[0]).unwrap();
        assert!(text.starts_with("# Rust/ Ownership"));
    }

    #[tokio::test]
    async fn test_empty_topic_list() {
        let model = Arc::new(ScriptedModel::default());
        let mut generator = generator(model.clone());
        let dir = tempfile::tempdir().unwrap();

        let report = run_batch(&mut generator, &[], &OutputWriter::new(dir.path())).await;
        assert_eq!(report.total(), 0);
        assert_eq!(model.call_count(), 0);
    }
}
