use anyhow::Result;
use clap::Parser;
use quill_core::Language;
use quill_inference::summarizer::DEFAULT_MAX_SENTENCES;
use quill_inference::{
    create_model, CompletionClient, Summarizer, DEFAULT_MODEL, DEFAULT_TEMPERATURE,
};
use quill_writer::{
    init_logging, load_topics, run_batch, ArticleGenerator, GeneratorConfig, OutputWriter,
    PromptKind, PromptLibrary,
};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Generate long-form articles with a chat-completion model",
    long_about = None
)]
pub struct Cli {
    #[arg(
        long,
        default_value = "openai",
        help = "Completion backend. Available backends: openai (default), dummy"
    )]
    model: String,
    #[arg(long, env = "MODEL_ADVANCED", default_value = DEFAULT_MODEL)]
    model_name: String,
    /// Model for body summaries, defaults to --model-name
    #[arg(long, env = "MODEL_SUMMARIZER")]
    summarizer_model: Option<String>,
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    /// OpenAI-compatible endpoint, e.g. http://localhost:8080/v1
    #[arg(long, env = "OPENAI_BASE_URL")]
    base_url: Option<String>,
    #[arg(long, env = "TEMPERATURE", default_value_t = DEFAULT_TEMPERATURE)]
    temperature: f32,
    /// Article language: EN or RU
    #[arg(long, env = "ARTICLE_LANGUAGE", default_value = "EN")]
    language: Language,
    /// Directory holding <kind>_prompt_<LANG>.txt templates
    #[arg(long, default_value = "prompts")]
    prompts_dir: PathBuf,
    #[arg(long, default_value = "articles")]
    output_dir: PathBuf,
    /// Ask the model for a topic-specific system prompt before each article
    #[arg(long)]
    tailor_system_prompt: bool,
    /// Summarize the body and pass the summary to the conclusion call
    #[arg(long)]
    summarize_context: bool,
    #[arg(long, env = "SUMMARY_MAX_SENTENCES", default_value_t = DEFAULT_MAX_SENTENCES)]
    summary_max_sentences: usize,
    #[arg(long)]
    no_introduction: bool,
    #[arg(long)]
    no_conclusion: bool,
    #[arg(short, long)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Generate a single article and save it
    Generate {
        topic: String,
        /// Print the article instead of saving it
        #[arg(long)]
        stdout: bool,
    },
    /// Generate an article for every line of a topics file
    Batch {
        #[arg(default_value = "files/topics.txt")]
        topics_file: PathBuf,
    },
    /// Print the outline extracted for a topic
    Outline {
        topic: String,
    },
}

impl Cli {
    fn inference_config(&self) -> quill_inference::Config {
        quill_inference::Config {
            backend: self.model.clone(),
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            model_name: self.model_name.clone(),
            summarizer_model_name: self.summarizer_model.clone(),
            temperature: self.temperature,
        }
    }

    fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            language: self.language,
            tailor_system_prompt: self.tailor_system_prompt,
            include_introduction: !self.no_introduction,
            include_conclusion: !self.no_conclusion,
            summarize_context: self.summarize_context,
            summary_max_sentences: self.summary_max_sentences,
        }
    }
}

fn prompt_library(dir: &Path, language: Language) -> PromptLibrary {
    if dir.is_dir() {
        info!("📄 Loading prompt templates from {}", dir.display());
        PromptLibrary::new(dir, language)
    } else {
        info!("📄 Prompt directory {} not found, using built-in templates", dir.display());
        PromptLibrary::builtin(language)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.inference_config();
    let model = create_model(&config)?;

    let prompts = prompt_library(&cli.prompts_dir, cli.language);
    let client =
        CompletionClient::from_config(model.clone(), &config, prompts.template(PromptKind::System));
    let mut generator = ArticleGenerator::new(client, prompts.clone(), cli.generator_config());
    if cli.summarize_context {
        let summarizer = Summarizer::from_config(model.clone(), &config)
            .with_template(prompts.template(PromptKind::Summary));
        generator = generator.with_summarizer(summarizer);
    }
    let writer = OutputWriter::new(&cli.output_dir);

    match cli.command {
        Commands::Generate { topic, stdout } => {
            info!("🖋️ Generating article for topic: {}", topic);
            let article = generator.generate_article(&topic).await?;
            if stdout {
                println!("{}", article.render());
            } else {
                writer.save(&topic, &article.render());
            }
        }
        Commands::Batch { topics_file } => {
            let topics = load_topics(&topics_file);
            if topics.is_empty() {
                warn!(
                    "No topics found. Please ensure {} has at least one topic.",
                    topics_file.display()
                );
                return Ok(());
            }
            info!("📚 Generating {} articles into {}", topics.len(), writer.dir().display());
            let report = run_batch(&mut generator, &topics, &writer).await;
            info!("🏁 {} of {} articles saved", report.saved.len(), report.total());
            for (topic, reason) in &report.failed {
                warn!("❌ {}: {}", topic, reason);
            }
            for (topic, previous) in &report.overwritten {
                warn!(
                    "⚠️ {} and {} share an output file; only {} was kept",
                    previous, topic, topic
                );
            }
        }
        Commands::Outline { topic } => {
            generator.prepare_system_prompt(&topic).await;
            let outline = generator.generate_outline(&topic).await?;
            if outline.is_empty() {
                warn!("No usable outline for '{}'", topic);
            } else if !outline.is_trusted() {
                warn!("Outline for '{}' did not validate, showing the raw sections", topic);
            }
            for section in outline.sections() {
                println!("- {}", section.title);
                for subtopic in &section.subtopics {
                    println!("  - {}", subtopic);
                }
            }
        }
    }

    Ok(())
}
