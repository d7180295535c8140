pub mod batch;
pub mod classifier;
pub mod generator;
pub mod io;
pub mod logging;
pub mod prompts;

pub use batch::{run_batch, BatchReport};
pub use classifier::{KeywordClassifier, SectionClassifier, SectionKind};
pub use generator::{ArticleGenerator, GeneratorConfig};
pub use io::{load_topics, read_topics, sanitize_topic, OutputWriter};
pub use logging::{init_logging, Logger};
pub use prompts::{load_prompt, read_prompt, PromptKind, PromptLibrary};
