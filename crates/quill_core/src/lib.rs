pub mod error;
pub mod models;
pub mod types;

pub use error::Error;
pub use models::{CompletionModel, CompletionRequest};
pub use types::{
    Article, ArticleBlock, ArticleStatus, ConversationTurn, Language, Outline, OutlineOutcome,
    OutlineSection, Role, Transcript,
};

pub type Result<T> = std::result::Result<T, Error>;
