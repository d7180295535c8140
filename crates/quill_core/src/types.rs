use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// Ordered role-tagged turns sent as context on every request.
///
/// Turn 0 is always the system turn. Replacing the system prompt drops the
/// rest of the history; otherwise turns are only appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    turns: Vec<ConversationTurn>,
}

impl Transcript {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            turns: vec![ConversationTurn::system(system_prompt)],
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.turns[0].content
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Never true: the system turn is always present.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Append a user turn and the assistant answer to it.
    pub fn record_exchange(&mut self, user: impl Into<String>, assistant: impl Into<String>) {
        self.turns.push(ConversationTurn::user(user));
        self.turns.push(ConversationTurn::assistant(assistant));
    }

    /// Install a new system prompt and drop all later history.
    ///
    /// Returns `false` and leaves the transcript untouched when `text` is blank.
    pub fn replace_system_prompt(&mut self, text: &str) -> bool {
        if text.trim().is_empty() {
            return false;
        }
        self.turns.truncate(1);
        self.turns[0] = ConversationTurn::system(text);
        true
    }

    /// Truncate to the system turn.
    pub fn reset(&mut self) {
        self.turns.truncate(1);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineSection {
    pub title: String,
    #[serde(default)]
    pub subtopics: Vec<String>,
}

pub type Outline = Vec<OutlineSection>;

/// Result of outline extraction, keeping track of how trustworthy it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutlineOutcome {
    /// Every returned record passed validation.
    Valid(Outline),
    /// No record validated; sections were rebuilt leniently from the raw array.
    RawFallback(Outline),
    Empty,
}

impl OutlineOutcome {
    pub fn sections(&self) -> &[OutlineSection] {
        match self {
            OutlineOutcome::Valid(sections) | OutlineOutcome::RawFallback(sections) => sections,
            OutlineOutcome::Empty => &[],
        }
    }

    pub fn into_sections(self) -> Outline {
        match self {
            OutlineOutcome::Valid(sections) | OutlineOutcome::RawFallback(sections) => sections,
            OutlineOutcome::Empty => Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sections().is_empty()
    }

    pub fn is_trusted(&self) -> bool {
        matches!(self, OutlineOutcome::Valid(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    En,
    Ru,
}

impl Language {
    /// Code used in prompt file names, e.g. `outline_prompt_EN.txt`.
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "EN",
            Language::Ru => "RU",
        }
    }

    pub fn introduction_heading(&self) -> &'static str {
        match self {
            Language::En => "Introduction",
            Language::Ru => "Введение",
        }
    }

    pub fn conclusion_heading(&self) -> &'static str {
        match self {
            Language::En => "Conclusion",
            Language::Ru => "Заключение",
        }
    }

    pub fn outline_failure_notice(&self) -> &'static str {
        match self {
            Language::En => {
                "Could not generate an article for this topic: no usable outline was produced."
            }
            Language::Ru => "Не удалось сгенерировать статью по этой теме: план статьи не получен.",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "EN" | "ENGLISH" => Ok(Language::En),
            "RU" | "RUSSIAN" => Ok(Language::Ru),
            other => Err(format!("Unsupported language: {}. Available: EN, RU", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArticleStatus {
    Completed,
    /// The outline could not be extracted; only a notice was produced.
    CompletedEmpty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleBlock {
    pub heading: String,
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub language: Language,
    pub introduction: Option<String>,
    pub sections: Vec<ArticleBlock>,
    pub conclusion: Option<String>,
    pub status: ArticleStatus,
    pub generated_at: DateTime<Utc>,
}

impl Article {
    /// Minimal document used when no outline could be extracted.
    pub fn without_outline(title: impl Into<String>, language: Language) -> Self {
        Self {
            title: title.into(),
            language,
            introduction: None,
            sections: Vec::new(),
            conclusion: None,
            status: ArticleStatus::CompletedEmpty,
            generated_at: Utc::now(),
        }
    }

    /// Render the article as a Markdown document.
    pub fn render(&self) -> String {
        let mut out = format!("# {}\n\n", self.title);

        if self.status == ArticleStatus::CompletedEmpty {
            out.push_str(self.language.outline_failure_notice());
            out.push('\n');
            return out;
        }

        if let Some(introduction) = &self.introduction {
            out.push_str(&format!(
                "## {}\n{}\n\n",
                self.language.introduction_heading(),
                introduction
            ));
        }
        for block in &self.sections {
            out.push_str(&format!("## {}\n{}\n\n", block.heading, block.body));
        }
        if let Some(conclusion) = &self.conclusion {
            out.push_str(&format!(
                "## {}\n{}\n",
                self.language.conclusion_heading(),
                conclusion
            ));
        }
        out
    }
}
