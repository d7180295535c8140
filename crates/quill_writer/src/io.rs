//! Topic lists in, Markdown files out.
//!
//! `read_topics` and `OutputWriter::write` return errors; `load_topics` and
//! `OutputWriter::save` log them and degrade.

use std::fs;
use std::path::{Path, PathBuf};
use quill_core::{Error, Result};
use tracing::{error, info};

/// One topic per non-empty trimmed line, in file order.
pub fn read_topics(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        Error::Resource(format!("Failed to read topics file '{}': {}", path.display(), e))
    })?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Like [`read_topics`], but a missing or unreadable file is logged and yields no topics.
pub fn load_topics(path: impl AsRef<Path>) -> Vec<String> {
    read_topics(path).unwrap_or_else(|e| {
        error!("{}. Returning an empty list.", e);
        Vec::new()
    })
}

/// File-name-safe version of a topic.
///
/// Letters, digits, `-` and `_` are kept; everything else becomes `_`.
pub fn sanitize_topic(topic: &str) -> String {
    let sanitized: String = topic
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();

    if sanitized.is_empty() {
        "untitled".to_string()
    } else {
        sanitized
    }
}

#[derive(Debug, Clone)]
pub struct OutputWriter {
    dir: PathBuf,
}

impl OutputWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, topic: &str) -> PathBuf {
        self.dir.join(format!("{}.md", sanitize_topic(topic)))
    }

    /// Write `text` to `<dir>/<sanitized topic>.md`, creating `dir` if needed.
    pub fn write(&self, topic: &str, text: &str) -> Result<PathBuf> {
        if text.trim().is_empty() {
            return Err(Error::Resource(format!("Article text for '{}' is empty", topic)));
        }

        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(topic);
        fs::write(&path, text)?;
        Ok(path)
    }

    /// Returns the written path, or `None` after logging what went wrong.
    pub fn save(&self, topic: &str, text: &str) -> Option<PathBuf> {
        match self.write(topic, text) {
            Ok(path) => {
                info!("💾 Article on '{}' saved to {}", topic, path.display());
                Some(path)
            }
            Err(e) => {
                error!("Failed to save article on '{}' into {}: {}", topic, self.dir.display(), e);
                None
            }
        }
    }
}
