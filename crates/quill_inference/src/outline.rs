//! Turning a model's outline answer into ordered sections.
//!
//! Extraction never fails: unusable input produces [`OutlineOutcome::Empty`]
//! and a warning, and callers carry on with reduced output.

use quill_core::{OutlineOutcome, OutlineSection};
use serde_json::Value;
use tracing::{debug, warn};

pub const UNTITLED_SECTION: &str = "Untitled Section";

/// Remove Markdown code-fence markers and surrounding whitespace.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

pub fn extract_outline(raw: &str) -> OutlineOutcome {
    let cleaned = strip_code_fences(raw);

    let data: Value = match serde_json::from_str(&cleaned) {
        Ok(data) => data,
        Err(e) => {
            warn!("Outline is not valid JSON: {}", e);
            return OutlineOutcome::Empty;
        }
    };

    let records = match data.get("outline") {
        Some(Value::Array(records)) => records,
        Some(_) => {
            warn!("'outline' is not a list");
            return OutlineOutcome::Empty;
        }
        None => {
            warn!("Outline JSON has no 'outline' key");
            return OutlineOutcome::Empty;
        }
    };

    if records.is_empty() {
        warn!("Outline contains no sections");
        return OutlineOutcome::Empty;
    }

    let valid: Vec<OutlineSection> = records.iter().filter_map(validate_record).collect();
    let dropped = records.len() - valid.len();

    if !valid.is_empty() {
        if dropped > 0 {
            warn!(
                "Dropped {} of {} outline sections that failed validation",
                dropped,
                records.len()
            );
        }
        debug!("Extracted {} outline sections", valid.len());
        return OutlineOutcome::Valid(valid);
    }

    warn!("No outline section passed validation, using the raw sections");
    OutlineOutcome::RawFallback(records.iter().map(lenient_record).collect())
}

fn validate_record(record: &Value) -> Option<OutlineSection> {
    let title = record.get("title")?.as_str()?;
    if title.trim().is_empty() {
        return None;
    }
    let subtopics = record
        .get("subtopics")?
        .as_array()?
        .iter()
        .map(|s| s.as_str().map(str::to_string))
        .collect::<Option<Vec<_>>>()?;

    Some(OutlineSection {
        title: title.to_string(),
        subtopics,
    })
}

fn lenient_record(record: &Value) -> OutlineSection {
    // A bare string record is treated as a title without subtopics.
    let title = match record {
        Value::String(s) => Some(s.clone()),
        _ => match record.get("title") {
            Some(Value::Null) | None => None,
            Some(value) => Some(value_text(value)),
        },
    }
    .filter(|title| !title.trim().is_empty())
    .unwrap_or_else(|| UNTITLED_SECTION.to_string());

    let subtopics = match record.get("subtopics") {
        Some(Value::Array(items)) => items.iter().map(value_text).collect(),
        Some(Value::String(s)) => vec![s.clone()],
        _ => Vec::new(),
    };

    OutlineSection { title, subtopics }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
