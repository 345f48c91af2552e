//! Validation of generated flavor text.
//!
//! Generator output is untrusted. Only `title` and `description` are read;
//! numeric fields such as `rewardAmount` are ignored so generated text can
//! never move progression numbers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::constants::{MAX_DESCRIPTION_LENGTH, MAX_TITLE_LENGTH};
use crate::error::ContentError;

/// Display text for a quest or guild event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flavor {
    pub title: String,
    pub description: String,
}

impl Flavor {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Extract JSON from a response that might be wrapped in a markdown fence.
pub fn extract_json(text: &str) -> &str {
    let text = text.trim();

    if let Some(start) = text.find("```json") {
        let content_start = start + 7;
        if let Some(end) = text[content_start..].find("```") {
            return text[content_start..content_start + end].trim();
        }
    }

    if let Some(start) = text.find("```") {
        let content_start = start + 3;
        if let Some(end) = text[content_start..].find("```") {
            return text[content_start..content_start + end].trim();
        }
    }

    text
}

/// Parses a generator response into validated flavors.
///
/// Accepts a bare array, an object wrapping an array under `quests`,
/// `events` or `items`, or a single object. Entries that fail validation are
/// dropped; an empty result is an error.
pub fn parse_flavors(raw: &str) -> Result<Vec<Flavor>, ContentError> {
    let json = extract_json(raw);
    let value: Value =
        serde_json::from_str(json).map_err(|e| ContentError::Malformed(e.to_string()))?;

    let entries: Vec<&Value> = match &value {
        Value::Array(items) => items.iter().collect(),
        Value::Object(map) => {
            match ["quests", "events", "items"]
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_array))
            {
                Some(items) => items.iter().collect(),
                None => vec![&value],
            }
        }
        _ => {
            return Err(ContentError::Malformed(
                "expected a JSON array or object".to_string(),
            ))
        }
    };

    let flavors: Vec<Flavor> = entries.into_iter().filter_map(validate_entry).collect();

    if flavors.is_empty() {
        return Err(ContentError::Malformed(
            "no entry had a usable title and description".to_string(),
        ));
    }
    Ok(flavors)
}

fn validate_entry(entry: &Value) -> Option<Flavor> {
    let title = clean_text(entry.get("title")?.as_str()?, MAX_TITLE_LENGTH)?;
    let description = clean_text(entry.get("description")?.as_str()?, MAX_DESCRIPTION_LENGTH)?;
    Some(Flavor { title, description })
}

/// Strips control characters and rejects empty or overlong text.
fn clean_text(text: &str, max_chars: usize) -> Option<String> {
    let cleaned: String = text
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    if cleaned.is_empty() || cleaned.chars().count() > max_chars {
        return None;
    }
    Some(cleaned)
}
