use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::Track;

/// One search result as the archive returns it.
///
/// The search API is loose about shapes: text fields show up either as a
/// string or as a one-element array, and counts sometimes arrive as strings.
/// Only `identifier` is required; everything else falls back to empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDocument {
    pub identifier: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub venue: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub coverage: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub year: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub downloads: u64,
    #[serde(default, deserialize_with = "lenient_tracks")]
    pub tracks: Vec<Track>,
    #[serde(default, alias = "avg_rating", deserialize_with = "lenient_rating")]
    pub rating: f64,
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => items.first().and_then(text_of),
        _ => None,
    }
}

fn number_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Array(items) => items.first().and_then(number_of),
        _ => None,
    }
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(text_of(&value))
}

fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(number_of(&value)
        .filter(|n| n.is_finite() && *n > 0.0)
        .map(|n| n as u64)
        .unwrap_or(0))
}

fn lenient_rating<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(number_of(&value)
        .filter(|n| n.is_finite() && *n > 0.0)
        .unwrap_or(0.0))
}

fn lenient_tracks<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Track>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };

    Ok(items
        .iter()
        .map(|item| match item {
            Value::Object(fields) => Track {
                title: fields.get("title").and_then(text_of),
            },
            Value::String(s) => Track {
                title: Some(s.clone()),
            },
            _ => Track { title: None },
        })
        .collect())
}
