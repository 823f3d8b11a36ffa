//! Create-event content: `{"desc": "...", "img_url": "..."}`.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Content record of a create event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CreateContent {
    #[serde(default)]
    pub desc: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub img_url: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Renders create content. Both fields are always written.
pub fn encode_create_content(desc: &str, img_url: &str) -> String {
    serde_json::json!({ "desc": desc, "img_url": img_url }).to_string()
}

/// Reads create content without judging it; returns `None` if it is not a
/// JSON object of the expected shape.
pub fn decode_create_content(content: &str) -> Option<CreateContent> {
    let value: serde_json::Value = serde_json::from_str(content).ok()?;
    if !value.is_object() {
        return None;
    }
    serde_json::from_value(value).ok()
}

/// Checks create content: a JSON object with a non-empty string `desc`.
pub fn check_create_content(content: &str) -> Result<CreateContent, ValidationError> {
    let value: serde_json::Value =
        serde_json::from_str(content).map_err(|e| ValidationError::InvalidContent {
            reason: format!("not JSON: {e}"),
        })?;
    if !value.is_object() {
        return Err(ValidationError::InvalidContent {
            reason: "expected a JSON object".to_string(),
        });
    }
    let parsed: CreateContent =
        serde_json::from_value(value).map_err(|e| ValidationError::InvalidContent {
            reason: e.to_string(),
        })?;
    if parsed.desc.is_empty() {
        return Err(ValidationError::InvalidContent {
            reason: "missing description".to_string(),
        });
    }
    Ok(parsed)
}
