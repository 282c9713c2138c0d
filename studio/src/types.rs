//! Studio-side types

use serde::{Deserialize, Serialize};
use shared::{GeneratedItem, TokenUsage};

/// One materialized tab in the working set.
///
/// The `{name, code, config}` triple must round-trip losslessly through
/// workspace export/import; `config` is an opaque JSON object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    pub name: String,
    pub code: String,
    pub config: serde_json::Value,
}

impl Artifact {
    /// Materialize one successful generation result.
    pub fn from_result(item: &GeneratedItem) -> Self {
        Self {
            name: derive_name(&item.prompt, item.index),
            code: item.code.clone(),
            config: serde_json::json!({
                "prompt": item.prompt,
                "usage": item.usage,
            }),
        }
    }
}

/// Tab names come from the originating prompt, truncated to stay
/// readable; empty prompts fall back to a positional name.
fn derive_name(prompt: &str, index: usize) -> String {
    const MAX_NAME_LEN: usize = 40;

    let trimmed = prompt.trim();
    if trimmed.is_empty() {
        return format!("Component {}", index + 1);
    }
    match trimmed.char_indices().nth(MAX_NAME_LEN) {
        Some((byte_offset, _)) => format!("{}…", &trimmed[..byte_offset]),
        None => trimmed.to_string(),
    }
}

/// Per-run options forwarded to the gateway.
#[derive(Clone, Debug, Default)]
pub struct RequestOptions {
    pub system_instructions: Option<String>,
    pub api_key: Option<String>,
}

/// Response of the single-item endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleGeneration {
    pub code: String,
    pub usage: TokenUsage,
    pub model: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_name_from_prompt() {
        let item = GeneratedItem::new(0, "a glowing button", "code", TokenUsage::default());
        let artifact = Artifact::from_result(&item);
        assert_eq!(artifact.name, "a glowing button");
        assert_eq!(artifact.config["prompt"], "a glowing button");
    }

    #[test]
    fn test_artifact_name_truncates_long_prompts() {
        let prompt = "x".repeat(80);
        let name = derive_name(&prompt, 0);
        assert!(name.chars().count() <= 41);
        assert!(name.ends_with('…'));
    }

    #[test]
    fn test_artifact_name_fallback_for_empty_prompt() {
        assert_eq!(derive_name("   ", 2), "Component 3");
    }
}
