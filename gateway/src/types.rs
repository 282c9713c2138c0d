//! Gateway-internal types and HTTP payloads

use serde::Deserialize;
use shared::{GenerationRequest, TokenUsage};

/// One completion returned by the upstream generation API.
#[derive(Clone, Debug, PartialEq)]
pub struct Completion {
    pub text: String,
    pub usage: TokenUsage,
    pub model: String,
}

/// Body of `POST /api/claude`.
///
/// `prompt` is optional at the serde level so a missing field surfaces as
/// a 400 with a readable message instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleGenerationPayload {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub design_brief: Option<String>,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub system_instructions: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Body of `POST /api/claude/bulk` and `POST /api/claude/bulk-stream`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkGenerationPayload {
    #[serde(default)]
    pub requests: Vec<GenerationRequest>,
    #[serde(default)]
    pub system_instructions: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl SingleGenerationPayload {
    /// Split the payload into the request proper and its options.
    pub fn into_request(self) -> (Option<GenerationRequest>, Option<String>, Option<String>) {
        let request = self.prompt.and_then(|prompt| {
            let prompt = prompt.trim().to_string();
            if prompt.is_empty() {
                return None;
            }
            Some(GenerationRequest {
                prompt,
                design_brief: self.design_brief,
                project_name: self.project_name,
            })
        });
        (request, self.system_instructions, self.api_key)
    }
}
