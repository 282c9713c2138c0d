//! Wire types shared between the gateway and the studio consumer
//!
//! All JSON field names are camelCase to match the HTTP surface.

use serde::{Deserialize, Serialize};

/// One user-entered line item in a bulk batch. Immutable once submitted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub design_brief: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            design_brief: None,
            project_name: None,
        }
    }
}

/// Token accounting reported by the upstream generation API.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl TokenUsage {
    pub fn total(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }
}

/// Successful result for one request. `index` ties it back to the
/// originating request regardless of arrival order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedItem {
    pub index: usize,
    pub prompt: String,
    pub code: String,
    pub usage: TokenUsage,
    pub success: bool,
}

impl GeneratedItem {
    pub fn new(index: usize, prompt: impl Into<String>, code: impl Into<String>, usage: TokenUsage) -> Self {
        Self {
            index,
            prompt: prompt.into(),
            code: code.into(),
            usage,
            success: true,
        }
    }
}

/// Failed result for one request. Recorded, never propagated: a failed
/// item does not abort the batch it belongs to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationFailure {
    pub index: usize,
    pub prompt: String,
    pub error: String,
    pub success: bool,
}

impl GenerationFailure {
    pub fn new(index: usize, prompt: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            index,
            prompt: prompt.into(),
            error: error.into(),
            success: false,
        }
    }
}

/// Aggregate outcome of one batch, built incrementally as items resolve.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    pub results: Vec<GeneratedItem>,
    pub errors: Vec<GenerationFailure>,
    pub total_generated: usize,
    pub total_failed: usize,
    pub total_requests: usize,
    pub total_tokens_used: u32,
}

impl BatchOutcome {
    pub fn new(total_requests: usize) -> Self {
        Self {
            total_requests,
            ..Self::default()
        }
    }

    pub fn record_success(&mut self, item: GeneratedItem) {
        self.total_generated += 1;
        self.total_tokens_used += item.usage.total();
        self.results.push(item);
    }

    pub fn record_failure(&mut self, failure: GenerationFailure) {
        self.total_failed += 1;
        self.errors.push(failure);
    }

    /// True once every submitted request has a result or an error.
    pub fn is_settled(&self) -> bool {
        self.total_generated + self.total_failed >= self.total_requests
    }
}

/// One frame of the streaming protocol, discriminated on `type`.
///
/// Events are transient: the gateway emits them in submission order and
/// never persists them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ProgressEvent {
    /// The gateway is about to start item `current` of `total` (1-based).
    Progress {
        current: usize,
        total: usize,
        prompt: String,
    },
    /// Item completed; carries its result.
    Success { result: GeneratedItem },
    /// Item failed upstream; the batch continues.
    Error { result: GenerationFailure },
    /// Final frame; the connection closes after this.
    Complete { outcome: BatchOutcome },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_accumulation() {
        let mut outcome = BatchOutcome::new(3);
        assert!(!outcome.is_settled());

        outcome.record_success(GeneratedItem::new(
            0,
            "a button",
            "function Button() {}",
            TokenUsage {
                input_tokens: 10,
                output_tokens: 20,
            },
        ));
        outcome.record_failure(GenerationFailure::new(1, "a slider", "rate limited"));
        outcome.record_success(GeneratedItem::new(
            2,
            "a card",
            "function Card() {}",
            TokenUsage {
                input_tokens: 5,
                output_tokens: 7,
            },
        ));

        assert!(outcome.is_settled());
        assert_eq!(outcome.total_generated, 2);
        assert_eq!(outcome.total_failed, 1);
        assert_eq!(outcome.total_tokens_used, 42);
        assert_eq!(outcome.results.len() + outcome.errors.len(), 3);
    }

    #[test]
    fn test_progress_event_wire_format() {
        let event = ProgressEvent::Progress {
            current: 1,
            total: 2,
            prompt: "a button".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "progress");
        assert_eq!(json["current"], 1);

        let success = ProgressEvent::Success {
            result: GeneratedItem::new(0, "a button", "code", TokenUsage::default()),
        };
        let json = serde_json::to_value(&success).unwrap();
        assert_eq!(json["type"], "success");
        assert_eq!(json["result"]["success"], true);
        assert!(json["result"]["usage"]["inputTokens"].is_number());

        let parsed: ProgressEvent = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, success);
    }

    #[test]
    fn test_outcome_wire_field_names() {
        let outcome = BatchOutcome::new(1);
        let json = serde_json::to_value(&outcome).unwrap();
        assert!(json.get("totalRequests").is_some());
        assert!(json.get("totalGenerated").is_some());
        assert!(json.get("totalFailed").is_some());
        assert!(json.get("totalTokensUsed").is_some());
    }
}
