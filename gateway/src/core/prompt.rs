//! User-message assembly and code-fence normalization

use std::sync::OnceLock;

use regex::Regex;
use shared::GenerationRequest;

/// Fallback system prompt when the caller supplies none. Configuration
/// data, not behavior.
pub const DEFAULT_SYSTEM_INSTRUCTIONS: &str = "You are an expert React developer. \
Generate a single, self-contained React function component that fulfils the user's request. \
Respond with plain JavaScript source only: no markdown fences, no commentary.";

/// Build the single user message for one generation request by
/// concatenating the prompt with its optional context sections.
pub fn build_user_message(request: &GenerationRequest) -> String {
    let mut message = request.prompt.trim().to_string();

    if let Some(brief) = request.design_brief.as_deref() {
        let brief = brief.trim();
        if !brief.is_empty() {
            message.push_str("\n\nDesign brief: ");
            message.push_str(brief);
        }
    }

    if let Some(name) = request.project_name.as_deref() {
        let name = name.trim();
        if !name.is_empty() {
            message.push_str("\n\nProject name: ");
            message.push_str(name);
        }
    }

    message
}

fn wrapped_fence_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)^\s*```(?:javascript|jsx|js)?[ \t]*\r?\n?(.*?)(?:\r?\n)?```\s*$")
            .expect("fence regex is valid")
    })
}

fn opening_fence_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*```(?:javascript|jsx|js)?[ \t]*\r?\n?").expect("fence regex is valid")
    })
}

/// Strip any markdown code-fence wrapping from upstream text.
///
/// Tolerates `javascript`/`jsx`/`js` language tags and a missing closing
/// fence. Fence-free text is returned unchanged, so stripping twice
/// equals stripping once.
pub fn strip_code_fences(text: &str) -> String {
    if let Some(caps) = wrapped_fence_regex().captures(text) {
        return caps[1].to_string();
    }
    if let Some(m) = opening_fence_regex().find(text) {
        return text[m.end()..].trim_end().to_string();
    }
    text.to_string()
}
