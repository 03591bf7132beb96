//! Prompt composition

const INSTRUCTION: &str =
    "Please adjust the tone of the following text to align with the tone of the sample text.";
const TONE_HEADER: &str = "Sample tone:";
const CONTENT_HEADER: &str = "Rewrite this text in the sample tone:";
const CLOSING: &str = "Ensure the rewritten text mirrors tone, style, and formality of the sample.";

/// Combines the tone sample and the content to rewrite into one instruction string.
///
/// Section order is fixed: instruction, tone sample, content, closing constraint.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptComposer;

impl PromptComposer {
    pub fn new() -> Self {
        Self
    }

    pub fn build_prompt(&self, tone_text: &str, content_text: &str) -> String {
        format!(
            "{INSTRUCTION}\n\n{TONE_HEADER}\n{tone_text}\n\n{CONTENT_HEADER}\n{content_text}\n\n{CLOSING}"
        )
    }
}
