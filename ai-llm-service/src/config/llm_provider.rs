use serde::{Deserialize, Serialize};

/// Upstream vendor behind a chat-completion endpoint.
///
/// All three speak the OpenAI-compatible `/v1/chat/completions` shape
/// (Alibaba through its compatible-mode gateway, Anthropic through an
/// OpenAI-compatible proxy), so the provider tag only affects labeling
/// and validation, not the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LlmProvider {
    /// Alibaba DashScope (e.g. qwen-plus) in OpenAI-compatible mode.
    Alibaba,
    /// OpenAI API.
    OpenAi,
    /// Anthropic models behind an OpenAI-compatible endpoint.
    Anthropic,
}

impl LlmProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            LlmProvider::Alibaba => "ALIBABA",
            LlmProvider::OpenAi => "OPENAI",
            LlmProvider::Anthropic => "ANTHROPIC",
        }
    }
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
