//! Review dispatcher: template selection + chat completion.
//!
//! The dispatcher turns a diff into review text. It is synchronous from the
//! caller's perspective (no chunking, no retry, no streaming); the webhook
//! path wraps it in a [`ReviewTask`](crate::ReviewTask) to run in the
//! background.

pub mod prompt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use ai_llm_service::{ChatService, LlmModelConfig};

use crate::errors::EngineResult;

/// Which prompt template(s) a review request uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReviewKind {
    Basic,
    Security,
    Performance,
    Summary,
    /// Summary + security + performance + basic analysis, each requested
    /// independently and joined under one report heading.
    Comprehensive,
}

impl Default for ReviewKind {
    fn default() -> Self {
        ReviewKind::Comprehensive
    }
}

/// Notice returned instead of calling the LLM when reviews are switched off.
pub const REVIEW_DISABLED_NOTICE: &str =
    "AI code review is currently disabled. Enable it with AI_REVIEW_ENABLED=true.";

/// Sends rendered prompts to a chat-completion endpoint.
pub struct ReviewDispatcher {
    chat: ChatService,
    enabled: bool,
}

impl ReviewDispatcher {
    /// Builds a dispatcher from a model config.
    ///
    /// `enabled = false` turns every review into a fixed notice string
    /// without touching the endpoint (kill switch for the whole feature).
    pub fn new(cfg: LlmModelConfig, enabled: bool) -> EngineResult<Self> {
        let chat = ChatService::new(cfg)?;
        Ok(Self { chat, enabled })
    }

    /// Runs one review and returns the model output verbatim.
    ///
    /// `Comprehensive` issues the four building-block requests one after
    /// another and concatenates their outputs.
    pub async fn review(&self, diff: &str, kind: ReviewKind) -> EngineResult<String> {
        if !self.enabled {
            debug!("review disabled, returning notice");
            return Ok(REVIEW_DISABLED_NOTICE.to_string());
        }

        if kind != ReviewKind::Comprehensive {
            let text = self.chat.generate(&prompt::render(kind, diff)).await?;
            return Ok(text);
        }

        let mut report = String::from("# AI Code Review Report\n");
        let sections = [
            ("## Change Summary", ReviewKind::Summary),
            ("## Security Audit", ReviewKind::Security),
            ("## Performance Analysis", ReviewKind::Performance),
            ("## Detailed Review", ReviewKind::Basic),
        ];

        for (heading, part) in sections {
            debug!(?part, "comprehensive review section");
            let text = self.chat.generate(&prompt::render(part, diff)).await?;
            report.push_str("\n");
            report.push_str(heading);
            report.push_str("\n\n");
            report.push_str(text.trim());
            report.push('\n');
        }

        Ok(report)
    }
}
