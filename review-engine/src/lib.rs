//! Core engine for the AI review backend.
//!
//! Single high-level function to run the whole pipeline for a Merge Request /
//! Pull Request:
//!
//! 1) **Fetch** — pull the unified diff from the provider REST API.
//! 2) **Review** — render the prompt template(s) and call the chat endpoint.
//! 3) **Publish** — post the review text back as an MR/PR comment.
//!
//! Failures never propagate to the webhook sender: the diff fetch and the
//! comment post degrade to skip outcomes, and [`ReviewTask`] makes the
//! background execution an explicit value the caller can detach or await.
//!
//! The crate uses `tracing` for debug logging and avoids `async-trait` and
//! heap trait objects (no `Box<dyn ...>`). It relies on plain `async fn` and
//! enum-dispatch over thin provider clients.

pub mod diff;
pub mod errors;
pub mod git_providers;
pub mod review;
pub mod signature;

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info, warn};

use errors::EngineResult;
use git_providers::ProviderClient;
use review::{ReviewDispatcher, ReviewKind};

/// How a review run ended.
///
/// All variants are normal terminations: the pipeline converts downstream
/// failures into skip outcomes instead of errors, per the no-retry contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewOutcome {
    /// Review text was posted as a comment.
    Commented,
    /// The provider returned no diff (remote failure already logged).
    DiffUnavailable,
    /// The diff was empty; nothing to review.
    EmptyDiff,
    /// Review text was produced but the comment post failed.
    CommentFailed,
}

/// Run the fetch → review → comment pipeline for a single MR/PR.
///
/// `threshold` is the repository's review line budget: larger diffs are
/// truncated to it before rendering the prompt.
///
/// # Logging
/// Emits `debug!` per sub-stage with elapsed timings; terminal skips log at
/// `warn!`/`error!`.
pub async fn run_review(
    client: &ProviderClient,
    dispatcher: &ReviewDispatcher,
    request_id: u64,
    kind: ReviewKind,
    threshold: u32,
) -> EngineResult<ReviewOutcome> {
    let t0 = Instant::now();

    debug!(request_id, "fetch diff");
    let Some(raw_diff) = client.fetch_diff(request_id).await else {
        warn!(request_id, "diff unavailable, review skipped");
        return Ok(ReviewOutcome::DiffUnavailable);
    };
    debug!(
        request_id,
        diff_len = raw_diff.len(),
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "diff fetched"
    );

    if raw_diff.trim().is_empty() {
        info!(request_id, "empty diff, nothing to review");
        return Ok(ReviewOutcome::EmptyDiff);
    }

    let stats = diff::diff_stats(&raw_diff);
    let budget = threshold as usize;
    let diff_text = if stats.changed() > budget {
        debug!(
            request_id,
            changed = stats.changed(),
            budget,
            "diff over threshold, truncating"
        );
        diff::truncate_diff(&raw_diff, budget)
    } else {
        raw_diff
    };

    let t1 = Instant::now();
    debug!(request_id, ?kind, "run review");
    let text = dispatcher.review(&diff_text, kind).await?;
    debug!(
        request_id,
        output_len = text.len(),
        elapsed_ms = t1.elapsed().as_millis() as u64,
        "review produced"
    );

    let t2 = Instant::now();
    if client.post_comment(request_id, &text).await {
        info!(
            request_id,
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "review comment posted"
        );
        Ok(ReviewOutcome::Commented)
    } else {
        error!(
            request_id,
            elapsed_ms = t2.elapsed().as_millis() as u64,
            "review comment could not be posted"
        );
        Ok(ReviewOutcome::CommentFailed)
    }
}

/// A spawned review pipeline run.
///
/// Makes the background dispatch an explicit value: webhook handlers call
/// [`detach`](Self::detach) (logging wrapper, no delivery guarantee), tests
/// [`join`](Self::join) it.
pub struct ReviewTask {
    handle: tokio::task::JoinHandle<EngineResult<ReviewOutcome>>,
}

impl ReviewTask {
    /// Spawns the pipeline onto the runtime and returns the handle wrapper.
    pub fn spawn(
        client: ProviderClient,
        dispatcher: Arc<ReviewDispatcher>,
        request_id: u64,
        kind: ReviewKind,
        threshold: u32,
    ) -> Self {
        let handle = tokio::spawn(async move {
            run_review(&client, &dispatcher, request_id, kind, threshold).await
        });
        Self { handle }
    }

    /// Lets the task run to completion unobserved, logging its terminal state.
    pub fn detach(self) {
        tokio::spawn(async move {
            match self.handle.await {
                Ok(Ok(outcome)) => debug!(?outcome, "review task finished"),
                Ok(Err(err)) => error!(%err, "review task failed"),
                Err(err) => error!(%err, "review task panicked"),
            }
        });
    }

    /// Awaits the task and returns its outcome.
    pub async fn join(self) -> EngineResult<ReviewOutcome> {
        self.handle
            .await
            .map_err(|e| errors::Error::Other(format!("join error: {e}")))?
    }
}
