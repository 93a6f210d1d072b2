use review_engine::review::ReviewKind;
use serde::Deserialize;

/// Shared request body for direct review submissions.
///
/// `review_type` only applies to `/submit`; the kind-specific endpoints
/// ignore it and run their own template.
#[derive(Debug, Clone, Deserialize)]
pub struct CodeReviewRequest {
    pub project_id: String,
    pub merge_request_id: String,
    pub commit_sha: Option<String>,
    #[serde(default)]
    pub diff_content: String,
    #[serde(default)]
    pub review_type: ReviewKind,
    pub file_paths: Option<Vec<String>>,
    pub language: Option<String>,
    pub priority: Option<String>,
}
