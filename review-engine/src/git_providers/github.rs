//! GitHub provider (REST v3) for PR diffs and issue comments.
//!
//! Endpoints used:
//! - GET  /repos/:full_name/pulls/:number          (metadata, yields `diff_url`)
//! - GET  {diff_url}                               (unified diff text)
//! - POST /repos/:full_name/issues/:number/comments
//! - GET  /user                                    (connection test)

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{EngineResult, ProviderError};

#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    base_api: String, // e.g. "https://api.github.com"
    full_name: String, // "owner/repo"
    token: String,
}

impl GitHubClient {
    pub fn new(http: Client, base_api: String, full_name: String, token: String) -> Self {
        Self {
            http,
            base_api,
            full_name,
            token,
        }
    }

    /// Fetches the unified diff for a pull request.
    ///
    /// GitHub exposes the diff behind a separate `diff_url`, so this is a
    /// two-step fetch: PR metadata first, then the diff body.
    pub async fn get_diff(&self, number: u64) -> EngineResult<String> {
        let url = format!("{}/repos/{}/pulls/{}", self.base_api, self.full_name, number);
        debug!(%url, "fetch pull request metadata");

        let meta: GitHubPull = self
            .http
            .get(&url)
            .header("Authorization", format!("token {}", self.token))
            .header("Accept", "application/vnd.github.v3+json")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        debug!(diff_url = %meta.diff_url, "fetch pull request diff");
        let diff = self
            .http
            .get(&meta.diff_url)
            .header("Authorization", format!("token {}", self.token))
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(diff)
    }

    /// Posts a comment on the PR conversation (issues API).
    pub async fn create_comment(&self, number: u64, body: &str) -> EngineResult<()> {
        let url = format!(
            "{}/repos/{}/issues/{}/comments",
            self.base_api, self.full_name, number
        );
        debug!(%url, body_len = body.len(), "post pull request comment");

        self.http
            .post(&url)
            .header("Authorization", format!("token {}", self.token))
            .header("Accept", "application/vnd.github.v3+json")
            .json(&CommentBody { body })
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }

    /// Verifies the token by fetching the authenticated user.
    pub async fn get_current_user(&self) -> EngineResult<()> {
        let url = format!("{}/user", self.base_api);
        let resp = self
            .http
            .get(&url)
            .header("Authorization", format!("token {}", self.token))
            .header("Accept", "application/vnd.github.v3+json")
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(ProviderError::HttpStatus(resp.status().as_u16()).into());
        }
        Ok(())
    }
}

/* --------- response shapes (subset of fields we actually use) ----------- */

#[derive(Debug, Deserialize)]
struct GitHubPull {
    diff_url: String,
}

#[derive(Debug, Serialize)]
struct CommentBody<'a> {
    body: &'a str,
}
