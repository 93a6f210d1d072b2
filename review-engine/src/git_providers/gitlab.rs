//! GitLab provider (REST v4) for MR diffs and notes.
//!
//! Endpoints used:
//! - GET  /projects/:id/merge_requests/:iid/changes  (file diffs)
//! - POST /projects/:id/merge_requests/:iid/notes    (general comment)
//! - GET  /user                                      (connection test)

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{EngineResult, ProviderError};

#[derive(Debug, Clone)]
pub struct GitLabClient {
    http: Client,
    base_api: String, // e.g. "https://gitlab.com/api/v4"
    project: String,  // numeric id or "group/project"
    token: String,    // "PRIVATE-TOKEN"
}

impl GitLabClient {
    pub fn new(http: Client, base_api: String, project: String, token: String) -> Self {
        Self {
            http,
            base_api,
            project,
            token,
        }
    }

    /// Fetches file-level diffs and joins them into one unified diff text.
    pub async fn get_diff(&self, iid: u64) -> EngineResult<String> {
        let url = format!(
            "{}/projects/{}/merge_requests/{}/changes",
            self.base_api,
            urlencoding::encode(&self.project),
            iid
        );
        debug!(%url, "fetch merge request changes");

        let resp: GitLabMrChanges = self
            .http
            .get(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let mut parts = Vec::with_capacity(resp.changes.len());
        for change in resp.changes {
            let Some(diff) = change.diff else { continue };
            if diff.is_empty() {
                continue;
            }
            // The per-file `diff` field starts at the hunk header; restore
            // the file header lines so the joined text stays unified-format.
            parts.push(format!(
                "--- a/{}\n+++ b/{}\n{}",
                change.old_path, change.new_path, diff
            ));
        }

        Ok(parts.join("\n"))
    }

    /// Posts a general note on the MR.
    pub async fn create_note(&self, iid: u64, body: &str) -> EngineResult<()> {
        let url = format!(
            "{}/projects/{}/merge_requests/{}/notes",
            self.base_api,
            urlencoding::encode(&self.project),
            iid
        );
        debug!(%url, body_len = body.len(), "post merge request note");

        self.http
            .post(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .json(&NoteBody { body })
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
            .header("PRIVATE-TOKEN", &self.token)
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
struct GitLabMrChanges {
    changes: Vec<GitLabMrChange>,
}

#[derive(Debug, Deserialize)]
struct GitLabMrChange {
    old_path: String,
    new_path: String,
    diff: Option<String>,
}

#[derive(Debug, Serialize)]
struct NoteBody<'a> {
    body: &'a str,
}
