//! Provider facade w/o async-trait or dynamic trait objects.
//!
//! We expose an enum `ProviderClient` with concrete implementations per
//! provider. This keeps async fns simple and avoids boxing futures.
//!
//! Per the adapter contract, the three public operations never propagate
//! remote failures: `fetch_diff` returns `None` and `post_comment` /
//! `test_connection` return `false`, with the underlying error logged.

pub mod gitee;
pub mod github;
pub mod gitlab;

use tracing::error;

use crate::errors::EngineResult;

/// Git hosting provider kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    GitLab,
    GitHub,
    Gitee,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ProviderKind::GitLab => "gitlab",
            ProviderKind::GitHub => "github",
            ProviderKind::Gitee => "gitee",
        };
        f.write_str(s)
    }
}

/// Everything needed to talk to one configured repository.
#[derive(Debug, Clone)]
pub struct ProviderCredential {
    pub kind: ProviderKind,
    /// Repository web URL, e.g. "https://github.com/acme/widget".
    /// The REST API base is derived from its host.
    pub repository_url: String,
    /// Provider-native identifier: numeric project id for GitLab,
    /// `owner/repo` full name for GitHub and Gitee.
    pub project: String,
    /// Access token for the provider (PAT or project token).
    pub token: String,
}

/// Concrete provider client (enum-dispatch).
#[derive(Debug, Clone)]
pub enum ProviderClient {
    GitLab(gitlab::GitLabClient),
    GitHub(github::GitHubClient),
    Gitee(gitee::GiteeClient),
}

impl ProviderClient {
    /// Constructs a concrete client from a repository credential.
    pub fn from_credential(cred: ProviderCredential) -> EngineResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent("review-ai-backend/0.1")
            .connect_timeout(std::time::Duration::from_secs(10))
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        let base_api = api_base(cred.kind, &cred.repository_url);
        Ok(match cred.kind {
            ProviderKind::GitLab => {
                Self::GitLab(gitlab::GitLabClient::new(http, base_api, cred.project, cred.token))
            }
            ProviderKind::GitHub => {
                Self::GitHub(github::GitHubClient::new(http, base_api, cred.project, cred.token))
            }
            ProviderKind::Gitee => {
                Self::Gitee(gitee::GiteeClient::new(http, base_api, cred.project, cred.token))
            }
        })
    }

    /// Fetches the unified diff for an MR/PR.
    ///
    /// Returns `None` on any remote failure (logged, never propagated).
    pub async fn fetch_diff(&self, request_id: u64) -> Option<String> {
        let result = match self {
            Self::GitLab(c) => c.get_diff(request_id).await,
            Self::GitHub(c) => c.get_diff(request_id).await,
            Self::Gitee(c) => c.get_diff(request_id).await,
        };
        match result {
            Ok(diff) => Some(diff),
            Err(err) => {
                error!(provider = %self.kind(), request_id, %err, "diff fetch failed");
                None
            }
        }
    }

    /// Posts a review comment on an MR/PR.
    ///
    /// Returns `false` on any remote failure (logged, never propagated).
    pub async fn post_comment(&self, request_id: u64, body: &str) -> bool {
        let result = match self {
            Self::GitLab(c) => c.create_note(request_id, body).await,
            Self::GitHub(c) => c.create_comment(request_id, body).await,
            Self::Gitee(c) => c.create_comment(request_id, body).await,
        };
        match result {
            Ok(()) => true,
            Err(err) => {
                error!(provider = %self.kind(), request_id, %err, "comment post failed");
                false
            }
        }
    }

    /// Probes the provider API with the configured token.
    pub async fn test_connection(&self) -> bool {
        let result = match self {
            Self::GitLab(c) => c.get_current_user().await,
            Self::GitHub(c) => c.get_current_user().await,
            Self::Gitee(c) => c.get_current_user().await,
        };
        match result {
            Ok(()) => true,
            Err(err) => {
                error!(provider = %self.kind(), %err, "connection test failed");
                false
            }
        }
    }

    fn kind(&self) -> ProviderKind {
        match self {
            Self::GitLab(_) => ProviderKind::GitLab,
            Self::GitHub(_) => ProviderKind::GitHub,
            Self::Gitee(_) => ProviderKind::Gitee,
        }
    }
}

/// Derives the REST API base from a repository web URL.
///
/// The public hosts map to their fixed API hosts; any other host keeps its
/// origin (plus the GitLab `/api/v4` path), so self-hosted instances and
/// local test servers work unchanged.
pub fn api_base(kind: ProviderKind, repository_url: &str) -> String {
    let origin = url_origin(repository_url);
    let host = origin
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(&origin);

    match kind {
        ProviderKind::GitHub if host == "github.com" => "https://api.github.com".to_string(),
        ProviderKind::GitHub => origin,
        ProviderKind::Gitee if host == "gitee.com" => "https://gitee.com/api/v5".to_string(),
        ProviderKind::Gitee => origin,
        ProviderKind::GitLab => format!("{origin}/api/v4"),
    }
}

/// `scheme://host[:port]` part of a URL, without trailing path.
fn url_origin(url: &str) -> String {
    let url = url.trim().trim_end_matches('/');
    match url.split_once("://") {
        Some((scheme, rest)) => {
            let host = rest.split('/').next().unwrap_or(rest);
            format!("{scheme}://{host}")
        }
        None => {
            let host = url.split('/').next().unwrap_or(url);
            format!("https://{host}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_hosts_map_to_fixed_api_bases() {
        assert_eq!(
            api_base(ProviderKind::GitHub, "https://github.com/acme/widget"),
            "https://api.github.com"
        );
        assert_eq!(
            api_base(ProviderKind::Gitee, "https://gitee.com/acme/widget"),
            "https://gitee.com/api/v5"
        );
        assert_eq!(
            api_base(ProviderKind::GitLab, "https://gitlab.com/acme/widget"),
            "https://gitlab.com/api/v4"
        );
    }

    #[test]
    fn self_hosted_urls_keep_their_origin() {
        assert_eq!(
            api_base(ProviderKind::GitLab, "https://git.corp.example/acme/widget"),
            "https://git.corp.example/api/v4"
        );
        assert_eq!(
            api_base(ProviderKind::GitHub, "http://127.0.0.1:4567/acme/widget"),
            "http://127.0.0.1:4567"
        );
        assert_eq!(
            api_base(ProviderKind::Gitee, "http://127.0.0.1:4567/acme/widget"),
            "http://127.0.0.1:4567"
        );
    }

    #[test]
    fn scheme_defaults_to_https() {
        assert_eq!(
            api_base(ProviderKind::GitHub, "github.com/acme/widget"),
            "https://api.github.com"
        );
    }
}
