//! Provider client behavior against local stub servers.
//!
//! The three public operations must degrade instead of erroring: a failing
//! remote turns `fetch_diff` into `None` and `post_comment` /
//! `test_connection` into `false`.

use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use serde_json::json;

use review_engine::git_providers::{ProviderClient, ProviderCredential, ProviderKind};

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn credential(kind: ProviderKind, base: &str, project: &str) -> ProviderCredential {
    ProviderCredential {
        kind,
        repository_url: format!("{base}/{project}"),
        project: project.to_string(),
        token: "test-token".into(),
    }
}

#[tokio::test]
async fn failing_remote_degrades_to_none_and_false() {
    // every route answers 500
    let base = serve(Router::new().fallback(|| async { StatusCode::INTERNAL_SERVER_ERROR })).await;
    let client =
        ProviderClient::from_credential(credential(ProviderKind::GitHub, &base, "acme/widget"))
            .unwrap();

    assert_eq!(client.fetch_diff(7).await, None);
    assert!(!client.post_comment(7, "text").await);
    assert!(!client.test_connection().await);
}

#[tokio::test]
async fn unreachable_host_degrades_the_same_way() {
    // nothing listens on this port
    let client = ProviderClient::from_credential(ProviderCredential {
        kind: ProviderKind::Gitee,
        repository_url: "http://127.0.0.1:9/acme/widget".into(),
        project: "acme/widget".into(),
        token: "test-token".into(),
    })
    .unwrap();

    assert_eq!(client.fetch_diff(1).await, None);
    assert!(!client.post_comment(1, "text").await);
}

#[tokio::test]
async fn gitlab_changes_are_joined_into_one_unified_diff() {
    let router = Router::new()
        .route(
            "/api/v4/projects/{id}/merge_requests/{iid}/changes",
            get(|| async {
                Json(json!({
                    "changes": [
                        {
                            "old_path": "src/a.rs",
                            "new_path": "src/a.rs",
                            "diff": "@@ -1 +1,2 @@\n fn a() {}\n+fn a2() {}"
                        },
                        { "old_path": "gone.rs", "new_path": "gone.rs", "diff": null },
                        {
                            "old_path": "src/b.rs",
                            "new_path": "src/b.rs",
                            "diff": "@@ -0,0 +1 @@\n+fn b() {}"
                        }
                    ]
                }))
            }),
        )
        .route(
            "/api/v4/projects/{id}/merge_requests/{iid}/notes",
            post(|| async { StatusCode::CREATED }),
        );
    let base = serve(router).await;

    let client =
        ProviderClient::from_credential(credential(ProviderKind::GitLab, &base, "123")).unwrap();

    let diff = client.fetch_diff(42).await.expect("diff expected");
    assert!(diff.contains("--- a/src/a.rs\n+++ b/src/a.rs\n@@ -1 +1,2 @@"));
    assert!(diff.contains("--- a/src/b.rs\n+++ b/src/b.rs"));
    // entries without a diff body are dropped
    assert!(!diff.contains("gone.rs"));

    assert!(client.post_comment(42, "looks good").await);
}

#[tokio::test]
async fn token_probe_reports_success_on_2xx() {
    let router = Router::new().route(
        "/api/v4/user",
        get(|| async { Json(json!({ "id": 1, "username": "bot" })) }),
    );
    let base = serve(router).await;

    let client =
        ProviderClient::from_credential(credential(ProviderKind::GitLab, &base, "123")).unwrap();
    assert!(client.test_connection().await);
}
