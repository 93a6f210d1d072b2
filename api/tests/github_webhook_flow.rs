//! End-to-end webhook flow against stub provider and LLM servers.
//!
//! A GitHub `pull_request` delivery with a valid body signature must fetch
//! the diff, run the review against the chat endpoint, and post the result
//! back as a PR comment, all after the webhook already got its 200.

use std::sync::{
    Arc, Mutex, OnceLock,
    atomic::{AtomicUsize, Ordering},
};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use config_store::{ConfigStore, GitProvider, ModelConfigDraft, ModelProvider, RepositoryConfigDraft};
use review_engine::signature::hmac_sha256_hex;
use serde_json::{Value, json};

use api::AppState;
use api::core::app_state::AuthConfig;

const WEBHOOK_SECRET: &str = "wh-secret";
const REVIEW_TEXT: &str = "stub review text";
const SAMPLE_DIFF: &str = "--- a/src/lib.rs\n+++ b/src/lib.rs\n@@ -1 +1,2 @@\n fn a() {}\n+fn b() {}\n";

/* ------------------------------ stub servers ----------------------------- */

#[derive(Clone, Default)]
struct ProviderStub {
    /// Own base URL, set once the listener is bound.
    base_url: Arc<OnceLock<String>>,
    meta_hits: Arc<AtomicUsize>,
    comments: Arc<Mutex<Vec<String>>>,
}

async fn pull_meta(State(stub): State<ProviderStub>) -> Json<Value> {
    stub.meta_hits.fetch_add(1, Ordering::SeqCst);
    let base = stub.base_url.get().cloned().unwrap_or_default();
    Json(json!({ "diff_url": format!("{base}/diff") }))
}

async fn pull_diff() -> &'static str {
    SAMPLE_DIFF
}

async fn post_comment(State(stub): State<ProviderStub>, Json(body): Json<Value>) -> StatusCode {
    let text = body["body"].as_str().unwrap_or_default().to_string();
    stub.comments.lock().unwrap().push(text);
    StatusCode::CREATED
}

async fn chat_completions(State(hits): State<Arc<AtomicUsize>>) -> Json<Value> {
    hits.fetch_add(1, Ordering::SeqCst);
    Json(json!({
        "choices": [ { "message": { "role": "assistant", "content": REVIEW_TEXT } } ]
    }))
}

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

async fn spawn_provider_stub() -> (String, ProviderStub) {
    let stub = ProviderStub::default();
    let router = Router::new()
        .route("/repos/{owner}/{repo}/pulls/{number}", get(pull_meta))
        .route("/diff", get(pull_diff))
        .route("/repos/{owner}/{repo}/issues/{number}/comments", post(post_comment))
        .with_state(stub.clone());

    let base = serve(router).await;
    stub.base_url.set(base.clone()).unwrap();
    (base, stub)
}

async fn spawn_llm_stub() -> (String, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let router = Router::new()
        .route("/v1/chat/completions", post(chat_completions))
        .with_state(hits.clone());
    (serve(router).await, hits)
}

/* ------------------------------- app setup ------------------------------- */

fn auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "test-secret".into(),
        expiration_ms: 60_000,
        admin_username: "admin".into(),
        admin_password: "admin123".into(),
    }
}

/// Store with one default model (pointing at the LLM stub) and one GitHub
/// repository config (pointing at the provider stub).
async fn seeded_store(llm_base: &str, provider_base: &str, secret: Option<&str>) -> Arc<ConfigStore> {
    let store = Arc::new(ConfigStore::new());

    store
        .create_model(ModelConfigDraft {
            name: "stub-model".into(),
            provider: ModelProvider::OpenAi,
            api_key: "sk-test".into(),
            api_endpoint: llm_base.to_string(),
            temperature: None,
            max_tokens: None,
            timeout_ms: None,
            is_active: Some(true),
            is_default: Some(true),
            description: None,
        })
        .await
        .unwrap();

    store
        .create_repository(RepositoryConfigDraft {
            name: "acme/widget".into(),
            repository_url: format!("{provider_base}/acme/widget"),
            provider: GitProvider::GitHub,
            project_id: Some("acme/widget".into()),
            access_token: "ghp-test".into(),
            webhook_secret: secret.map(str::to_string),
            webhook_url: None,
            is_active: Some(true),
            auto_review_enabled: Some(true),
            review_threshold: None,
            description: None,
        })
        .await
        .unwrap();

    store
}

async fn spawn_app(store: Arc<ConfigStore>) -> String {
    let state = Arc::new(AppState::new(store, auth_config(), true));
    serve(api::app(state)).await
}

fn pr_payload(action: &str) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "action": action,
        "pull_request": { "number": 7 },
        "repository": { "full_name": "acme/widget" }
    }))
    .unwrap()
}

fn signature_for(body: &[u8]) -> String {
    format!("sha256={}", hmac_sha256_hex(WEBHOOK_SECRET.as_bytes(), body))
}

async fn wait_for_comment(stub: &ProviderStub) -> Option<String> {
    for _ in 0..200 {
        if let Some(comment) = stub.comments.lock().unwrap().first().cloned() {
            return Some(comment);
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    None
}

/* --------------------------------- tests --------------------------------- */

#[tokio::test]
async fn signed_pull_request_event_ends_in_a_posted_comment() {
    let (provider_base, provider) = spawn_provider_stub().await;
    let (llm_base, llm_hits) = spawn_llm_stub().await;
    let store = seeded_store(&llm_base, &provider_base, Some(WEBHOOK_SECRET)).await;
    let app_base = spawn_app(store).await;

    let body = pr_payload("opened");
    let resp = reqwest::Client::new()
        .post(format!("{app_base}/api/webhook/github"))
        .header("X-GitHub-Event", "pull_request")
        .header("X-Hub-Signature-256", signature_for(&body))
        .header("Content-Type", "application/json")
        .body(body)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let ack: Value = resp.json().await.unwrap();
    assert_eq!(ack["success"], json!(true));
    assert_eq!(ack["data"]["message"], json!("review started"));

    let comment = wait_for_comment(&provider).await.expect("no comment posted");
    assert!(comment.contains("# AI Code Review Report"));
    assert!(comment.contains(REVIEW_TEXT));

    assert_eq!(provider.meta_hits.load(Ordering::SeqCst), 1);
    // comprehensive review requests all four sections
    assert_eq!(llm_hits.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn push_events_are_acknowledged_without_review() {
    let (provider_base, provider) = spawn_provider_stub().await;
    let (llm_base, llm_hits) = spawn_llm_stub().await;
    let store = seeded_store(&llm_base, &provider_base, Some(WEBHOOK_SECRET)).await;
    let app_base = spawn_app(store).await;

    let resp = reqwest::Client::new()
        .post(format!("{app_base}/api/webhook/github"))
        .header("X-GitHub-Event", "push")
        .body("{}")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let ack: Value = resp.json().await.unwrap();
    assert_eq!(ack["data"]["message"], json!("push event received"));

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(provider.meta_hits.load(Ordering::SeqCst), 0);
    assert_eq!(llm_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn wrong_signature_is_rejected_with_401() {
    let (provider_base, provider) = spawn_provider_stub().await;
    let (llm_base, _) = spawn_llm_stub().await;
    let store = seeded_store(&llm_base, &provider_base, Some(WEBHOOK_SECRET)).await;
    let app_base = spawn_app(store).await;

    let body = pr_payload("opened");
    let resp = reqwest::Client::new()
        .post(format!("{app_base}/api/webhook/github"))
        .header("X-GitHub-Event", "pull_request")
        .header("X-Hub-Signature-256", "sha256=0000000000000000")
        .body(body)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(provider.meta_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn missing_event_header_is_a_validation_error() {
    let (provider_base, _) = spawn_provider_stub().await;
    let (llm_base, _) = spawn_llm_stub().await;
    let store = seeded_store(&llm_base, &provider_base, Some(WEBHOOK_SECRET)).await;
    let app_base = spawn_app(store).await;

    let resp = reqwest::Client::new()
        .post(format!("{app_base}/api/webhook/github"))
        .body(pr_payload("opened"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn unknown_repository_is_acknowledged_without_review() {
    let (_provider_base, provider) = spawn_provider_stub().await;
    let (_llm_base, _) = spawn_llm_stub().await;
    // store knows no repository at all
    let store = Arc::new(ConfigStore::new());
    let app_base = spawn_app(store).await;

    let body = pr_payload("opened");
    let resp = reqwest::Client::new()
        .post(format!("{app_base}/api/webhook/github"))
        .header("X-GitHub-Event", "pull_request")
        .header("X-Hub-Signature-256", signature_for(&body))
        .body(body)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let ack: Value = resp.json().await.unwrap();
    assert_eq!(ack["data"]["message"], json!("auto review not enabled"));

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(provider.meta_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn missing_webhook_secret_skips_the_signature_check() {
    let (provider_base, provider) = spawn_provider_stub().await;
    let (llm_base, _) = spawn_llm_stub().await;
    let store = seeded_store(&llm_base, &provider_base, None).await;
    let app_base = spawn_app(store).await;

    // no signature header at all
    let resp = reqwest::Client::new()
        .post(format!("{app_base}/api/webhook/github"))
        .header("X-GitHub-Event", "pull_request")
        .body(pr_payload("opened"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let ack: Value = resp.json().await.unwrap();
    assert_eq!(ack["data"]["message"], json!("review started"));

    assert!(wait_for_comment(&provider).await.is_some());
}
