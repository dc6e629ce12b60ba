#![allow(dead_code)]

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use semantix::config::SemantixConfig;
use semantix::lore::{LoreBook, LoreEntry};
use semantix::notify::{Level, Notifier};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

/// Requests seen by a [`MockBackend`], plus how it should answer.
#[derive(Clone, Default)]
pub struct MockState {
    pub store_requests: Arc<Mutex<Vec<Value>>>,
    pub search_requests: Arc<Mutex<Vec<Value>>>,
    pub authorization: Arc<Mutex<Vec<Option<String>>>>,
    pub search_contents: Arc<Vec<String>>,
    pub fail_with: Option<u16>,
}

pub struct MockBackend {
    pub url: String,
    pub state: MockState,
}

impl MockBackend {
    pub fn store_requests(&self) -> Vec<Value> {
        self.state.store_requests.lock().unwrap().clone()
    }

    pub fn search_requests(&self) -> Vec<Value> {
        self.state.search_requests.lock().unwrap().clone()
    }

    pub fn authorization(&self) -> Vec<Option<String>> {
        self.state.authorization.lock().unwrap().clone()
    }
}

/// Start a backend on an ephemeral port. Store answers with two chunks per
/// entry; search answers with `search_contents` as hits. With `fail_with`
/// set, both endpoints answer that status after recording the request.
pub async fn spawn_backend(search_contents: &[&str], fail_with: Option<u16>) -> MockBackend {
    let state = MockState {
        search_contents: Arc::new(search_contents.iter().map(|s| s.to_string()).collect()),
        fail_with,
        ..Default::default()
    };

    let app = Router::new()
        .route("/vectorize-and-store", post(store_handler))
        .route("/search", post(search_handler))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockBackend {
        url: format!("http://{addr}"),
        state,
    }
}

/// A URL nothing is listening on.
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

async fn store_handler(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.authorization.lock().unwrap().push(auth);
    state.store_requests.lock().unwrap().push(body.clone());
    if let Some(code) = state.fail_with {
        return Err(StatusCode::from_u16(code).unwrap());
    }
    let n = body["entries"].as_array().map_or(0, |a| a.len());
    Ok(Json(json!({"chunksProcessed": n * 2, "pointsStored": n * 2})))
}

async fn search_handler(
    State(state): State<MockState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    state.search_requests.lock().unwrap().push(body);
    if let Some(code) = state.fail_with {
        return Err(StatusCode::from_u16(code).unwrap());
    }
    let results: Vec<Value> = state
        .search_contents
        .iter()
        .enumerate()
        .map(|(i, c)| json!({"score": 1.0 - i as f64 * 0.1, "payload": {"content": c}}))
        .collect();
    Ok(Json(json!({ "results": results })))
}

/// Default config pointed at `url`.
pub fn config_for(url: &str) -> SemantixConfig {
    let mut config = SemantixConfig::default();
    config
        .providers
        .get_mut(&config.module.default_provider)
        .unwrap()
        .base_url = url.to_string();
    config.backend.timeout_secs = 5;
    config
}

/// Lore book with one entry per uid in `uids`.
pub fn sample_book(uids: impl IntoIterator<Item = u64>) -> LoreBook {
    let entries = uids
        .into_iter()
        .map(|uid| LoreEntry::new(uid, &format!("Entry {uid}"), &format!("Lore text {uid}.")))
        .collect();
    LoreBook::new("Eldoria", entries)
}

/// Keeps notices in memory, in arrival order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<(Level, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<(Level, String)> {
        self.notices.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, level: Level, message: &str) {
        self.notices.lock().unwrap().push((level, message.to_string()));
    }
}
