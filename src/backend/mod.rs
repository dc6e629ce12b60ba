//! The external vectorization backend.
//!
//! The backend chunks and embeds lore entries (`store`) and runs similarity
//! search over a collection (`search`). Its internals live elsewhere; this
//! module defines the [`VectorBackend`] contract, its wire types, and the
//! HTTP client in [`http`].

pub mod http;

pub use http::HttpBackend;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ConfigError;
use crate::lore::LoreEntry;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend request failed with status {status}")]
    Status { status: u16, body: String },
    #[error("invalid provider header {name:?}: {reason}")]
    InvalidHeader { name: String, reason: String },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Body of `POST /vectorize-and-store`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreRequest {
    pub entries: Vec<LoreEntry>,
}

/// What the backend reports after storing a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreResult {
    pub chunks_processed: u64,
    pub points_stored: u64,
}

/// Body of `POST /search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub query_text: String,
    pub collection_name: String,
    pub limit: usize,
    pub rerank: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchHit>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub score: Option<f64>,
    pub payload: SearchPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchPayload {
    pub content: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Store and search operations offered by the backend.
#[async_trait]
pub trait VectorBackend: Send + Sync {
    /// Chunk, embed, and store `entries`.
    async fn store(&self, entries: &[LoreEntry]) -> Result<StoreResult, BackendError>;

    /// Top matches for `request.query_text` in `request.collection_name`.
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, BackendError>;
}
