//! reqwest client for the backend's JSON-over-HTTP API.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

use super::{
    BackendError, SearchRequest, SearchResponse, StoreRequest, StoreResult, VectorBackend,
};
use crate::config::SemantixConfig;
use crate::lore::LoreEntry;

pub const STORE_PATH: &str = "/vectorize-and-store";
pub const SEARCH_PATH: &str = "/search";

/// Backend reached over HTTP at the selected provider's base URL.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(
        base_url: &str,
        headers: &BTreeMap<String, String>,
        timeout: Duration,
    ) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .default_headers(header_map(headers)?)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build a client for `module.default_provider`.
    pub fn from_config(config: &SemantixConfig) -> Result<Self, BackendError> {
        let provider = config.selected_provider()?;
        let base_url = config.resolved_base_url()?;
        tracing::debug!(
            provider = %config.module.default_provider,
            base_url = %base_url,
            "backend client configured"
        );
        Self::new(
            &base_url,
            &provider.headers,
            Duration::from_secs(config.backend.timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, BackendError>
    where
        B: Serialize + Sync + ?Sized,
        R: DeserializeOwned + Send,
    {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(
                url = %url,
                status = status.as_u16(),
                body = %body,
                "backend error response"
            );
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}

fn header_map(headers: &BTreeMap<String, String>) -> Result<HeaderMap, BackendError> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let invalid = |reason: String| BackendError::InvalidHeader {
            name: name.clone(),
            reason,
        };
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid(e.to_string()))?;
        let header_value = HeaderValue::from_str(value).map_err(|e| invalid(e.to_string()))?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

#[async_trait]
impl VectorBackend for HttpBackend {
    async fn store(&self, entries: &[LoreEntry]) -> Result<StoreResult, BackendError> {
        let request = StoreRequest {
            entries: entries.to_vec(),
        };
        self.post_json(STORE_PATH, &request).await
    }

    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, BackendError> {
        self.post_json(SEARCH_PATH, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let backend =
            HttpBackend::new("http://localhost:8008/", &BTreeMap::new(), Duration::from_secs(1))
                .unwrap();
        assert_eq!(backend.base_url(), "http://localhost:8008");
    }

    #[test]
    fn invalid_header_is_reported() {
        let mut headers = BTreeMap::new();
        headers.insert("bad header".to_string(), "x".to_string());
        let err = HttpBackend::new("http://localhost", &headers, Duration::from_secs(1))
            .unwrap_err();
        assert!(matches!(err, BackendError::InvalidHeader { ref name, .. } if name == "bad header"));
    }

    #[test]
    fn from_config_rejects_unknown_provider() {
        let mut config = SemantixConfig::default();
        config.module.default_provider = "nope".into();
        assert!(matches!(
            HttpBackend::from_config(&config),
            Err(BackendError::Config(_))
        ));
    }
}
