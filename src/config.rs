use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Accepted chunk sizes, in characters.
pub const CHUNK_SIZE_RANGE: RangeInclusive<u32> = 100..=2000;
/// Accepted chunk overlaps, in characters.
pub const OVERLAP_SIZE_RANGE: RangeInclusive<u32> = 0..=500;

/// Used when the selected provider has no base URL.
pub const FALLBACK_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("chunk size {0} out of range (100-2000)")]
    ChunkSizeOutOfRange(u32),
    #[error("overlap size {0} out of range (0-500)")]
    OverlapSizeOutOfRange(u32),
    #[error("unknown embedding provider: {0}")]
    UnknownProvider(String),
    #[error("backend timeout must be at least 1 second")]
    ZeroTimeout,
    #[error("interceptor search limit must be at least 1")]
    ZeroLimit,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SemantixConfig {
    pub server: ServerConfig,
    pub module: ModuleSettings,
    pub providers: BTreeMap<String, ProviderConfig>,
    pub backend: BackendConfig,
    pub interceptor: InterceptorConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub log_level: String,
}

/// User-facing settings.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ModuleSettings {
    pub show_notifications: bool,
    pub default_provider: String,
    pub default_chunk_size: u32,
    pub default_overlap_size: u32,
}

/// An embedding provider the backend can be pointed at.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub embedding_endpoint: String,
    pub model_name: String,
    pub headers: BTreeMap<String, String>,
    pub default_params: BTreeMap<String, toml::Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct BackendConfig {
    pub timeout_secs: u64,
}

/// How the host hands generation input to the interceptor.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HostConvention {
    /// A single prompt string plus the chat history.
    Prompt,
    /// The structured chat array, with context size and abort signal.
    Chat,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct InterceptorConfig {
    pub convention: HostConvention,
    pub collection_prefix: String,
    pub limit: usize,
    pub rerank: bool,
}

impl Default for SemantixConfig {
    fn default() -> Self {
        let mut providers = BTreeMap::new();
        providers.insert("bananabread".to_string(), ProviderConfig::default());
        Self {
            server: ServerConfig::default(),
            module: ModuleSettings::default(),
            providers,
            backend: BackendConfig::default(),
            interceptor: InterceptorConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
        }
    }
}

impl Default for ModuleSettings {
    fn default() -> Self {
        Self {
            show_notifications: true,
            default_provider: "bananabread".into(),
            default_chunk_size: 450,
            default_overlap_size: 50,
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        let mut default_params = BTreeMap::new();
        default_params.insert("normalize".to_string(), toml::Value::Boolean(true));
        default_params.insert("truncate".to_string(), toml::Value::Boolean(true));
        Self {
            base_url: "http://localhost:8008".into(),
            embedding_endpoint: "/embedding".into(),
            model_name: "mixedbread-ai/mxbai-embed-large-v1".into(),
            headers: BTreeMap::new(),
            default_params,
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

impl Default for InterceptorConfig {
    fn default() -> Self {
        Self {
            convention: HostConvention::Prompt,
            collection_prefix: "worldbook_".into(),
            limit: 5,
            rerank: true,
        }
    }
}

impl ModuleSettings {
    /// Set the chunk size; out-of-range values leave the current one in place.
    pub fn set_chunk_size(&mut self, value: u32) -> Result<(), ConfigError> {
        if !CHUNK_SIZE_RANGE.contains(&value) {
            return Err(ConfigError::ChunkSizeOutOfRange(value));
        }
        self.default_chunk_size = value;
        Ok(())
    }

    /// Set the overlap size; out-of-range values leave the current one in place.
    pub fn set_overlap_size(&mut self, value: u32) -> Result<(), ConfigError> {
        if !OVERLAP_SIZE_RANGE.contains(&value) {
            return Err(ConfigError::OverlapSizeOutOfRange(value));
        }
        self.default_overlap_size = value;
        Ok(())
    }
}

/// Returns `~/.semantix/`
pub fn default_semantix_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".semantix"))
}

/// Returns the default config file path: `~/.semantix/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    default_semantix_dir().map(|dir| dir.join("config.toml"))
}

impl SemantixConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        match default_config_path() {
            Some(path) => Self::load_from(path),
            None => {
                info!("no home directory, using default config");
                let mut config = Self::default();
                config.apply_env_overrides();
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            SemantixConfig::default()
        };

        config.apply_env_overrides();
        config
            .validate()
            .with_context(|| format!("invalid config at {}", path.display()))?;
        Ok(config)
    }

    /// Apply environment variable overrides (SEMANTIX_PROVIDER, SEMANTIX_BASE_URL, SEMANTIX_LOG_LEVEL).
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("SEMANTIX_PROVIDER") {
            self.module.default_provider = val;
        }
        if let Some(val) = lookup("SEMANTIX_BASE_URL") {
            self.providers
                .entry(self.module.default_provider.clone())
                .or_default()
                .base_url = val;
        }
        if let Some(val) = lookup("SEMANTIX_LOG_LEVEL") {
            self.server.log_level = val;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !CHUNK_SIZE_RANGE.contains(&self.module.default_chunk_size) {
            return Err(ConfigError::ChunkSizeOutOfRange(self.module.default_chunk_size));
        }
        if !OVERLAP_SIZE_RANGE.contains(&self.module.default_overlap_size) {
            return Err(ConfigError::OverlapSizeOutOfRange(
                self.module.default_overlap_size,
            ));
        }
        if self.backend.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.interceptor.limit == 0 {
            return Err(ConfigError::ZeroLimit);
        }
        self.selected_provider()?;
        Ok(())
    }

    /// The provider named by `module.default_provider`.
    pub fn selected_provider(&self) -> Result<&ProviderConfig, ConfigError> {
        self.providers
            .get(&self.module.default_provider)
            .ok_or_else(|| ConfigError::UnknownProvider(self.module.default_provider.clone()))
    }

    /// Base URL of the selected provider, without a trailing slash.
    pub fn resolved_base_url(&self) -> Result<String, ConfigError> {
        let provider = self.selected_provider()?;
        let base = provider.base_url.trim();
        let base = if base.is_empty() { FALLBACK_BASE_URL } else { base };
        Ok(base.trim_end_matches('/').to_string())
    }

    /// Backend collection for a lore book, e.g. `worldbook_Eldoria`.
    pub fn collection_name(&self, lorebook: &str) -> String {
        format!("{}{}", self.interceptor.collection_prefix, lorebook)
    }
}
