//! Layr configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::provider::{PlanOptions, PlanSize, ProjectKind};

/// Main Layr configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Active provider configuration
    pub provider: ProviderConfig,

    /// Plan shaping defaults
    pub plan: PlanConfig,

    /// Plan cache tuning
    pub cache: CacheConfig,

    /// Version history retention
    pub history: HistoryConfig,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .layr.yml
        let local_config = PathBuf::from(".layr.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/layr/layr.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("layr").join("layr.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        tracing::debug!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Active provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Provider type name (groq, kimi, deepseek, grok, ollama)
    pub provider: String,

    /// Model identifier override; adapters fall back to their defaults
    pub model: Option<String>,

    /// Environment variable containing the API key
    ///
    /// The key itself never lives in config files.
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL override
    #[serde(rename = "base-url")]
    pub base_url: Option<String>,

    /// Intermediary endpoint for the proxy-backed provider
    #[serde(rename = "proxy-url")]
    pub proxy_url: Option<String>,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider: "groq".to_string(),
            model: None,
            api_key_env: "LAYR_API_KEY".to_string(),
            base_url: None,
            proxy_url: None,
            max_tokens: 8192,
            timeout_ms: 120_000,
        }
    }
}

impl ProviderConfig {
    /// Read the API key from the configured environment variable
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env).ok().filter(|key| !key.trim().is_empty())
    }
}

/// Plan shaping defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    /// Verbosity tier
    pub size: PlanSize,

    /// Project kind shaping the system instructions
    pub project: ProjectKind,
}

impl PlanConfig {
    pub fn options(&self) -> PlanOptions {
        PlanOptions {
            size: self.size,
            project: self.project,
        }
    }
}

/// Plan cache tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Entry time-to-live in seconds
    #[serde(rename = "ttl-secs")]
    pub ttl_secs: u64,

    /// Maximum number of cached plans
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 60 * 60,
            capacity: 20,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Version history retention
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of versions retained before eviction
    #[serde(rename = "max-versions")]
    pub max_versions: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_versions: versionstore::DEFAULT_MAX_VERSIONS,
        }
    }
}
