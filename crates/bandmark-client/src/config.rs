//! Configuration loading for the bandmark CLI and client.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use bandmark_core::statistics::AggregatePolicy;
use bandmark_core::traits::ExamApi;

use crate::http::HttpExamApi;

/// Remote exam service connection settings.
///
/// Note: Custom Debug impl masks the API key to prevent accidental exposure
/// in logs.
#[derive(Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Service base URL.
    pub base_url: String,
    /// API key, if the service requires one. Supports `${VAR}` references.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Top-level bandmark configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BandmarkConfig {
    /// Remote exam service, when one is configured.
    #[serde(default)]
    pub api: Option<ApiConfig>,
    /// Default aggregate policy for scoring.
    #[serde(default)]
    pub default_policy: AggregatePolicy,
    /// Max retries on transient API errors.
    #[serde(default = "default_retries")]
    pub max_retries: u32,
    /// Delay before the first retry in milliseconds.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,
    /// Output directory for attempt reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_retries() -> u32 {
    3
}
fn default_retry_delay() -> u64 {
    1000
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./bandmark-results")
}

impl Default for BandmarkConfig {
    fn default() -> Self {
        Self {
            api: None,
            default_policy: AggregatePolicy::default(),
            max_retries: default_retries(),
            retry_delay_ms: default_retry_delay(),
            output_dir: default_output_dir(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `bandmark.toml` in the current directory
/// 2. `~/.config/bandmark/config.toml`
///
/// Environment variable overrides: `BANDMARK_API_URL`, `BANDMARK_API_KEY`.
pub fn load_config() -> Result<BandmarkConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<BandmarkConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("bandmark.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<BandmarkConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => BandmarkConfig::default(),
    };

    // Apply env var overrides
    if let Ok(url) = std::env::var("BANDMARK_API_URL") {
        match &mut config.api {
            Some(api) => api.base_url = url,
            None => {
                config.api = Some(ApiConfig {
                    base_url: url,
                    api_key: None,
                });
            }
        }
    }
    if let Ok(key) = std::env::var("BANDMARK_API_KEY") {
        if let Some(api) = &mut config.api {
            api.api_key = Some(key);
        }
    }

    // Resolve env var references
    if let Some(api) = &mut config.api {
        api.base_url = resolve_env_vars(&api.base_url);
        api.api_key = api.api_key.as_ref().map(|k| resolve_env_vars(k));
    }

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("bandmark"))
}

/// Create an exam API client from the loaded configuration.
pub fn create_api(config: &BandmarkConfig) -> Result<Arc<dyn ExamApi>> {
    let api = config
        .api
        .as_ref()
        .context("no [api] section configured; set BANDMARK_API_URL or edit bandmark.toml")?;
    Ok(Arc::new(HttpExamApi::new(
        &api.base_url,
        api.api_key.clone(),
    )))
}
