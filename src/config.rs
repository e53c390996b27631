use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::storage::write_atomic;

pub const DEFAULT_AUTH_URL: &str = "http://localhost:8000";
pub const DEFAULT_CATALOG_URL: &str = "http://localhost:8001";
pub const DEFAULT_DATA_DIR: &str = ".redfreelance";

pub const ENV_AUTH_URL: &str = "REDFREELANCE_AUTH_URL";
pub const ENV_CATALOG_URL: &str = "REDFREELANCE_CATALOG_URL";
pub const ENV_DATA_DIR: &str = "REDFREELANCE_DATA_DIR";

const CONFIG_FILE: &str = "config.json";
const LOG_FILE: &str = "redfreelance.log";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("base url must not be empty")]
    EmptyUrl,
    #[error("base url must use http:// or https:// and include a host: {0}")]
    InvalidUrl(String),
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub version: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_url: Option<String>,
}

/// Values given on the command line; they win over everything else.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub data_dir: Option<PathBuf>,
    pub auth_url: Option<String>,
    pub catalog_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub auth_url: String,
    pub catalog_url: String,
    pub data_dir: PathBuf,
}

impl ClientConfig {
    pub fn resolve(overrides: &ConfigOverrides) -> Result<Self> {
        Self::resolve_with(overrides, |key| std::env::var(key).ok())
    }

    /// Flags, then environment, then `config.json` in the data dir, then defaults.
    pub fn resolve_with(
        overrides: &ConfigOverrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let env_non_empty = |key: &str| {
            env(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let data_dir = overrides
            .data_dir
            .clone()
            .or_else(|| env_non_empty(ENV_DATA_DIR).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let file = read_config_file(&data_dir)?.unwrap_or_default();

        let auth_url = overrides
            .auth_url
            .clone()
            .or_else(|| env_non_empty(ENV_AUTH_URL))
            .or(file.auth_url)
            .unwrap_or_else(|| DEFAULT_AUTH_URL.to_string());
        let catalog_url = overrides
            .catalog_url
            .clone()
            .or_else(|| env_non_empty(ENV_CATALOG_URL))
            .or(file.catalog_url)
            .unwrap_or_else(|| DEFAULT_CATALOG_URL.to_string());

        Ok(Self {
            auth_url: normalize_base_url(&auth_url).context("auth url")?,
            catalog_url: normalize_base_url(&catalog_url).context("catalog url")?,
            data_dir,
        })
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE)
    }
}

pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ConfigError::EmptyUrl);
    }
    let Some((scheme, rest)) = trimmed.split_once("://") else {
        return Err(ConfigError::InvalidUrl(trimmed.to_string()));
    };
    if !(scheme == "http" || scheme == "https") || rest.is_empty() || rest.starts_with('/') {
        return Err(ConfigError::InvalidUrl(trimmed.to_string()));
    }
    Ok(trimmed.to_string())
}

pub fn read_config_file(data_dir: &Path) -> Result<Option<ConfigFile>> {
    let path = data_dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }
    let bytes = fs::read(&path).with_context(|| format!("read {}", path.display()))?;
    let cfg: ConfigFile =
        serde_json::from_slice(&bytes).with_context(|| format!("parse {}", CONFIG_FILE))?;
    if cfg.version != 1 {
        anyhow::bail!("unsupported config version {}", cfg.version);
    }
    Ok(Some(cfg))
}

pub fn write_config_file(data_dir: &Path, cfg: &ConfigFile) -> Result<()> {
    if let Some(url) = cfg.auth_url.as_deref() {
        normalize_base_url(url).context("auth url")?;
    }
    if let Some(url) = cfg.catalog_url.as_deref() {
        normalize_base_url(url).context("catalog url")?;
    }
    let bytes = serde_json::to_vec_pretty(cfg).context("serialize config")?;
    write_atomic(&data_dir.join(CONFIG_FILE), &bytes)
        .with_context(|| format!("write {}", CONFIG_FILE))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
