//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::CommentSelectors;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP fetch settings
    #[serde(default)]
    pub fetcher: FetcherConfig,

    /// Accepted thread sources
    #[serde(default)]
    pub source: SourceConfig,

    /// Database location and backups
    #[serde(default)]
    pub storage: StorageConfig,

    /// Comment extraction settings
    #[serde(default)]
    pub extractor: ExtractorConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.fetcher.user_agent.trim().is_empty() {
            return Err(AppError::validation("fetcher.user_agent is empty"));
        }
        if self.fetcher.timeout_secs == 0 {
            return Err(AppError::validation("fetcher.timeout_secs must be > 0"));
        }
        if self.fetcher.max_backoff_ms < self.fetcher.initial_backoff_ms {
            return Err(AppError::validation(
                "fetcher.max_backoff_ms must be >= fetcher.initial_backoff_ms",
            ));
        }
        if self.source.allowed_hosts.is_empty() {
            return Err(AppError::validation("No source hosts defined"));
        }
        if self.storage.database_path.as_os_str().is_empty() {
            return Err(AppError::validation("storage.database_path is empty"));
        }
        if let Some(needle) = &self.extractor.require_substring {
            if needle.is_empty() {
                return Err(AppError::validation(
                    "extractor.require_substring must not be empty when set",
                ));
            }
        }
        Ok(())
    }
}

/// HTTP client and retry settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Retries after the first failed attempt
    #[serde(default = "defaults::max_retries")]
    pub max_retries: u32,

    /// Delay before the first retry, doubled on each further retry
    #[serde(default = "defaults::initial_backoff")]
    pub initial_backoff_ms: u64,

    /// Upper bound for the retry delay
    #[serde(default = "defaults::max_backoff")]
    pub max_backoff_ms: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            max_retries: defaults::max_retries(),
            initial_backoff_ms: defaults::initial_backoff(),
            max_backoff_ms: defaults::max_backoff(),
        }
    }
}

/// Which hosts a thread URL may point at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "defaults::allowed_hosts")]
    pub allowed_hosts: Vec<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            allowed_hosts: defaults::allowed_hosts(),
        }
    }
}

/// Database location and backup policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite database file
    #[serde(default = "defaults::database_path")]
    pub database_path: PathBuf,

    /// Copy the database aside before every ingestion run
    #[serde(default = "defaults::backup_before_ingest")]
    pub backup_before_ingest: bool,

    /// Where backups go (defaults to the database's directory)
    #[serde(default)]
    pub backup_dir: Option<PathBuf>,
}

impl StorageConfig {
    /// Directory receiving database backups.
    pub fn backup_dir(&self) -> PathBuf {
        match &self.backup_dir {
            Some(dir) => dir.clone(),
            None => self
                .database_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: defaults::database_path(),
            backup_before_ingest: defaults::backup_before_ingest(),
            backup_dir: None,
        }
    }
}

/// Comment extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExtractorConfig {
    #[serde(default)]
    pub selectors: CommentSelectors,

    /// Keep only comments whose body contains this text (e.g. "|")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_substring: Option<String>,
}

mod defaults {
    use std::path::PathBuf;

    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; whoishiring/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn max_retries() -> u32 {
        3
    }
    pub fn initial_backoff() -> u64 {
        500
    }
    pub fn max_backoff() -> u64 {
        8_000
    }
    pub fn allowed_hosts() -> Vec<String> {
        vec!["news.ycombinator.com".into()]
    }
    pub fn database_path() -> PathBuf {
        PathBuf::from("data/hn_jobs.db")
    }
    pub fn backup_before_ingest() -> bool {
        true
    }
}
