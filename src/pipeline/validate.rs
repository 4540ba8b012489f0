// src/pipeline/validate.rs

use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::Config;
use crate::services::CommentExtractor;
use crate::utils::log;

/// Load the configuration strictly, check its values and compile its
/// selectors.
pub fn run_validate(config_path: &Path) -> Result<Config> {
    log::header("Validating configuration");

    if !config_path.exists() {
        return Err(AppError::config(format!(
            "config file not found: {}",
            config_path.display()
        )));
    }
    let config = Config::load(config_path)?;
    config.validate()?;
    CommentExtractor::new(&config.extractor.selectors)?;

    log::sub_item(&format!("Config file: {}", config_path.display()));
    log::sub_item(&format!("User agent: {}", config.fetcher.user_agent));
    log::sub_item(&format!(
        "Timeout: {}s, retries: {}",
        config.fetcher.timeout_secs, config.fetcher.max_retries
    ));
    log::sub_item(&format!(
        "Allowed hosts: {}",
        config.source.allowed_hosts.join(", ")
    ));
    log::sub_item(&format!(
        "Database: {}",
        config.storage.database_path.display()
    ));
    log::sub_item(&format!(
        "Candidate filter: {}",
        config
            .extractor
            .require_substring
            .as_deref()
            .map_or_else(|| "accept all".to_string(), |s| format!("require {s:?}"))
    ));

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config_passes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[fetcher]
timeout_secs = 10

[extractor]
require_substring = "|"
"#,
        )
        .unwrap();

        let config = run_validate(&path).unwrap();
        assert_eq!(config.fetcher.timeout_secs, 10);
        assert_eq!(config.extractor.require_substring.as_deref(), Some("|"));
    }

    #[test]
    fn test_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_validate(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_bad_selector_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[extractor.selectors]\ncomment_selector = \"tr[[\"\n").unwrap();

        let err = run_validate(&path).unwrap_err();
        assert!(matches!(err, AppError::Selector { .. }));
    }
}
