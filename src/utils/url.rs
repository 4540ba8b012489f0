// src/utils/url.rs

//! URL helpers for thread sources.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::error::{AppError, Result};

const SOURCE_BASE: &str = "https://news.ycombinator.com";

static TRAILING_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"=(\d+)(?:#.*)?$").expect("valid trailing id pattern"));

/// Check that `raw` is an http(s) URL on one of `allowed_hosts`.
pub fn validate_source_url(raw: &str, allowed_hosts: &[String]) -> Result<Url> {
    let url = Url::parse(raw)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(AppError::validation(format!(
            "unsupported URL scheme '{}'",
            url.scheme()
        )));
    }

    let host = url.host_str().unwrap_or_default().to_lowercase();
    if allowed_hosts.iter().any(|allowed| allowed.eq_ignore_ascii_case(&host)) {
        Ok(url)
    } else {
        Err(AppError::validation(format!(
            "{raw} is not a supported thread URL (expected host: {})",
            allowed_hosts.join(", ")
        )))
    }
}

/// Numeric id trailing a permalink's query parameter.
///
/// ```
/// use whoishiring::utils::url::extract_item_id;
///
/// assert_eq!(extract_item_id("item?id=41555035"), Some("41555035".to_string()));
/// assert_eq!(extract_item_id("item?id=abc"), None);
/// ```
pub fn extract_item_id(href: &str) -> Option<String> {
    TRAILING_ID
        .captures(href.trim())
        .and_then(|caps| caps.get(1))
        .map(|id| id.as_str().to_string())
}

/// Profile page of an author.
pub fn user_link(author: &str) -> String {
    format!("{SOURCE_BASE}/user?id={author}")
}

/// Permalink of a comment.
pub fn comment_link(external_id: &str) -> String {
    format!("{SOURCE_BASE}/item?id={external_id}")
}
