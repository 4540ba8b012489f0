//! Posting data structures.

use chrono::{DateTime, Utc};
use scraper::Html;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::models::Status;

/// A candidate posting extracted from a thread, before it is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Inner HTML of the comment text
    pub body: String,

    /// Author handle, if the author link is present
    pub author: Option<String>,

    /// Comment id taken from the permalink
    pub external_id: Option<String>,
}

impl Candidate {
    /// SHA-256 of the body, hex encoded.
    pub fn body_hash(&self) -> String {
        hash_body(&self.body)
    }
}

/// A stored posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    /// Local sequential id
    pub id: i64,

    /// Comment id on the source thread (absent on legacy rows)
    pub external_id: Option<String>,

    /// Author handle on the source thread
    pub author: Option<String>,

    /// Raw comment HTML
    pub body: String,

    /// SHA-256 of `body`
    pub body_hash: String,

    pub inserted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// First time the posting entered `applied`
    pub applied_at: Option<DateTime<Utc>>,

    pub status: Status,
}

impl Posting {
    /// Format posting for display using a template.
    ///
    /// Supported placeholders:
    /// - `{id}`, `{external_id}`, `{author}`, `{status}`, `{label}`
    /// - `{inserted_at}`, `{updated_at}`, `{applied_at}`
    pub fn format(&self, template: &str) -> String {
        template
            .replace("{id}", &self.id.to_string())
            .replace("{external_id}", self.external_id.as_deref().unwrap_or("-"))
            .replace("{author}", self.author.as_deref().unwrap_or("-"))
            .replace("{status}", self.status.as_str())
            .replace("{label}", self.status.label())
            .replace("{inserted_at}", &format_timestamp(&self.inserted_at))
            .replace("{updated_at}", &format_timestamp(&self.updated_at))
            .replace(
                "{applied_at}",
                &self
                    .applied_at
                    .as_ref()
                    .map_or_else(|| "-".to_string(), format_timestamp),
            )
    }

    /// First line of the body with markup stripped, cut to `max_chars`.
    pub fn headline(&self, max_chars: usize) -> String {
        let first_block = self
            .body
            .split("<p>")
            .find(|part| !part.trim().is_empty())
            .unwrap_or("");
        let fragment = Html::parse_fragment(first_block);
        let raw: String = fragment.root_element().text().collect();
        let text = raw.split_whitespace().collect::<Vec<_>>().join(" ");

        if text.chars().count() > max_chars {
            let cut: String = text.chars().take(max_chars).collect();
            format!("{}…", cut.trim_end())
        } else {
            text
        }
    }
}

/// SHA-256 of a posting body, hex encoded.
pub fn hash_body(body: &str) -> String {
    hex::encode(Sha256::digest(body.as_bytes()))
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}
