//! Persistence for postings.
//!
//! Postings live in a single SQLite table. Rows are decoded into typed
//! [`Posting`](crate::models::Posting) records at this boundary, so the
//! rest of the crate never deals with raw columns.
//!
//! ## Layout
//!
//! ```text
//! data/
//! ├── config.toml                      # Tracker configuration
//! ├── hn_jobs.db                       # Posting store
//! └── hn_jobs-20240916-114043.db       # Backup taken before an ingest
//! ```

pub mod backup;
pub mod sqlite;

use crate::models::Status;

// Re-export for convenience
pub use backup::{BackupOutcome, backup_database};
pub use sqlite::PostingStore;

/// Predicates for listing postings. All supplied predicates must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// Exact status match
    pub status: Option<Status>,

    /// Substring of the body, ASCII case-insensitive
    pub search: Option<String>,

    /// Exact author match
    pub author: Option<String>,
}

impl ListFilter {
    /// Filter matching every posting.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }
}
