// src/models/mod.rs

//! Domain models for the posting tracker.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod posting;
mod selectors;
mod status;

// Re-export all public types
pub use config::{Config, ExtractorConfig, FetcherConfig, SourceConfig, StorageConfig};
pub use posting::{Candidate, Posting, hash_body};
pub use selectors::CommentSelectors;
pub use status::Status;
