//! Service layer for the posting tracker.
//!
//! This module contains the business logic for:
//! - Comment extraction (`CommentExtractor`)
//! - Candidate acceptance rules (`CandidateFilter`)
//! - Insert-vs-update decisions (`IdentityResolver`)
//! - Status transitions (`StatusLifecycle`)
//! - Related-posting discards (`DiscardAdvisor`)
//! - Listing and lookup (`PostingQuery`)

mod comments;
mod dedup;
mod discard;
pub mod filter;
mod lifecycle;
mod query;

pub use comments::{Comment, CommentExtractor, ThreadDocument};
pub use dedup::{IdentityResolver, Resolution};
pub use discard::{DiscardAdvisor, DiscardFailure, DiscardReport};
pub use filter::{AcceptAll, CandidateFilter, RequireSubstring};
pub use lifecycle::StatusLifecycle;
pub use query::PostingQuery;
