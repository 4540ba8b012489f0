//! Triage status vocabulary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Triage state of a posting.
///
/// The vocabulary is closed: anything outside it is rejected when parsed,
/// so downstream code never sees an unknown status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    /// Freshly ingested, not triaged yet
    New,
    Applied,
    Discarded,
    Interviewed,
    /// Rejected before any interview
    RejectedPre,
    /// Rejected after interviewing
    RejectedPost,
}

impl Status {
    /// Every status, in display order.
    pub const ALL: [Status; 6] = [
        Status::New,
        Status::Applied,
        Status::Discarded,
        Status::Interviewed,
        Status::RejectedPre,
        Status::RejectedPost,
    ];

    /// Canonical storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Applied => "applied",
            Self::Discarded => "discarded",
            Self::Interviewed => "interviewed",
            Self::RejectedPre => "rejected-pre",
            Self::RejectedPost => "rejected-post",
        }
    }

    /// Human-readable label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Applied => "Applied",
            Self::Discarded => "Discarded",
            Self::Interviewed => "In interview",
            Self::RejectedPre => "Rejected (pre-interview)",
            Self::RejectedPost => "Rejected (post-interview)",
        }
    }

    /// Whether a decision has been made about the posting.
    pub const fn is_resolved(self) -> bool {
        !matches!(self, Self::New)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| AppError::InvalidStatus(value.to_string()))
    }
}
