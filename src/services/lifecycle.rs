//! Status lifecycle.
//!
//! Any status may move to any other; triage is manual and corrections must
//! be possible. Every change bumps `updated_at`. Entering `applied` stamps
//! `applied_at` once; later re-entries keep the first timestamp.

use chrono::{DateTime, Utc};

use crate::error::{AppError, Result};
use crate::models::{Posting, Status};
use crate::storage::PostingStore;

/// Applies status transitions to stored postings.
pub struct StatusLifecycle<'a> {
    store: &'a PostingStore,
}

impl<'a> StatusLifecycle<'a> {
    pub fn new(store: &'a PostingStore) -> Self {
        Self { store }
    }

    /// Move a posting to the status named by `target`.
    ///
    /// Fails with `InvalidStatus` when `target` is outside the vocabulary
    /// and with `NotFound` when no posting has `id`. Neither failure
    /// changes anything.
    pub fn transition(&self, id: i64, target: &str) -> Result<Posting> {
        let status: Status = target.parse()?;
        self.transition_to(id, status)
    }

    /// Move a posting to `status`.
    pub fn transition_to(&self, id: i64, status: Status) -> Result<Posting> {
        self.transition_at(id, status, Utc::now())
    }

    /// Move a posting to `status`, using `now` for the timestamps.
    pub fn transition_at(&self, id: i64, status: Status, now: DateTime<Utc>) -> Result<Posting> {
        if !self.store.set_status(id, status, now)? {
            return Err(AppError::NotFound { id });
        }
        log::debug!("Posting {} is now {}", id, status);
        self.store.get(id)?.ok_or(AppError::NotFound { id })
    }
}
