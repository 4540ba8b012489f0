//! Read side used by presentation layers.
//!
//! `list`, `get` and `update_status` are the whole contract a UI needs.
//! Empty results are empty vectors; turning them into a "No results"
//! message is the caller's job.

use crate::error::{AppError, Result};
use crate::models::{Posting, Status};
use crate::services::StatusLifecycle;
use crate::storage::{ListFilter, PostingStore};

/// Query facade over the posting store.
pub struct PostingQuery<'a> {
    store: &'a PostingStore,
}

impl<'a> PostingQuery<'a> {
    pub fn new(store: &'a PostingStore) -> Self {
        Self { store }
    }

    /// Posting by local id, `NotFound` when absent.
    pub fn get(&self, id: i64) -> Result<Posting> {
        self.store.get(id)?.ok_or(AppError::NotFound { id })
    }

    /// Postings matching every predicate of `filter`, in insertion order.
    pub fn list(&self, filter: &ListFilter) -> Result<Vec<Posting>> {
        self.store.list(filter)
    }

    /// String-typed variant of [`list`](Self::list) for request handlers.
    ///
    /// Blank values mean "no predicate". An unknown status is rejected
    /// here rather than silently matching nothing.
    pub fn list_by(&self, status: Option<&str>, search: Option<&str>) -> Result<Vec<Posting>> {
        let mut filter = ListFilter::all();
        if let Some(status) = status.filter(|s| !s.is_empty()) {
            filter = filter.with_status(status.parse::<Status>()?);
        }
        if let Some(search) = search.filter(|s| !s.is_empty()) {
            filter = filter.with_search(search);
        }
        self.list(&filter)
    }

    /// Change a posting's status, reporting only success or failure.
    pub fn update_status(&self, id: i64, status: &str) -> bool {
        match StatusLifecycle::new(self.store).transition(id, status) {
            Ok(_) => true,
            Err(e) => {
                log::warn!("Status update of posting {} to '{}' failed: {}", id, status, e);
                false
            }
        }
    }

    /// Posting count for every status.
    pub fn status_counts(&self) -> Result<Vec<(Status, usize)>> {
        self.store.status_counts()
    }
}
