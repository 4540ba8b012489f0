//! Auto-discard advisor.
//!
//! Once one of an author's postings has been resolved (applied, discarded,
//! interviewed or rejected), that author's remaining `new` postings are
//! almost always stale duplicates. The advisor finds them and can discard
//! them in bulk.

use crate::error::Result;
use crate::models::Status;
use crate::services::StatusLifecycle;
use crate::storage::PostingStore;

/// Outcome of a bulk discard.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DiscardReport {
    /// Candidates found when the run started
    pub candidates: usize,

    /// Postings moved to `discarded`
    pub discarded: usize,

    /// The posting that could not be discarded and why; the run stopped there
    pub failure: Option<DiscardFailure>,
}

/// A transition that failed during a bulk discard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscardFailure {
    pub id: i64,
    pub reason: String,
}

/// Finds and discards postings made stale by their author's other postings.
pub struct DiscardAdvisor<'a> {
    store: &'a PostingStore,
}

impl<'a> DiscardAdvisor<'a> {
    pub fn new(store: &'a PostingStore) -> Self {
        Self { store }
    }

    /// Ids of `new` postings sharing a non-empty author with a resolved
    /// posting, in id order.
    pub fn list_discard_candidates(&self) -> Result<Vec<i64>> {
        self.store.discard_candidates()
    }

    /// Number of postings a run would discard.
    pub fn get_count(&self) -> Result<usize> {
        Ok(self.list_discard_candidates()?.len())
    }

    /// Discard every candidate, one at a time.
    ///
    /// Runs under the store's write lock. Stops at the first failed
    /// transition; postings discarded before it stay discarded and are
    /// counted in the report.
    pub fn apply_discards(&self) -> Result<DiscardReport> {
        self.store.exclusive(|store| {
            let ids = store.discard_candidates()?;
            let lifecycle = StatusLifecycle::new(store);
            let mut report = DiscardReport {
                candidates: ids.len(),
                ..DiscardReport::default()
            };

            for id in ids {
                match lifecycle.transition_to(id, Status::Discarded) {
                    Ok(_) => {
                        log::info!("Discarded posting {}", id);
                        report.discarded += 1;
                    }
                    Err(e) => {
                        log::error!("Failed to discard posting {}: {}", id, e);
                        report.failure = Some(DiscardFailure {
                            id,
                            reason: e.to_string(),
                        });
                        break;
                    }
                }
            }

            Ok(report)
        })
    }
}
