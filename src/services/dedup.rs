//! Identity resolution for extracted candidates.
//!
//! The source comment id is the natural key. A candidate whose id is
//! already stored refreshes that posting's body; anything else becomes a
//! new posting. Candidates without an id are always inserted.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::Candidate;
use crate::storage::PostingStore;

/// What happened to one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Stored as a new posting
    Inserted(i64),
    /// Known posting whose body changed
    Updated(i64),
    /// Known posting, body identical, nothing written
    Unchanged(i64),
}

impl Resolution {
    /// Local id of the affected posting.
    pub fn id(self) -> i64 {
        match self {
            Self::Inserted(id) | Self::Updated(id) | Self::Unchanged(id) => id,
        }
    }
}

/// Decides insert vs update for candidates against the store.
pub struct IdentityResolver<'a> {
    store: &'a PostingStore,
}

impl<'a> IdentityResolver<'a> {
    pub fn new(store: &'a PostingStore) -> Self {
        Self { store }
    }

    /// Upsert one candidate.
    pub fn resolve(&self, candidate: &Candidate) -> Result<Resolution> {
        self.resolve_at(candidate, Utc::now())
    }

    /// Upsert one candidate using `now` for the timestamps it writes.
    pub fn resolve_at(&self, candidate: &Candidate, now: DateTime<Utc>) -> Result<Resolution> {
        let existing = match &candidate.external_id {
            Some(external_id) => self.store.find_by_external_id(external_id)?,
            None => None,
        };

        let Some(existing) = existing else {
            let id = self.store.insert(candidate, now)?;
            log::info!(
                "Inserted posting {} (external id {}, author {})",
                id,
                candidate.external_id.as_deref().unwrap_or("-"),
                candidate.author.as_deref().unwrap_or("-")
            );
            return Ok(Resolution::Inserted(id));
        };

        let body_hash = candidate.body_hash();
        if existing.body_hash == body_hash {
            log::debug!("Posting {} unchanged", existing.id);
            return Ok(Resolution::Unchanged(existing.id));
        }

        self.store
            .update_body(existing.id, &candidate.body, &body_hash, now)?;
        log::info!(
            "Updated posting {} (external id {})",
            existing.id,
            candidate.external_id.as_deref().unwrap_or("-")
        );
        Ok(Resolution::Updated(existing.id))
    }
}
