// src/pipeline/ingest.rs

//! Thread ingestion pipeline.

use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::models::Config;
use crate::services::{CandidateFilter, CommentExtractor, IdentityResolver, Resolution, filter};
use crate::storage::{BackupOutcome, PostingStore, backup_database};
use crate::utils::{http, log, url};

/// Counters for one ingestion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub inserted: usize,
    pub updated: usize,
    pub unchanged: usize,

    /// Top-level comments rejected by the candidate filter
    pub filtered: usize,

    /// Reply comments skipped by the extractor
    pub replies: usize,

    /// Candidates whose store write failed
    pub failed: usize,
}

impl IngestReport {
    /// Postings written by the run.
    pub fn written(&self) -> usize {
        self.inserted + self.updated
    }

    fn record(&mut self, resolution: Resolution) {
        match resolution {
            Resolution::Inserted(_) => self.inserted += 1,
            Resolution::Updated(_) => self.updated += 1,
            Resolution::Unchanged(_) => self.unchanged += 1,
        }
    }

    fn print(&self, source: &str) {
        log::summary(
            &format!("Ingested {}", source),
            &[
                ("Inserted", self.inserted.to_string()),
                ("Updated", self.updated.to_string()),
                ("Unchanged", self.unchanged.to_string()),
                ("Filtered", self.filtered.to_string()),
                ("Replies skipped", self.replies.to_string()),
                ("Failed", self.failed.to_string()),
            ],
        );
    }
}

/// Run extraction and identity resolution over one thread page.
///
/// The whole page is parsed and extracted before anything is written, so a
/// malformed document leaves the store untouched. A failing candidate is
/// counted and skipped.
pub fn ingest_document(
    config: &Config,
    store: &PostingStore,
    source: &str,
    filter: &dyn CandidateFilter,
) -> Result<IngestReport> {
    let extractor = CommentExtractor::new(&config.extractor.selectors)?;
    let document = extractor.load(source)?;

    let mut report = IngestReport::default();
    let mut accepted = Vec::new();
    for comment in extractor.comments(&document) {
        if comment.is_reply() {
            report.replies += 1;
        } else if filter.accept(&comment.candidate) {
            accepted.push(comment.candidate);
        } else {
            report.filtered += 1;
        }
    }
    ::log::debug!(
        "Extracted {} candidates ({} replies, {} filtered)",
        accepted.len(),
        report.replies,
        report.filtered
    );

    let resolver = IdentityResolver::new(store);
    for candidate in &accepted {
        match resolver.resolve(candidate) {
            Ok(resolution) => report.record(resolution),
            Err(e) => {
                ::log::error!(
                    "Failed to store candidate {}: {}",
                    candidate.external_id.as_deref().unwrap_or("-"),
                    e
                );
                report.failed += 1;
            }
        }
    }

    Ok(report)
}

/// Fetch a thread by URL and ingest it.
pub async fn run_ingest(config: &Config, store: &PostingStore, thread_url: &str) -> Result<IngestReport> {
    let parsed = url::validate_source_url(thread_url, &config.source.allowed_hosts)?;
    log::header(&format!("Ingesting {}", parsed));

    backup_if_enabled(config, store)?;

    let client = http::create_async_client(&config.fetcher)?;
    let page = http::fetch_with_retry(&client, parsed.as_str(), &config.fetcher).await?;
    log::sub_item(&format!("Fetched {} bytes", page.len()));

    let filter = filter::from_config(&config.extractor);
    let report = ingest_document(config, store, &page, filter.as_ref())?;
    report.print(parsed.as_str());
    Ok(report)
}

/// Ingest a thread page saved on disk.
pub fn ingest_file(config: &Config, store: &PostingStore, path: &Path) -> Result<IngestReport> {
    let page = std::fs::read_to_string(path)?;
    log::header(&format!("Ingesting {}", path.display()));

    backup_if_enabled(config, store)?;

    let filter = filter::from_config(&config.extractor);
    let report = ingest_document(config, store, &page, filter.as_ref())?;
    report.print(&path.display().to_string());
    Ok(report)
}

fn backup_if_enabled(config: &Config, store: &PostingStore) -> Result<()> {
    if !config.storage.backup_before_ingest {
        return Ok(());
    }
    let outcome = backup_database(store, &config.storage.backup_dir())?;
    if let BackupOutcome::Created(_) = outcome {
        log::sub_item(&outcome.to_string());
    }
    Ok(())
}
