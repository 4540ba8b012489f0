// src/pipeline/browse.rs

//! Read-only views over the posting store.

use std::io::Write;

use crate::error::{AppError, Result};
use crate::models::{Config, Posting, Status};
use crate::services::{PostingQuery, StatusLifecycle};
use crate::storage::{ListFilter, PostingStore};
use crate::utils::url::{comment_link, user_link};

const LIST_ROW: &str = "{id}  {status}  {author}";
const HEADLINE_CHARS: usize = 72;

/// Print postings as a table, or as a JSON array.
pub fn write_list(postings: &[Posting], json: bool, mut out: impl Write) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut out, postings)?;
        writeln!(out)?;
        return Ok(());
    }

    if postings.is_empty() {
        writeln!(out, "No postings found.")?;
        return Ok(());
    }

    let author_width = postings
        .iter()
        .filter_map(|p| p.author.as_deref())
        .map(str::len)
        .max()
        .unwrap_or(1)
        .clamp(1, 24);

    for posting in postings {
        let row = LIST_ROW
            .replace("{id}", &format!("{:>5}", posting.id))
            .replace("{status}", &format!("{:<13}", posting.status.as_str()))
            .replace(
                "{author}",
                &format!("{:<width$}", posting.author.as_deref().unwrap_or("-"), width = author_width),
            );
        writeln!(out, "{}  {}", row, posting.headline(HEADLINE_CHARS))?;
    }
    writeln!(out, "{} posting(s)", postings.len())?;
    Ok(())
}

/// Print one posting with its source links.
pub fn write_posting(posting: &Posting, json: bool, mut out: impl Write) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut out, posting)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(
        out,
        "{}",
        posting.format(
            "Posting #{id} [{label}]\n  Author:     {author}\n  Comment id: {external_id}\n  Inserted:   {inserted_at}\n  Updated:    {updated_at}\n  Applied:    {applied_at}"
        )
    )?;
    if let Some(external_id) = &posting.external_id {
        writeln!(out, "  Link:       {}", comment_link(external_id))?;
    }
    if let Some(author) = &posting.author {
        writeln!(out, "  Profile:    {}", user_link(author))?;
    }
    writeln!(out)?;
    writeln!(out, "{}", posting.body)?;
    Ok(())
}

/// Print the status vocabulary.
pub fn write_statuses(mut out: impl Write) -> Result<()> {
    for status in Status::ALL {
        writeln!(out, "{:<13}  {}", status.as_str(), status.label())?;
    }
    Ok(())
}

/// Print store location and per-status counts.
pub fn write_info(config: &Config, store: &PostingStore, mut out: impl Write) -> Result<()> {
    let location = store
        .path()
        .map_or_else(|| ":memory:".to_string(), |p| p.display().to_string());
    writeln!(out, "Database:   {}", location)?;
    writeln!(
        out,
        "Backups:    {}",
        if config.storage.backup_before_ingest {
            config.storage.backup_dir().display().to_string()
        } else {
            "disabled".to_string()
        }
    )?;
    writeln!(out, "Postings:   {}", store.count()?)?;

    let query = PostingQuery::new(store);
    for (status, count) in query.status_counts()? {
        writeln!(out, "  {:<13} {}", status.as_str(), count)?;
    }

    let candidates = crate::services::DiscardAdvisor::new(store).get_count()?;
    writeln!(out, "Discard candidates: {}", candidates)?;
    Ok(())
}

/// List postings matching `filter`.
pub fn run_list(store: &PostingStore, filter: &ListFilter, json: bool, out: impl Write) -> Result<()> {
    let postings = PostingQuery::new(store).list(filter)?;
    write_list(&postings, json, out)
}

/// Show one posting, `NotFound` when the id is unknown.
pub fn run_show(store: &PostingStore, id: i64, json: bool, out: impl Write) -> Result<()> {
    let posting = PostingQuery::new(store).get(id)?;
    write_posting(&posting, json, out)
}

/// Move a posting to a new status and print the result.
pub fn run_status(store: &PostingStore, id: i64, status: &str, mut out: impl Write) -> Result<Posting> {
    let posting = StatusLifecycle::new(store).transition(id, status)?;
    writeln!(out, "Posting {} is now {}", posting.id, posting.status.label())?;
    Ok(posting)
}

/// One-line message for errors a user can fix by changing the input.
pub fn describe_error(error: &AppError) -> String {
    match error {
        AppError::NotFound { id } => format!("No posting with id {}", id),
        AppError::InvalidStatus(value) => {
            let valid: Vec<_> = Status::ALL.iter().map(|s| s.as_str()).collect();
            format!("Invalid status '{}'. Valid statuses: {}", value, valid.join(", "))
        }
        other => other.to_string(),
    }
}
