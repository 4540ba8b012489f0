// src/pipeline/discard.rs

//! Bulk discard of postings made stale by their author's other postings.

use std::io::{BufRead, Write};

use crate::error::Result;
use crate::services::{DiscardAdvisor, DiscardReport};
use crate::storage::PostingStore;
use crate::utils::log;

/// Flags of a discard run.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardOptions {
    /// Skip the confirmation prompt
    pub assume_yes: bool,

    /// Only report how many postings would be discarded
    pub dry_run: bool,
}

/// How a discard run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscardOutcome {
    /// Nothing to discard
    NoCandidates,
    /// Dry run; this many postings would be discarded
    DryRun(usize),
    /// The prompt was answered with anything but yes
    Declined(usize),
    Applied(DiscardReport),
}

/// Ask a yes/no question. Only `y` or `yes` (any case) count as yes.
pub fn confirm(prompt: &str, mut input: impl BufRead, mut output: impl Write) -> Result<bool> {
    write!(output, "{} [y/N] ", prompt)?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}

/// Count the discard candidates, confirm, then discard them.
pub fn run_discard(
    store: &PostingStore,
    options: DiscardOptions,
    input: impl BufRead,
    mut output: impl Write,
) -> Result<DiscardOutcome> {
    let advisor = DiscardAdvisor::new(store);
    let count = advisor.get_count()?;

    if count == 0 {
        writeln!(output, "No postings to discard.")?;
        return Ok(DiscardOutcome::NoCandidates);
    }

    if options.dry_run {
        writeln!(output, "{} posting(s) would be discarded.", count)?;
        return Ok(DiscardOutcome::DryRun(count));
    }

    if !options.assume_yes {
        let prompt = format!("Discard {} posting(s) from authors you already handled?", count);
        if !confirm(&prompt, input, &mut output)? {
            writeln!(output, "Aborted.")?;
            return Ok(DiscardOutcome::Declined(count));
        }
    }

    let report = advisor.apply_discards()?;
    let mut items = vec![
        ("Candidates", report.candidates.to_string()),
        ("Discarded", report.discarded.to_string()),
    ];
    if let Some(failure) = &report.failure {
        items.push(("Stopped at", format!("posting {}: {}", failure.id, failure.reason)));
    }
    log::summary("Auto-discard", &items);

    Ok(DiscardOutcome::Applied(report))
}
