//! Pipeline entry points for tracker operations.
//!
//! - `run_ingest`: Fetch a thread and upsert its postings
//! - `run_discard`: Discard postings made stale by related ones
//! - `run_list` / `run_show`: Browse stored postings
//! - `run_validate`: Check a configuration file

pub mod browse;
pub mod discard;
pub mod ingest;
pub mod validate;

pub use browse::{describe_error, run_list, run_show, run_status, write_info, write_statuses};
pub use discard::{DiscardOptions, DiscardOutcome, run_discard};
pub use ingest::{IngestReport, ingest_document, ingest_file, run_ingest};
pub use validate::run_validate;
