//! whoishiring CLI
//!
//! Local entry point for ingesting hiring threads and triaging postings.

use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use whoishiring::{
    error::{AppError, Result},
    models::{Config, Status},
    pipeline::{self, DiscardOptions, DiscardOutcome},
    storage::{ListFilter, PostingStore},
};

/// whoishiring - "Who is hiring?" posting tracker
#[derive(Parser, Debug)]
#[command(
    name = "whoishiring",
    version,
    about = "Track job postings from Hacker News hiring threads"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Database file (overrides storage.database_path)
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch a thread and store its top-level comments
    Ingest {
        /// Thread URL
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        url: Option<String>,

        /// Saved thread page
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Discard new postings from authors already handled
    Discard {
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,

        /// Only print how many postings would be discarded
        #[arg(long)]
        dry_run: bool,
    },

    /// List postings
    List {
        /// Only postings with this status
        #[arg(long)]
        status: Option<Status>,

        /// Case-insensitive text the body must contain
        #[arg(long)]
        search: Option<String>,

        /// Only postings by this author
        #[arg(long)]
        author: Option<String>,

        /// Print JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one posting
    Show {
        id: i64,

        /// Print JSON
        #[arg(long)]
        json: bool,
    },

    /// Change the status of a posting
    Status { id: i64, status: String },

    /// List the available statuses
    Statuses,

    /// Show database info
    Info,

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Command::Validate = cli.command {
        pipeline::run_validate(&cli.config)?;
        log::info!("All validations passed!");
        return Ok(());
    }

    let mut config = Config::load_or_default(&cli.config);
    if let Some(database) = cli.database {
        config.storage.database_path = database;
    }
    log::debug!("Using database {}", config.storage.database_path.display());

    let store = PostingStore::open(&config.storage.database_path)?;
    let stdout = io::stdout();

    match cli.command {
        Command::Ingest { url, file } => {
            let report = match (url, file) {
                (Some(url), _) => pipeline::run_ingest(&config, &store, &url).await?,
                (None, Some(file)) => pipeline::ingest_file(&config, &store, &file)?,
                (None, None) => {
                    return Err(AppError::validation("either --url or --file is required"));
                }
            };
            if report.failed > 0 {
                log::warn!("{} candidate(s) could not be stored", report.failed);
            }
        }

        Command::Discard { yes, dry_run } => {
            let options = DiscardOptions {
                assume_yes: yes,
                dry_run,
            };
            let outcome = pipeline::run_discard(&store, options, io::stdin().lock(), stdout.lock())?;
            if let DiscardOutcome::Applied(report) = outcome {
                if let Some(failure) = report.failure {
                    log::error!(
                        "Discard stopped at posting {} after {} of {}: {}",
                        failure.id,
                        report.discarded,
                        report.candidates,
                        failure.reason
                    );
                    std::process::exit(1);
                }
            }
        }

        Command::List {
            status,
            search,
            author,
            json,
        } => {
            let mut filter = ListFilter::all();
            if let Some(status) = status {
                filter = filter.with_status(status);
            }
            if let Some(search) = search.filter(|s| !s.is_empty()) {
                filter = filter.with_search(search);
            }
            if let Some(author) = author.filter(|s| !s.is_empty()) {
                filter = filter.with_author(author);
            }
            pipeline::run_list(&store, &filter, json, stdout.lock())?;
        }

        Command::Show { id, json } => match pipeline::run_show(&store, id, json, stdout.lock()) {
            Err(e) if e.is_not_found() => {
                eprintln!("{}", pipeline::describe_error(&e));
                std::process::exit(1);
            }
            other => other?,
        },

        Command::Status { id, status } => {
            match pipeline::run_status(&store, id, &status, stdout.lock()) {
                Err(e) if e.is_not_found() || e.is_invalid_status() => {
                    eprintln!("{}", pipeline::describe_error(&e));
                    std::process::exit(1);
                }
                other => {
                    other?;
                }
            }
        }

        Command::Statuses => pipeline::write_statuses(stdout.lock())?,

        Command::Info => pipeline::write_info(&config, &store, stdout.lock())?,

        // Handled before the store is opened
        Command::Validate => {}
    }

    Ok(())
}
