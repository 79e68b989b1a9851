//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use apkwatch_core::{DEFAULT_FETCH_ATTEMPTS, DEFAULT_MARKER_TIMEOUT};

/// Watch app release pages and report newly published versions.
///
/// Apkwatch scans a list of release-page URLs, extracts versioned download
/// links, and reports the ones that are newer than the last recorded state.
#[derive(Parser, Debug)]
#[command(name = "apkwatch")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// File listing page URLs to check, one per line (# starts a comment)
    #[arg(short = 'u', long, default_value = "urls_to_check.txt")]
    pub urls_file: PathBuf,

    /// File holding the last-seen version per tracking id
    #[arg(short = 't', long, default_value = "versions_tracker.json")]
    pub tracker_file: PathBuf,

    /// File the update report is written to
    #[arg(short = 'o', long, default_value = "updates_found.json")]
    pub output_file: PathBuf,

    /// Seconds to wait per request for the download box to appear (1-120)
    #[arg(long, default_value_t = DEFAULT_MARKER_TIMEOUT.as_secs(), value_parser = clap::value_parser!(u64).range(1..=120))]
    pub timeout: u64,

    /// Fetch attempts per page (1-10)
    #[arg(short = 'r', long, default_value_t = DEFAULT_FETCH_ATTEMPTS as u8, value_parser = clap::value_parser!(u8).range(1..=10))]
    pub max_retries: u8,
}
