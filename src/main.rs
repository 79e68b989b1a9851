//! CLI entry point for the apkwatch tool.

use std::fs;
use std::io;
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use apkwatch_core::{
    DOWNLOAD_BOX_CLASS, HttpFetcher, PageFetcher, TrackerSnapshot, is_known_layout, scan_page,
    write_ci_output, write_report,
};
use clap::Parser;
use tracing::{debug, error, info, warn};
use url::Url;

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");
    info!("Apkwatch starting");

    run(args).await
}

async fn run(args: Args) -> Result<ExitCode> {
    let urls = match read_url_listing(&args.urls_file) {
        Ok(urls) => urls,
        Err(error) => {
            // A missing URL listing is the one hard failure: outputs are
            // still written so automation sees a zero count, but the exit
            // code flags the misconfiguration.
            error!(%error, path = %args.urls_file.display(), "URL listing unavailable");
            write_report(&args.output_file, &[])?;
            write_ci_output(0)?;
            return Ok(ExitCode::FAILURE);
        }
    };

    if urls.is_empty() {
        info!(path = %args.urls_file.display(), "URL listing is empty or comments only");
        write_report(&args.output_file, &[])?;
        write_ci_output(0)?;
        return Ok(ExitCode::SUCCESS);
    }

    let tracker = TrackerSnapshot::load(&args.tracker_file);
    let fetcher = HttpFetcher::new(u32::from(args.max_retries))?;
    let timeout = Duration::from_secs(args.timeout);

    let mut all_updates = Vec::new();
    for raw_url in &urls {
        info!(url = %raw_url, "checking page");

        let page_url = match Url::parse(raw_url) {
            Ok(parsed) => parsed,
            Err(error) => {
                warn!(%error, url = %raw_url, "URL does not parse, skipping");
                continue;
            }
        };

        if !is_known_layout(&page_url) {
            warn!(url = %page_url, "no scraper implemented for this site, skipping");
            continue;
        }

        let markup = match fetcher
            .fetch(page_url.as_str(), DOWNLOAD_BOX_CLASS, timeout)
            .await
        {
            Ok(markup) => markup,
            Err(error) => {
                error!(%error, url = %page_url, "page fetch failed, skipping");
                continue;
            }
        };

        let updates = scan_page(&markup, &page_url, &tracker);
        info!(url = %page_url, updates = updates.len(), "page scanned");
        all_updates.extend(updates);
    }

    let next_snapshot = tracker.merged(
        all_updates
            .iter()
            .map(|update| (update.tracking_id.as_str(), update.current_version_for_tracking.as_str())),
    );
    if let Err(error) = next_snapshot.save(&args.tracker_file) {
        // The report is still worth writing when only the state save failed
        error!(%error, "failed to save tracker state");
    }

    write_report(&args.output_file, &all_updates)?;
    write_ci_output(all_updates.len())?;

    info!(
        updates = all_updates.len(),
        pages = urls.len(),
        report = %args.output_file.display(),
        "run complete"
    );

    Ok(ExitCode::SUCCESS)
}

/// Reads the URL listing: one URL per line, blank lines and `#` comments
/// ignored. Errors when the file cannot be read at all.
fn read_url_listing(path: &Path) -> io::Result<Vec<String>> {
    let contents = fs::read_to_string(path)?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}
