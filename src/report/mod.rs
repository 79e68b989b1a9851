//! Update report and CI output emission.
//!
//! Every run writes a report file, even when no updates were found, so
//! downstream automation always has a well-formed artifact to read. When
//! running under GitHub Actions the update count is also appended to the
//! file named by `GITHUB_OUTPUT`.

use std::env;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

use crate::scan::ReleaseRecord;

/// Environment variable naming the CI output file, per GitHub Actions.
pub const CI_OUTPUT_ENV: &str = "GITHUB_OUTPUT";

/// Errors that can occur while emitting run outputs.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Serializing the report failed.
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Writing the report file failed.
    #[error("failed to write report file {path}: {source}")]
    Write {
        /// Path the write was attempted at.
        path: String,
        /// Underlying IO failure.
        #[source]
        source: io::Error,
    },

    /// Appending to the CI output file failed.
    #[error("failed to append to CI output file {path}: {source}")]
    CiOutput {
        /// Path of the CI output file.
        path: String,
        /// Underlying IO failure.
        #[source]
        source: io::Error,
    },
}

/// Writes the update report as a pretty-printed JSON array.
///
/// Non-ASCII text (Persian app names, variants) is written as-is, not
/// escaped, so the report stays human-readable.
pub fn write_report(path: &Path, records: &[ReleaseRecord]) -> Result<(), ReportError> {
    let mut serialized = serde_json::to_string_pretty(records)?;
    serialized.push('\n');
    std::fs::write(path, serialized).map_err(|source| ReportError::Write {
        path: path.display().to_string(),
        source,
    })?;
    info!(path = %path.display(), updates = records.len(), "report written");
    Ok(())
}

/// Appends `updates_count=N` to the CI output file when `GITHUB_OUTPUT` is
/// set; a silent no-op otherwise.
pub fn write_ci_output(update_count: usize) -> Result<(), ReportError> {
    let Some(path) = env::var_os(CI_OUTPUT_ENV) else {
        debug!("no CI output file configured, skipping");
        return Ok(());
    };

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|source| ReportError::CiOutput {
            path: path.to_string_lossy().into_owned(),
            source,
        })?;

    writeln!(file, "updates_count={update_count}").map_err(|source| ReportError::CiOutput {
        path: path.to_string_lossy().into_owned(),
        source,
    })?;

    debug!(update_count, "CI output appended");
    Ok(())
}
