//! Version token extraction from link text and filenames.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

/// Ordered extraction strategies, most specific first.
///
/// The two bounded patterns emulate token boundaries around the version:
/// nothing word-like, dot, or hyphen may touch the match on the left, and
/// nothing word-like or dot may touch it on the right, so `1.2.3` inside a
/// longer identifier or an IP-like token is not picked up. The `regex` crate
/// has no lookaround, so the boundaries are consumed groups around the
/// capture.
#[allow(clippy::expect_used)]
static BOUNDED_PATTERNS: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        // e.g. v1.2.3, 2.3.4-beta, 1.0.0_RC1, 2.2.9b, 23.5.0.23
        Regex::new(r"(?:^|[^\w.\-])[vV]?(\d+(?:\.\d+){1,3}(?:(?:[-._]?[A-Za-z0-9]+)+)?)(?:[^.\w]|$)")
            .expect("strict version regex is valid"), // Static pattern, safe to panic
        // e.g. 1.0, 22.5
        Regex::new(r"(?:^|[^\w.\-])[vV]?(\d+(?:\.\d+){1,2})(?:[^.\w]|$)")
            .expect("loose version regex is valid"), // Static pattern, safe to panic
    ]
});

/// Last-resort pattern with no token boundaries, for version strings glued
/// onto surrounding text.
#[allow(clippy::expect_used)]
static PERMISSIVE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+\.\d+(?:\.\d+){0,2}(?:[.-]?[A-Za-z0-9]+)*)")
        .expect("permissive version regex is valid") // Static pattern, safe to panic
});

/// Extracts a version token from a download link's text or filename.
///
/// The bounded patterns are tried first, exhaustively per source (link text,
/// then filename); only when neither source yields a bounded match does the
/// permissive fallback repeat that source order. The first hit wins and the
/// leading `v`/`V` is excluded from the result.
///
/// Returns `None` when no pattern matches either source. The caller treats
/// that link as non-extractable and skips it; it is not an error.
#[must_use]
pub fn extract_version(link_text: &str, filename: &str) -> Option<String> {
    for source in [link_text, filename] {
        if source.is_empty() {
            continue;
        }
        for pattern in BOUNDED_PATTERNS.iter() {
            if let Some(captures) = pattern.captures(source) {
                let version = captures[1].trim().to_string();
                trace!(version = %version, source = %source, "bounded version match");
                return Some(version);
            }
        }
    }

    for source in [link_text, filename] {
        if source.is_empty() {
            continue;
        }
        if let Some(captures) = PERMISSIVE_PATTERN.captures(source) {
            let version = captures[1].trim().to_string();
            trace!(version = %version, source = %source, "permissive version match");
            return Some(version);
        }
    }

    None
}
