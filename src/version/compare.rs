//! Update detection: is an extracted version newer than the recorded one?

use std::cmp::Ordering;

use semver::Version;
use tracing::{debug, warn};

/// Sentinel recorded for artifacts that have never been seen.
///
/// A tracker entry equal to this value (or no entry at all) means any valid
/// current version counts as an update.
pub const NEVER_SEEN_VERSION: &str = "0.0.0";

/// Decides whether `current` is newer than `last_known`.
///
/// Comparison is a three-tier strategy, applied in order:
///
/// 1. Both strings parse as (lenient) semantic versions and differ in
///    precedence: the higher precedence wins. Build metadata is ignored for
///    precedence, per the semver spec.
/// 2. Both parse to equal precedence but the raw strings differ (e.g. a
///    build-tag difference): plain lexicographic comparison of the raw
///    strings decides.
/// 3. Either string fails to parse: plain lexicographic comparison of the
///    raw strings (newer iff they differ and `current` sorts greater).
///
/// The lexicographic tiers are exact behavior, not an approximation to be
/// improved: recorded tracker state depends on them.
#[must_use]
pub fn is_update(current: &str, last_known: Option<&str>) -> bool {
    if current.is_empty() {
        warn!("current version is empty, not an update");
        return false;
    }

    let Some(last) = last_known.filter(|v| !v.is_empty() && *v != NEVER_SEEN_VERSION) else {
        debug!(current = %current, "no previous version recorded, treating as update");
        return true;
    };

    match (parse_lenient(current), parse_lenient(last)) {
        (Some(current_parsed), Some(last_parsed)) => {
            match current_parsed.cmp_precedence(&last_parsed) {
                Ordering::Greater => true,
                Ordering::Less => false,
                // Equal precedence with different raw strings happens when a
                // suffix is invisible to precedence; fall back to the raw
                // string ordering so the outcome stays deterministic.
                Ordering::Equal => current != last && current > last,
            }
        }
        _ => {
            debug!(
                current = %current,
                last = %last,
                "version strings do not parse, comparing lexicographically"
            );
            current != last && current > last
        }
    }
}

/// Parses a version string leniently.
///
/// Tolerates a leading `v`/`V` and pads all-numeric strings with fewer than
/// three components (`1.2` becomes `1.2.0`), which covers the shapes the
/// source site actually publishes. Anything else must be well-formed semver
/// or the caller falls back to string comparison.
fn parse_lenient(raw: &str) -> Option<Version> {
    let trimmed = raw.trim();
    let unprefixed = trimmed.strip_prefix(['v', 'V']).unwrap_or(trimmed);

    if let Ok(version) = Version::parse(unprefixed) {
        return Some(version);
    }

    let all_numeric = unprefixed
        .split('.')
        .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()));
    if all_numeric {
        let components = unprefixed.split('.').count();
        if components < 3 {
            let mut padded = unprefixed.to_string();
            for _ in components..3 {
                padded.push_str(".0");
            }
            return Version::parse(&padded).ok();
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Tier 1: precedence ====================

    #[test]
    fn test_is_update_higher_version_wins() {
        assert!(is_update("2.0.0", Some("1.9.9")));
    }

    #[test]
    fn test_is_update_lower_version_is_not_update() {
        assert!(!is_update("1.9.9", Some("2.0.0")));
    }

    #[test]
    fn test_is_update_equal_versions_not_update() {
        assert!(!is_update("1.0.0", Some("1.0.0")));
    }

    #[test]
    fn test_is_update_prerelease_precedence() {
        assert!(is_update("1.0.0", Some("1.0.0-rc1")));
        assert!(is_update("1.0.0-rc2", Some("1.0.0-rc1")));
    }

    // ==================== Sentinel / bootstrap ====================

    #[test]
    fn test_is_update_never_seen_sentinel() {
        assert!(is_update("1.0.0", Some("0.0.0")));
    }

    #[test]
    fn test_is_update_missing_last_version() {
        assert!(is_update("1.0.0", None));
        assert!(is_update("1.0.0", Some("")));
    }

    #[test]
    fn test_is_update_empty_current_never_updates() {
        assert!(!is_update("", Some("1.0.0")));
        assert!(!is_update("", None));
    }

    // ==================== Tier 2: equal precedence, raw tie-break ====================

    #[test]
    fn test_is_update_string_tie_break_on_suffix() {
        // "1.0.0b" does not parse; the raw string sorts above "1.0.0".
        // Verify the exact fallback, not the semantic intent.
        assert!(is_update("1.0.0b", Some("1.0.0")));
    }

    #[test]
    fn test_is_update_equal_precedence_build_metadata() {
        // Build metadata is invisible to precedence; raw strings decide.
        assert!(is_update("1.0.0+build2", Some("1.0.0+build1")));
        assert!(!is_update("1.0.0+build1", Some("1.0.0+build2")));
    }

    // ==================== Tier 3: lexicographic fallback ====================

    #[test]
    fn test_is_update_non_parsing_lexicographic() {
        assert!(!is_update("abc", Some("abd")));
        assert!(is_update("abd", Some("abc")));
        assert!(!is_update("abc", Some("abc")));
    }

    // ==================== Lenient parsing ====================

    #[test]
    fn test_is_update_pads_short_numeric_versions() {
        assert!(is_update("1.3", Some("1.2.9")));
        assert!(!is_update("1.2", Some("1.2.0")));
    }

    #[test]
    fn test_is_update_tolerates_v_prefix() {
        assert!(is_update("v2.0.0", Some("1.0.0")));
        assert!(is_update("2.0.0", Some("v1.0.0")));
    }

    #[test]
    fn test_parse_lenient_shapes() {
        assert!(parse_lenient("1.2.3").is_some());
        assert!(parse_lenient("v1.2.3").is_some());
        assert!(parse_lenient("1.2").is_some());
        assert!(parse_lenient("7").is_some());
        assert!(parse_lenient("1.0.0-rc1").is_some());
        assert!(parse_lenient("1.0.0b").is_none());
        assert!(parse_lenient("23.5.0.23").is_none());
        assert!(parse_lenient("abc").is_none());
    }
}
