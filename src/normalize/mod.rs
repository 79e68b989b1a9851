//! Text normalization for tracking ids and suggested filenames.
//!
//! Page text on the source site mixes Persian and Latin script, decorative
//! dashes, and a trailing site-attribution suffix like `(farsroid.com)`.
//! Everything that ends up in a tracking id or a filename goes through
//! [`normalize`] first so the same logical artifact always produces the same
//! string.

use std::sync::LazyLock;

use regex::Regex;

/// Trailing parenthetical attribution suffix, e.g. `App Name (farsroid.com)`.
/// The site sometimes nests or doubles the parenthetical, so the body is a
/// lazy wildcard anchored at the end of the string.
#[allow(clippy::expect_used)]
static TRAILING_ATTRIBUTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*\((?:farsroid\.com|www\.farsroid\.com|.*?)\)\s*$")
        .expect("attribution regex is valid") // Static pattern, safe to panic
});

/// Characters that are illegal or troublesome in filenames.
#[allow(clippy::expect_used)]
static ILLEGAL_FILENAME_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[<>:"/\\|?*()\[\]]"#).expect("filename char regex is valid") // Static pattern, safe to panic
});

/// Parentheses and brackets, dropped entirely in display mode.
#[allow(clippy::expect_used)]
static BRACKET_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[()\[\]]").expect("bracket regex is valid") // Static pattern, safe to panic
});

/// One or more whitespace characters.
#[allow(clippy::expect_used)]
static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+").expect("whitespace regex is valid") // Static pattern, safe to panic
});

/// One or more consecutive underscores.
#[allow(clippy::expect_used)]
static UNDERSCORE_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"_+").expect("underscore regex is valid") // Static pattern, safe to panic
});

/// Normalizes free-form page text into a canonical lower-case form.
///
/// Both modes trim the input, strip a trailing parenthetical attribution
/// suffix, lower-case, and fold en-dash/em-dash to a plain hyphen.
///
/// With `for_filename = true` the result is filesystem-safe: characters that
/// are illegal in filenames become underscores, whitespace becomes
/// underscores, and hyphen/underscore adjacency is collapsed.
///
/// With `for_filename = false` (tracking-id mode) parentheses and brackets
/// are dropped instead of replaced, and whitespace becomes underscores.
///
/// The function is idempotent in both modes:
/// `normalize(normalize(s, f), f) == normalize(s, f)`.
#[must_use]
pub fn normalize(text: &str, for_filename: bool) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let stripped = TRAILING_ATTRIBUTION.replace(trimmed, "");
    let lowered = stripped
        .trim()
        .to_lowercase()
        .replace('\u{2013}', "-") // en-dash
        .replace('\u{2014}', "-"); // em-dash

    if for_filename {
        let replaced = ILLEGAL_FILENAME_CHARS.replace_all(&lowered, "_");
        let underscored = WHITESPACE_RUN.replace_all(&replaced, "_");
        collapse_separator_runs(&underscored)
            .trim_matches('_')
            .to_string()
    } else {
        let unbracketed = BRACKET_CHARS.replace_all(&lowered, "");
        WHITESPACE_RUN
            .replace_all(&unbracketed, "_")
            .trim_matches('_')
            .to_string()
    }
}

/// Collapses runs of underscores to a single underscore.
///
/// Used on assembled tracking ids and filenames where independently
/// normalized segments are joined with `_` and may double up.
#[must_use]
pub(crate) fn collapse_underscore_runs(text: &str) -> String {
    UNDERSCORE_RUN.replace_all(text, "_").into_owned()
}

/// Collapses hyphen/underscore adjacency (`-_`, `_-`) and underscore runs
/// until a fixed point is reached.
///
/// A single replacement pass can leave new adjacencies behind (an `_-`
/// replacement may bring a `-` and `_` together), which would break the
/// idempotence guarantee of [`normalize`], so this iterates.
fn collapse_separator_runs(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let folded = current.replace("-_", "_").replace("_-", "_");
        let collapsed = UNDERSCORE_RUN.replace_all(&folded, "_").into_owned();
        if collapsed == current {
            return current;
        }
        current = collapsed;
    }
}
