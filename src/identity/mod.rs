//! App identity resolution: display name and tracking base name.
//!
//! The display name comes from the page itself when possible (post heading,
//! then page title), and is guessed from the URL path as a last resort. The
//! tracking base name is the display name with the version token and any
//! marketing subtitle removed, so the tracking key stays stable across
//! version bumps.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use url::Url;

/// Sentinel when no name can be resolved from any source.
pub const UNKNOWN_APP_NAME: &str = "UnknownApp";

/// Sentinel base name when version/subtitle stripping leaves nothing.
const EMPTY_BASE_FALLBACK: &str = "App";

/// Leading "download" keyword prefixes, either supported language.
const DOWNLOAD_PREFIXES: &[&str] = &["دانلود ", "download "];

/// Trailing site/section suffixes on the `<title>` element, e.g.
/// `... - فارسروید` or `... – دانلود برنامه`.
#[allow(clippy::expect_used)]
static TITLE_SITE_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*[-|\u{2013}\u{2014}]\s*(?:فارسروید|دانلود.*)$")
        .expect("title suffix regex is valid") // Static pattern, safe to panic
});

/// Trailing "– اپلیکیشن ..." section suffix on the `<title>` element.
#[allow(clippy::expect_used)]
static TITLE_SECTION_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*\u{2013}\s*اپلیکیشن.*$")
        .expect("title section regex is valid") // Static pattern, safe to panic
});

/// File extensions stripped from a URL path segment before guessing a name.
#[allow(clippy::expect_used)]
static URL_SEGMENT_EXTENSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(?:apk|zip|html|php|asp|aspx)$")
        .expect("extension regex is valid") // Static pattern, safe to panic
});

/// Version-looking token at the end of a URL path segment, e.g. `-1.2.3`
/// or `_v2.3.4b`.
#[allow(clippy::expect_used)]
static TRAILING_VERSION_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[-_][vV]?\d+(?:\.\d+)+[a-zA-Z0-9.\-]*$")
        .expect("trailing version regex is valid") // Static pattern, safe to panic
});

/// Version-looking token at the start of a URL path segment.
#[allow(clippy::expect_used)]
static LEADING_VERSION_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[vV]?\d+(?:\.\d+)+[a-zA-Z0-9.\-]*[-_]")
        .expect("leading version regex is valid") // Static pattern, safe to panic
});

/// Generic marketing/download keywords dropped from URL-derived names, both
/// languages.
#[allow(clippy::expect_used)]
static MARKETING_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:دانلود|download|برنامه|app|apk|mod|hack|premium|pro|full|unlocked|final|update|android|farsroid)\b",
    )
    .expect("marketing keyword regex is valid") // Static pattern, safe to panic
});

/// Hyphen/underscore word separators in URL path segments.
#[allow(clippy::expect_used)]
static WORD_SEPARATORS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[-_]+").expect("separator regex is valid") // Static pattern, safe to panic
});

/// One or more whitespace characters.
#[allow(clippy::expect_used)]
static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+").expect("whitespace regex is valid") // Static pattern, safe to panic
});

/// Subtitle separator: hyphen, en-dash, or em-dash with optional spacing.
#[allow(clippy::expect_used)]
static SUBTITLE_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*[-\u{2013}\u{2014}]\s*").expect("subtitle regex is valid") // Static pattern, safe to panic
});

/// Resolves the app's display name from a parsed page.
///
/// Cascade: first `h1` whose class contains `title` (case-insensitive) with
/// non-empty text; else the `<title>` text with known site/section suffixes
/// stripped; a leading "download" keyword in either language is removed from
/// whichever candidate won. When neither yields anything usable the name is
/// guessed from the URL path, and failing that the [`UNKNOWN_APP_NAME`]
/// sentinel is returned.
#[must_use]
pub fn resolve_app_name(document: &Html, page_url: &Url) -> String {
    let candidate = heading_candidate(document).or_else(|| title_candidate(document));

    if let Some(name) = candidate {
        let stripped = strip_download_prefix(&name);
        if !stripped.is_empty() {
            return stripped;
        }
    }

    debug!(page = %page_url, "no usable heading or title, guessing name from URL path");
    name_from_url_path(page_url).unwrap_or_else(|| {
        warn!(page = %page_url, "app name could not be resolved from any source");
        UNKNOWN_APP_NAME.to_string()
    })
}

/// Derives the version-independent base name used in the tracking key.
///
/// Removes an exact occurrence of the version token (optionally `v`-prefixed)
/// from the display name, then truncates at the first hyphen/dash separator
/// to drop the marketing subtitle. Falls back to `App` when nothing is left.
#[must_use]
pub fn base_name_for_tracking(display_name: &str, version: &str) -> String {
    let without_version = if version.is_empty() {
        display_name.trim().to_string()
    } else {
        let pattern = format!(r"(?i)\s*[vV]?{}\b", regex::escape(version));
        match Regex::new(&pattern) {
            Ok(regex) => regex.replace_all(display_name, "").trim().to_string(),
            Err(error) => {
                warn!(%error, version = %version, "version strip pattern failed to compile");
                display_name.trim().to_string()
            }
        }
    };

    let base = SUBTITLE_SEPARATOR
        .splitn(&without_version, 2)
        .next()
        .unwrap_or("")
        .trim()
        .to_string();

    if base.is_empty() {
        EMPTY_BASE_FALLBACK.to_string()
    } else {
        base
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn heading_candidate(document: &Html) -> Option<String> {
    let selector = Selector::parse("h1").ok()?;
    document.select(&selector).find_map(|element| {
        let class = element.value().attr("class")?;
        if !class.to_lowercase().contains("title") {
            return None;
        }
        let text = element_text(element);
        (!text.is_empty()).then_some(text)
    })
}

fn title_candidate(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    let raw = document
        .select(&selector)
        .map(element_text)
        .find(|text| !text.is_empty())?;

    let stripped = TITLE_SITE_SUFFIX.replace(&raw, "");
    let stripped = TITLE_SECTION_SUFFIX.replace(stripped.trim(), "");
    let cleaned = stripped.trim().to_string();
    (!cleaned.is_empty()).then_some(cleaned)
}

fn strip_download_prefix(name: &str) -> String {
    let lowered = name.to_lowercase();
    for prefix in DOWNLOAD_PREFIXES {
        // Both prefixes lower-case to the same byte length, so the prefix
        // length indexes the original string safely.
        if lowered.starts_with(prefix) && name.is_char_boundary(prefix.len()) {
            return name[prefix.len()..].trim().to_string();
        }
    }
    name.trim().to_string()
}

fn name_from_url_path(page_url: &Url) -> Option<String> {
    let decoded = urlencoding::decode(page_url.path()).ok()?;
    let last_segment = decoded.split('/').filter(|part| !part.is_empty()).next_back()?;

    let guessed = URL_SEGMENT_EXTENSION.replace(last_segment, "");
    let guessed = TRAILING_VERSION_TOKEN.replace(&guessed, "");
    let guessed = LEADING_VERSION_TOKEN.replace(&guessed, "");

    let capitalized = WORD_SEPARATORS
        .split(&guessed)
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ");

    let without_keywords = MARKETING_KEYWORDS.replace_all(&capitalized, "");
    let collapsed = WHITESPACE_RUN
        .replace_all(without_keywords.trim(), " ")
        .trim()
        .to_string();

    if collapsed.is_empty() {
        None
    } else {
        debug!(guessed = %collapsed, "app name guessed from URL path");
        Some(collapsed)
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}
