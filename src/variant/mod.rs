//! Build-variant classification for download links.
//!
//! A single release page publishes several binaries of the same app and
//! version: modded builds, per-architecture splits, language editions, data
//! archives. The classifier reduces the free-form link text and filename to
//! one canonical variant label so each binary is tracked independently.

mod rules;

use tracing::trace;

use rules::{
    ARCH_RULES, BUILD_RULES, DATA_KEYWORDS, FILENAME_UNIVERSAL_KEYWORDS, LANGUAGE_RULES,
    LITE_RULE, PREMIUM_RULE, RAW_LINK_UNIVERSAL_KEYWORDS, UNIVERSAL_KEYWORDS, WINDOWS_KEYWORDS,
    contains_any,
};

/// Attribution suffix scrubbed from the combined classification text.
const ATTRIBUTION_LITERAL: &str = "(farsroid.com)";

/// What kind of artifact a download link points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// An installable Android package (`.apk`).
    Package,
    /// A data/content archive (`.zip`).
    Archive,
}

impl ArtifactKind {
    /// Classifies a download URL by its extension. Anything that is not a
    /// zip archive is treated as an installable package.
    #[must_use]
    pub fn from_download_url(url: &str) -> Self {
        if url.to_lowercase().ends_with(".zip") {
            Self::Archive
        } else {
            Self::Package
        }
    }

    /// The filename extension for this kind, dot included.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Package => ".apk",
            Self::Archive => ".zip",
        }
    }
}

/// Classifies one download link into a canonical variant label.
///
/// Tags are assigned from the lower-cased concatenation of filename and link
/// text (attribution suffix removed). Categories are independently additive;
/// within a category the first matching rule wins:
///
/// - build type (`Mod-Extra` > `Mod-Lite` > `Mod`), then `Premium` (only
///   without a `Mod*` tag), then `Lite` (only when not already covered);
/// - language (`Persian` > `English`);
/// - architecture (most specific first);
/// - archives with no tag yet classify by content keyword (`Windows` or
///   `Data`, defaulting to `Data`);
/// - packages with no tag yet classify by universal/main keyword.
///
/// The collected tags are deduplicated, sorted alphabetically, and joined
/// with `-`; the sort makes the label independent of keyword order in the
/// source text, which the tracking key depends on. An empty tag set falls
/// back to `Universal` or `Default` depending on artifact kind and a raw
/// link-text recheck.
#[must_use]
pub fn classify(link_text: &str, filename: &str, kind: ArtifactKind) -> String {
    let combined = format!("{} {}", filename.to_lowercase(), link_text.to_lowercase())
        .replace(ATTRIBUTION_LITERAL, "");

    let mut tags: Vec<&'static str> = Vec::new();

    if let Some(rule) = BUILD_RULES.iter().find(|rule| rule.matches(&combined)) {
        tags.push(rule.tag);
    }

    let has_mod_tag = tags
        .iter()
        .any(|tag| tag.to_lowercase().starts_with("mod"));
    if PREMIUM_RULE.matches(&combined) && !has_mod_tag {
        tags.push(PREMIUM_RULE.tag);
    }

    let lite_covered = tags.iter().any(|tag| tag.to_lowercase().contains("lite"));
    if !lite_covered && LITE_RULE.matches(&combined) {
        tags.push(LITE_RULE.tag);
    }

    if let Some(rule) = LANGUAGE_RULES.iter().find(|rule| rule.matches(&combined)) {
        tags.push(rule.tag);
    }

    if let Some(rule) = ARCH_RULES.iter().find(|rule| rule.matches(&combined)) {
        tags.push(rule.tag);
    }

    if tags.is_empty() {
        match kind {
            ArtifactKind::Archive => {
                if contains_any(&combined, WINDOWS_KEYWORDS) {
                    tags.push("Windows");
                } else {
                    // Untagged archives are game data whether or not a data
                    // keyword says so explicitly.
                    let by_keyword = contains_any(&combined, DATA_KEYWORDS);
                    trace!(by_keyword, "archive classified as Data");
                    tags.push("Data");
                }
            }
            ArtifactKind::Package => {
                if contains_any(&combined, UNIVERSAL_KEYWORDS) {
                    tags.push("Universal");
                } else if combined.contains("main") {
                    tags.push("Main");
                }
            }
        }
    }

    tags.sort_unstable();
    tags.dedup();

    if tags.is_empty() {
        let label = fallback_label(link_text, filename, kind);
        trace!(variant = %label, "no variant tags, using fallback label");
        return label.to_string();
    }

    tags.join("-")
}

/// Fallback label for links whose tag set came up empty.
///
/// Packages get one more chance to be recognized as the plain build: the raw
/// (non-lowered) link text is checked for the Persian original/plain
/// keywords, then the lowered filename for `universal`/`main`. Everything
/// else is `Default`. The exact branching here feeds the tracking key, so it
/// is preserved as specified.
fn fallback_label(link_text: &str, filename: &str, kind: ArtifactKind) -> &'static str {
    match kind {
        ArtifactKind::Package => {
            if contains_any(link_text, RAW_LINK_UNIVERSAL_KEYWORDS)
                || contains_any(&filename.to_lowercase(), FILENAME_UNIVERSAL_KEYWORDS)
            {
                "Universal"
            } else {
                "Default"
            }
        }
        ArtifactKind::Archive => "Default",
    }
}
