//! Keyword rule tables for variant classification.
//!
//! Each rule maps a set of keywords (Latin and Persian spellings) to one
//! canonical tag. Precedence and mutual exclusion live in the table order,
//! not in branching code, so each rule can be tested in isolation.

/// One keyword-set-to-tag rule.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TagRule {
    /// Canonical tag emitted when the rule matches.
    pub tag: &'static str,
    /// Keywords that trigger the rule, matched as substrings of the
    /// lower-cased combined link text + filename.
    pub keywords: &'static [&'static str],
}

impl TagRule {
    /// Returns true when any of the rule's keywords occurs in `text`.
    pub(crate) fn matches(&self, text: &str) -> bool {
        self.keywords.iter().any(|keyword| text.contains(keyword))
    }
}

/// Build-type tags. Mutually exclusive, most specific first: a `mod-extra`
/// build also contains the bare `mod` keyword, so order is load-bearing.
pub(crate) const BUILD_RULES: &[TagRule] = &[
    TagRule {
        tag: "Mod-Extra",
        keywords: &["mod-extra", "مود اکسترا", "موداکسترا"],
    },
    TagRule {
        tag: "Mod-Lite",
        keywords: &["mod-lite", "مود لایت", "مودلایت"],
    },
    TagRule {
        tag: "Mod",
        keywords: &["mod", "مود شده", "مود"],
    },
];

/// Premium tag; suppressed when any `Mod*` build tag is already assigned.
pub(crate) const PREMIUM_RULE: TagRule = TagRule {
    tag: "Premium",
    keywords: &["premium", "پرمیوم"],
};

/// Lite tag; suppressed when an assigned tag already covers "lite".
pub(crate) const LITE_RULE: TagRule = TagRule {
    tag: "Lite",
    keywords: &["lite", "لایت"],
};

/// Language tags, mutually exclusive, Persian preferred.
pub(crate) const LANGUAGE_RULES: &[TagRule] = &[
    TagRule {
        tag: "Persian",
        keywords: &["persian", "فارسی"],
    },
    TagRule {
        tag: "English",
        keywords: &["english", "انگلیسی"],
    },
];

/// CPU architecture tags, mutually exclusive, most specific first (the
/// generic `arm` keyword is a substring of the specific ones).
pub(crate) const ARCH_RULES: &[TagRule] = &[
    TagRule {
        tag: "Arm64-v8a",
        keywords: &["arm64-v8a", "arm64"],
    },
    TagRule {
        tag: "Armeabi-v7a",
        keywords: &["armeabi-v7a", "armv7"],
    },
    TagRule {
        tag: "Arm",
        keywords: &["arm"],
    },
    TagRule {
        tag: "x86_64",
        keywords: &["x86_64"],
    },
    TagRule {
        tag: "x86",
        keywords: &["x86"],
    },
];

/// Archive content keywords: a Windows build shipped as a zip.
pub(crate) const WINDOWS_KEYWORDS: &[&str] = &["windows", "ویندوز"];

/// Archive content keywords: game/obb data shipped as a zip.
pub(crate) const DATA_KEYWORDS: &[&str] = &["data", "دیتا", "obb"];

/// Keywords marking the plain, unmodified package build.
pub(crate) const UNIVERSAL_KEYWORDS: &[&str] = &["universal", "اصلی", "original", "معمولی"];

/// Persian "original/plain" keywords checked against the raw link text in
/// the empty-set fallback.
pub(crate) const RAW_LINK_UNIVERSAL_KEYWORDS: &[&str] = &["اصلی", "معمولی"];

/// Filename keywords accepted as "universal" in the empty-set fallback.
pub(crate) const FILENAME_UNIVERSAL_KEYWORDS: &[&str] = &["universal", "main"];

/// Returns true when `text` contains any of `keywords`.
pub(crate) fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword))
}
