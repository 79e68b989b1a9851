//! Release record construction: tracking ids and suggested filenames.

use serde::Serialize;
use url::Url;

use crate::identity::base_name_for_tracking;
use crate::normalize::{collapse_underscore_runs, normalize};
use crate::variant::ArtifactKind;

/// Variant labels that carry no information worth repeating in a filename.
const GENERIC_VARIANT_LABELS: &[&str] = &[
    "universal", "default", "unknown", "main", "standard", "original",
];

/// Keywords that mark a variant label as specific enough to keep in the
/// filename even when it also looks generic.
const SPECIFIC_VARIANT_KEYWORDS: &[&str] = &[
    "arm", "x86", "data", "windows", "persian", "english", "mod", "premium", "lite",
];

/// One fully-resolved, classified download entry discovered during a page
/// scan. Built fresh each run and never persisted directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseRecord {
    /// Human-readable app name, may include descriptive suffixes.
    #[serde(rename = "app_name")]
    pub display_app_name: String,
    /// Raw extracted version token (not necessarily well-formed semver).
    pub version: String,
    /// Canonical variant label, `-`-joined sorted tag set or a sentinel.
    pub variant: String,
    /// Absolute download URL, resolved against the page URL.
    pub download_url: String,
    /// The page the link was found on.
    pub page_url: String,
    /// Version-independent stable identity key:
    /// `<normalized base name>_<normalized variant>`.
    pub tracking_id: String,
    /// Filesystem-safe filename with version and (conditionally) variant.
    pub suggested_filename: String,
    /// The version value to record in the next tracker snapshot.
    pub current_version_for_tracking: String,
}

impl ReleaseRecord {
    /// Builds a record for one classified download link.
    ///
    /// The tracking id is derived from the display name with the version
    /// token stripped, so it stays identical across version bumps of the
    /// same artifact.
    #[must_use]
    pub fn build(
        display_app_name: &str,
        version: &str,
        variant: &str,
        kind: ArtifactKind,
        download_url: &Url,
        page_url: &Url,
    ) -> Self {
        let base_name = base_name_for_tracking(display_app_name, version);

        Self {
            display_app_name: display_app_name.to_string(),
            version: version.to_string(),
            variant: variant.to_string(),
            download_url: download_url.to_string(),
            page_url: page_url.to_string(),
            tracking_id: tracking_id(&base_name, variant),
            suggested_filename: suggested_filename(&base_name, version, variant, kind),
            current_version_for_tracking: version.to_string(),
        }
    }
}

/// Builds the stable tracking key for one (app, variant) pair.
///
/// Must never contain the version being tracked - that is the invariant the
/// whole update detection rests on.
#[must_use]
pub fn tracking_id(base_name: &str, variant: &str) -> String {
    let joined = format!("{}_{}", normalize(base_name, false), normalize(variant, false));
    collapse_underscore_runs(&joined)
        .trim_matches('_')
        .to_string()
}

/// Builds the suggested filesystem-safe filename for a record.
///
/// Shape: `<app>_v<version with dots as underscores>[_<variant>]<ext>`. The
/// variant segment is included only when it is not a generic sentinel, or
/// when it contains an architecture/content/language/build-type keyword
/// despite looking generic.
#[must_use]
pub fn suggested_filename(
    base_name: &str,
    version: &str,
    variant: &str,
    kind: ArtifactKind,
) -> String {
    let app_segment = normalize(base_name, true);
    let version_segment = normalize(version, true).replace('.', "_");
    let variant_segment = normalize(variant, true);

    let mut segments = vec![app_segment];
    if !version_segment.is_empty() {
        segments.push(format!("v{version_segment}"));
    }

    let is_generic = GENERIC_VARIANT_LABELS.contains(&variant_segment.as_str());
    let is_specific = SPECIFIC_VARIANT_KEYWORDS
        .iter()
        .any(|keyword| variant_segment.contains(keyword));
    if !variant_segment.is_empty() && (!is_generic || is_specific) {
        segments.push(variant_segment);
    }

    let joined = segments
        .into_iter()
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("_");

    collapse_underscore_runs(&format!("{}{}", joined, kind.extension()))
        .trim_matches('_')
        .to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn record(version: &str, variant: &str) -> ReleaseRecord {
        ReleaseRecord::build(
            &format!("Spotify Music v{version}"),
            version,
            variant,
            ArtifactKind::Package,
            &Url::parse("https://dl.farsroid.com/spotify.apk").unwrap(),
            &Url::parse("https://farsroid.com/spotify/").unwrap(),
        )
    }

    // ==================== Tracking id ====================

    #[test]
    fn test_tracking_id_joins_normalized_parts() {
        assert_eq!(tracking_id("Spotify Music", "Mod"), "spotify_music_mod");
    }

    #[test]
    fn test_tracking_id_collapses_underscores() {
        assert_eq!(tracking_id("Spotify  Music", "Mod"), "spotify_music_mod");
        assert_eq!(tracking_id("", "Mod"), "mod");
    }

    #[test]
    fn test_tracking_id_is_version_independent() {
        let old = record("1.2.3", "Mod");
        let new = record("1.3.0", "Mod");
        assert_eq!(old.tracking_id, new.tracking_id);
    }

    #[test]
    fn test_tracking_id_distinct_across_variants() {
        let modded = record("1.2.3", "Mod");
        let universal = record("1.2.3", "Universal");
        assert_ne!(modded.tracking_id, universal.tracking_id);
    }

    #[test]
    fn test_tracking_id_does_not_contain_version() {
        let built = record("1.2.3", "Arm64-v8a-Mod");
        assert!(
            !built.tracking_id.contains("1.2.3"),
            "tracking id must not embed the version: {}",
            built.tracking_id
        );
        assert_eq!(built.tracking_id, "spotify_music_arm64-v8a-mod");
    }

    // ==================== Suggested filename ====================

    #[test]
    fn test_suggested_filename_with_specific_variant() {
        let name = suggested_filename("Spotify Music", "8.9.0", "Mod", ArtifactKind::Package);
        assert_eq!(name, "spotify_music_v8_9_0_mod.apk");
    }

    #[test]
    fn test_suggested_filename_omits_generic_variant() {
        let name = suggested_filename("Spotify Music", "8.9.0", "Universal", ArtifactKind::Package);
        assert_eq!(name, "spotify_music_v8_9_0.apk");

        let name = suggested_filename("Spotify Music", "8.9.0", "Default", ArtifactKind::Package);
        assert_eq!(name, "spotify_music_v8_9_0.apk");
    }

    #[test]
    fn test_suggested_filename_keeps_arch_variant() {
        let name = suggested_filename(
            "Spotify Music",
            "8.9.0",
            "Arm64-v8a",
            ArtifactKind::Package,
        );
        assert_eq!(name, "spotify_music_v8_9_0_arm64-v8a.apk");
    }

    #[test]
    fn test_suggested_filename_zip_extension_for_archives() {
        let name = suggested_filename("Cool Game", "2.0", "Data", ArtifactKind::Archive);
        assert_eq!(name, "cool_game_v2_0_data.zip");
    }

    #[test]
    fn test_suggested_filename_version_suffix_preserved() {
        let name = suggested_filename("App", "1.0.0-beta", "Mod", ArtifactKind::Package);
        assert_eq!(name, "app_v1_0_0-beta_mod.apk");
    }

    // ==================== Record assembly ====================

    #[test]
    fn test_build_record_fields() {
        let built = record("8.9.0", "Mod");
        assert_eq!(built.display_app_name, "Spotify Music v8.9.0");
        assert_eq!(built.version, "8.9.0");
        assert_eq!(built.current_version_for_tracking, "8.9.0");
        assert_eq!(built.tracking_id, "spotify_music_mod");
        assert_eq!(built.suggested_filename, "spotify_music_v8_9_0_mod.apk");
        assert_eq!(built.download_url, "https://dl.farsroid.com/spotify.apk");
        assert_eq!(built.page_url, "https://farsroid.com/spotify/");
    }

    #[test]
    fn test_record_serializes_display_name_as_app_name() {
        let built = record("8.9.0", "Mod");
        let json = serde_json::to_value(&built).unwrap();
        assert_eq!(json["app_name"], "Spotify Music v8.9.0");
        assert_eq!(json["current_version_for_tracking"], "8.9.0");
        assert!(json.get("display_app_name").is_none());
    }
}
