//! Integration tests for the full extraction-and-classification pipeline.
//!
//! These tests drive scan_page over fixture markup in the known page layout
//! and verify the invariants the tracker state depends on.

use apkwatch_core::{
    DEFAULT_MARKER_TIMEOUT, DOWNLOAD_BOX_CLASS, PageFetcher, StaticFetcher, TrackerSnapshot,
    scan_page,
};
use url::Url;

fn page_url() -> Url {
    Url::parse("https://farsroid.com/spotify-music/").unwrap()
}

/// Builds a page in the known layout with the given (href, link text) pairs.
fn farsroid_page(heading: &str, links: &[(&str, &str)]) -> String {
    let items: String = links
        .iter()
        .map(|(href, text)| {
            format!(
                r#"<li class="download-link">
                    <a class="download-btn" href="{href}"><span class="txt">{text}</span></a>
                </li>"#
            )
        })
        .collect();
    format!(
        r#"<!doctype html><html>
        <head><title>{heading} - فارسروید</title></head>
        <body>
        <h1 class="post-title">{heading}</h1>
        <article>some unrelated content</article>
        <section class="downloadbox">
            <h3>دانلود</h3>
            <ul class="download-links">{items}</ul>
        </section>
        </body></html>"#
    )
}

#[test]
fn test_scan_produces_one_record_per_variant() {
    let markup = farsroid_page(
        "دانلود Spotify Music v8.9.0 (farsroid.com)",
        &[
            (
                "https://dl.farsroid.com/Spotify-Music-8.9.0-Mod.apk",
                "دانلود نسخه مود Spotify 8.9.0",
            ),
            (
                "https://dl.farsroid.com/Spotify-Music-8.9.0-Mod-Lite.apk",
                "دانلود نسخه مود لایت Spotify 8.9.0",
            ),
            (
                "https://dl.farsroid.com/Spotify-Music-8.9.0.apk",
                "دانلود نسخه اصلی Spotify 8.9.0",
            ),
        ],
    );

    let updates = scan_page(&markup, &page_url(), &TrackerSnapshot::new());
    assert_eq!(updates.len(), 3);

    let variants: Vec<&str> = updates.iter().map(|r| r.variant.as_str()).collect();
    assert_eq!(variants, vec!["Mod", "Mod-Lite", "Universal"]);

    let ids: Vec<&str> = updates.iter().map(|r| r.tracking_id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "spotify_music_mod",
            "spotify_music_mod-lite",
            "spotify_music_universal"
        ]
    );
}

#[test]
fn test_tracking_id_stable_across_version_bumps() {
    let old_markup = farsroid_page(
        "دانلود Spotify Music v1.2.3",
        &[(
            "https://dl.farsroid.com/Spotify-Music-1.2.3-Mod.apk",
            "دانلود نسخه مود 1.2.3",
        )],
    );
    let new_markup = farsroid_page(
        "دانلود Spotify Music v1.3.0",
        &[(
            "https://dl.farsroid.com/Spotify-Music-1.3.0-Mod.apk",
            "دانلود نسخه مود 1.3.0",
        )],
    );

    let empty = TrackerSnapshot::new();
    let old_updates = scan_page(&old_markup, &page_url(), &empty);
    let new_updates = scan_page(&new_markup, &page_url(), &empty);

    assert_eq!(old_updates.len(), 1);
    assert_eq!(new_updates.len(), 1);
    assert_eq!(
        old_updates[0].tracking_id, new_updates[0].tracking_id,
        "tracking id must be version-independent"
    );
    assert!(
        !old_updates[0].tracking_id.contains("1.2.3"),
        "tracking id must not embed the version"
    );
}

#[test]
fn test_second_run_with_merged_snapshot_reports_nothing() {
    let markup = farsroid_page(
        "دانلود Spotify Music v8.9.0",
        &[
            (
                "https://dl.farsroid.com/Spotify-Music-8.9.0-Mod.apk",
                "دانلود نسخه مود 8.9.0",
            ),
            (
                "https://dl.farsroid.com/Spotify-Music-8.9.0.apk",
                "دانلود نسخه اصلی 8.9.0",
            ),
        ],
    );

    let first_run = scan_page(&markup, &page_url(), &TrackerSnapshot::new());
    assert_eq!(first_run.len(), 2);

    let next_snapshot = TrackerSnapshot::new().merged(
        first_run
            .iter()
            .map(|r| (r.tracking_id.as_str(), r.current_version_for_tracking.as_str())),
    );
    assert_eq!(next_snapshot.len(), 2);

    let second_run = scan_page(&markup, &page_url(), &next_snapshot);
    assert!(
        second_run.is_empty(),
        "unchanged page must report nothing on the next run"
    );
}

#[test]
fn test_version_bump_detected_against_merged_snapshot() {
    let old_markup = farsroid_page(
        "دانلود Spotify Music v8.9.0",
        &[(
            "https://dl.farsroid.com/Spotify-Music-8.9.0-Mod.apk",
            "دانلود نسخه مود 8.9.0",
        )],
    );
    let first_run = scan_page(&old_markup, &page_url(), &TrackerSnapshot::new());
    let snapshot = TrackerSnapshot::new().merged(
        first_run
            .iter()
            .map(|r| (r.tracking_id.as_str(), r.current_version_for_tracking.as_str())),
    );

    let new_markup = farsroid_page(
        "دانلود Spotify Music v9.0.0",
        &[(
            "https://dl.farsroid.com/Spotify-Music-9.0.0-Mod.apk",
            "دانلود نسخه مود 9.0.0",
        )],
    );
    let second_run = scan_page(&new_markup, &page_url(), &snapshot);

    assert_eq!(second_run.len(), 1);
    assert_eq!(second_run[0].version, "9.0.0");
    assert_eq!(second_run[0].tracking_id, first_run[0].tracking_id);
}

#[test]
fn test_variant_classification_end_to_end() {
    let markup = farsroid_page(
        "دانلود Cool Game v2.0.0",
        &[(
            "https://dl.farsroid.com/app-mod-extra-arm64-v8a-2.0.0.apk",
            "دانلود نسخه مود اکسترا 2.0.0",
        )],
    );

    let updates = scan_page(&markup, &page_url(), &TrackerSnapshot::new());
    assert_eq!(updates.len(), 1);
    assert_eq!(
        updates[0].variant, "Arm64-v8a-Mod-Extra",
        "tags must join alphabetically"
    );
}

#[test]
fn test_classification_invariant_to_keyword_order() {
    let forward = farsroid_page(
        "دانلود App v1.0.0",
        &[(
            "https://dl.farsroid.com/app-1.0.0.apk",
            "دانلود مود اکسترا arm64 نسخه 1.0.0",
        )],
    );
    let reversed = farsroid_page(
        "دانلود App v1.0.0",
        &[(
            "https://dl.farsroid.com/app-1.0.0.apk",
            "دانلود arm64 نسخه مود اکسترا 1.0.0",
        )],
    );

    let empty = TrackerSnapshot::new();
    let from_forward = scan_page(&forward, &page_url(), &empty);
    let from_reversed = scan_page(&reversed, &page_url(), &empty);

    assert_eq!(from_forward[0].variant, from_reversed[0].variant);
    assert_eq!(from_forward[0].tracking_id, from_reversed[0].tracking_id);
}

#[test]
fn test_mixed_page_with_data_archive_and_versionless_link() {
    let markup = farsroid_page(
        "دانلود Cool Game v2.0.0",
        &[
            (
                "https://dl.farsroid.com/Cool-Game-2.0.0.apk",
                "دانلود نسخه اصلی 2.0.0",
            ),
            (
                "https://dl.farsroid.com/Cool-Game-Data-2.0.0.zip",
                "دانلود دیتا 2.0.0",
            ),
            ("https://dl.farsroid.com/install-guide.apk", "راهنمای نصب"),
        ],
    );

    let updates = scan_page(&markup, &page_url(), &TrackerSnapshot::new());

    assert_eq!(updates.len(), 2, "versionless link contributes no record");
    assert_eq!(updates[0].variant, "Universal");
    assert!(updates[0].suggested_filename.ends_with(".apk"));
    assert_eq!(updates[1].variant, "Data");
    assert!(updates[1].suggested_filename.ends_with(".zip"));
    assert_ne!(updates[0].tracking_id, updates[1].tracking_id);
}

#[test]
fn test_suggested_filename_embeds_version_not_tracking_id() {
    let markup = farsroid_page(
        "دانلود Spotify Music v8.9.0",
        &[(
            "https://dl.farsroid.com/Spotify-Music-8.9.0-Mod.apk",
            "دانلود نسخه مود 8.9.0",
        )],
    );

    let updates = scan_page(&markup, &page_url(), &TrackerSnapshot::new());
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].suggested_filename, "spotify_music_v8_9_0_mod.apk");
}

#[tokio::test]
async fn test_fetch_then_scan_through_the_fetcher_seam() {
    let url = page_url();
    let markup = farsroid_page(
        "دانلود Spotify Music v8.9.0",
        &[(
            "https://dl.farsroid.com/Spotify-Music-8.9.0-Mod.apk",
            "دانلود نسخه مود 8.9.0",
        )],
    );
    let fetcher = StaticFetcher::new().with_page(url.as_str(), &markup);

    let fetched = fetcher
        .fetch(url.as_str(), DOWNLOAD_BOX_CLASS, DEFAULT_MARKER_TIMEOUT)
        .await
        .unwrap();
    let updates = scan_page(&fetched, &url, &TrackerSnapshot::new());

    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].tracking_id, "spotify_music_mod");
}

#[test]
fn test_empty_markup_contributes_nothing() {
    let updates = scan_page("", &page_url(), &TrackerSnapshot::new());
    assert!(updates.is_empty());

    let updates = scan_page("<html><body></body></html>", &page_url(), &TrackerSnapshot::new());
    assert!(updates.is_empty());
}
