//! Page scanning: harvest download links and build release records.
//!
//! The scanner understands one known page layout: a `section.downloadbox`
//! containing a `ul.download-links` of `li.download-link` items, each with
//! an `a.download-btn` anchor whose `span.txt` carries the human label. Per
//! link it drives version extraction, variant classification, and record
//! construction, then keeps only the records that are genuine updates
//! relative to the tracker snapshot.
//!
//! The scan itself is a pure function of (markup, page URL, prior snapshot);
//! all per-link failures are isolated to the link and logged.

mod record;

pub use record::{ReleaseRecord, suggested_filename, tracking_id};

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::identity::resolve_app_name;
use crate::tracker::TrackerSnapshot;
use crate::variant::{ArtifactKind, classify};
use crate::version::{extract_version, is_update};

/// Class of the section the release site injects download links into. Also
/// the readiness marker the fetcher waits for.
pub const DOWNLOAD_BOX_CLASS: &str = "downloadbox";

/// Host the page layout heuristics are written for.
pub const KNOWN_HOST: &str = "farsroid.com";

/// Returns true when the page URL belongs to the site whose layout the
/// scanner understands. Other sites are skipped rather than mis-scanned.
#[must_use]
pub fn is_known_layout(page_url: &Url) -> bool {
    page_url
        .host_str()
        .is_some_and(|host| host == KNOWN_HOST || host.ends_with(".farsroid.com"))
}

/// Scans one page's markup and returns the release records that are updates
/// relative to `tracker`.
///
/// A missing download box, link list, or link items yields an empty result
/// (logged); a link without a resolvable URL or an extractable version is
/// skipped. Nothing in here errors out the page.
#[must_use]
#[instrument(skip(markup, tracker), fields(page = %page_url))]
pub fn scan_page(markup: &str, page_url: &Url, tracker: &TrackerSnapshot) -> Vec<ReleaseRecord> {
    let document = Html::parse_document(markup);

    let Some(anchors) = harvest_anchors(&document) else {
        return Vec::new();
    };

    let display_app_name = resolve_app_name(&document, page_url);
    debug!(app = %display_app_name, links = anchors.len(), "scanning download links");

    let mut updates = Vec::new();
    for anchor in anchors {
        let Some(built) = build_link_record(anchor, &display_app_name, page_url) else {
            continue;
        };

        let last_known = tracker.last_seen(&built.tracking_id);
        if is_update(&built.version, last_known) {
            info!(
                tracking_id = %built.tracking_id,
                version = %built.version,
                previous = last_known.unwrap_or("none"),
                "update detected"
            );
            updates.push(built);
        } else {
            debug!(
                tracking_id = %built.tracking_id,
                version = %built.version,
                "already up to date"
            );
        }
    }

    updates
}

/// Finds the download-box anchors in the known layout, or `None` when any
/// layer of the structure is missing.
fn harvest_anchors(document: &Html) -> Option<Vec<ElementRef<'_>>> {
    let box_selector = Selector::parse("section.downloadbox").ok()?;
    let list_selector = Selector::parse("ul.download-links").ok()?;
    let item_selector = Selector::parse("li.download-link").ok()?;
    let anchor_selector = Selector::parse("a.download-btn").ok()?;

    let Some(download_box) = document.select(&box_selector).next() else {
        warn!("download box not found on page");
        return None;
    };
    let Some(link_list) = download_box.select(&list_selector).next() else {
        warn!("download link list not found inside download box");
        return None;
    };

    let anchors: Vec<ElementRef<'_>> = link_list
        .select(&item_selector)
        .filter_map(|item| item.select(&anchor_selector).next())
        .collect();

    if anchors.is_empty() {
        warn!("no download-link items found in link list");
        return None;
    }

    Some(anchors)
}

/// Builds a record for one anchor, or `None` when the link is unusable
/// (no href, unresolvable URL, no extractable version).
fn build_link_record(
    anchor: ElementRef<'_>,
    display_app_name: &str,
    page_url: &Url,
) -> Option<ReleaseRecord> {
    let Some(href) = anchor.value().attr("href") else {
        warn!("download anchor has no href, skipping");
        return None;
    };

    let download_url = match page_url.join(href) {
        Ok(resolved) => resolved,
        Err(error) => {
            warn!(%error, href = %href, "download link does not resolve, skipping");
            return None;
        }
    };

    let link_text = anchor_label(anchor);
    let filename = filename_from_url(&download_url);
    debug!(url = %download_url, text = %link_text, file = %filename, "processing download link");

    let Some(version) = extract_version(&link_text, &filename) else {
        warn!(
            url = %download_url,
            text = %link_text,
            "no version token in link text or filename, skipping"
        );
        return None;
    };

    let kind = ArtifactKind::from_download_url(download_url.as_str());
    let variant = classify(&link_text, &filename, kind);
    debug!(version = %version, variant = %variant, "link classified");

    Some(ReleaseRecord::build(
        display_app_name,
        &version,
        &variant,
        kind,
        &download_url,
        page_url,
    ))
}

/// The anchor's human label from its `span.txt`, empty when absent.
fn anchor_label(anchor: ElementRef<'_>) -> String {
    let Ok(label_selector) = Selector::parse("span.txt") else {
        return String::new();
    };
    anchor
        .select(&label_selector)
        .next()
        .map(|span| span.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Percent-decoded last path segment of a download URL.
fn filename_from_url(download_url: &Url) -> String {
    let last_segment = download_url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or("");
    urlencoding::decode(last_segment)
        .map(std::borrow::Cow::into_owned)
        .unwrap_or_else(|_| last_segment.to_string())
}
