//! Page fetching with readiness-marker polling.
//!
//! The release site injects its download box client-side, so a markup
//! snapshot taken too early is missing the one section the scanner needs.
//! [`HttpFetcher`] polls the page until the marker class shows up in the
//! markup, with exponential backoff and jitter between attempts. When the
//! marker never appears the last retrieved markup is returned anyway and the
//! scanner reports the missing box itself.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Default per-request timeout for the marker wait.
pub const DEFAULT_MARKER_TIMEOUT: Duration = Duration::from_secs(20);

/// Default number of fetch attempts per page.
pub const DEFAULT_FETCH_ATTEMPTS: u32 = 3;

/// Base delay for exponential backoff between attempts.
const BASE_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Cap on the exponential backoff delay.
const MAX_RETRY_DELAY: Duration = Duration::from_secs(16);

/// Maximum jitter added to each backoff delay.
const MAX_JITTER_MS: u64 = 500;

/// Browser-like User-Agent; the release site serves a reduced page to
/// clients that do not look like a browser.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/98.0.4758.102 Safari/537.36";

/// Errors that can occur while fetching a page.
///
/// All of them are non-fatal to a run: the page is skipped and contributes
/// zero records.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Building the HTTP client failed.
    #[error("failed to construct HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The request itself failed (connect, timeout, body read).
    #[error("request for {url} failed: {source}")]
    Request {
        /// The page URL.
        url: String,
        /// Underlying transport failure.
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("{url} answered HTTP {status}")]
    HttpStatus {
        /// The page URL.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// No markup is available for the URL (canned fetcher miss, or an
    /// exhausted attempt budget with no response at all).
    #[error("no markup available for {url}")]
    PageUnavailable {
        /// The page URL.
        url: String,
    },
}

/// Retrieves rendered page markup.
///
/// `marker_class` names the CSS class whose presence signals that the
/// dynamic content has loaded; `timeout` bounds each underlying request.
/// Retry and wait policy are internal to the implementation.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches the page at `url`, waiting for `marker_class` to appear.
    async fn fetch(
        &self,
        url: &str,
        marker_class: &str,
        timeout: Duration,
    ) -> Result<String, FetchError>;
}

/// HTTP implementation of [`PageFetcher`] on a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    max_attempts: u32,
}

impl HttpFetcher {
    /// Creates a fetcher that makes up to `max_attempts` requests per page
    /// (clamped to at least one).
    pub fn new(max_attempts: u32) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .gzip(true)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            max_attempts: max_attempts.max(1),
        })
    }

    async fn request_page(&self, url: &str, timeout: Duration) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    #[instrument(skip(self), fields(url = %url, marker = %marker_class))]
    async fn fetch(
        &self,
        url: &str,
        marker_class: &str,
        timeout: Duration,
    ) -> Result<String, FetchError> {
        let mut last_markup: Option<String> = None;
        let mut last_error: Option<FetchError> = None;

        for attempt in 1..=self.max_attempts {
            match self.request_page(url, timeout).await {
                Ok(markup) => {
                    if markup.contains(marker_class) {
                        debug!(attempt, "marker present, page ready");
                        return Ok(markup);
                    }
                    debug!(attempt, "marker not present yet");
                    last_markup = Some(markup);
                }
                Err(error) => {
                    warn!(attempt, %error, "fetch attempt failed");
                    last_error = Some(error);
                }
            }

            if attempt < self.max_attempts {
                tokio::time::sleep(retry_delay(attempt)).await;
            }
        }

        // A page that loaded but never showed the marker is still handed to
        // the scanner, which logs the missing download box itself.
        if let Some(markup) = last_markup {
            warn!(attempts = self.max_attempts, "marker never appeared, using last markup");
            return Ok(markup);
        }

        Err(last_error.unwrap_or_else(|| FetchError::PageUnavailable {
            url: url.to_string(),
        }))
    }
}

/// Exponential backoff with jitter: `base * 2^(attempt-1)` capped, plus up
/// to [`MAX_JITTER_MS`] of random jitter.
fn retry_delay(attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1).min(8);
    let backoff = BASE_RETRY_DELAY
        .saturating_mul(2_u32.saturating_pow(exponent))
        .min(MAX_RETRY_DELAY);
    let jitter = Duration::from_millis(rand::thread_rng().gen_range(0..=MAX_JITTER_MS));
    backoff + jitter
}

/// Canned-markup fetcher for tests and offline runs.
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    pages: HashMap<String, String>,
}

impl StaticFetcher {
    /// Creates an empty fetcher; every fetch fails until pages are added.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers canned markup for a URL.
    #[must_use]
    pub fn with_page(mut self, url: &str, markup: &str) -> Self {
        self.pages.insert(url.to_string(), markup.to_string());
        self
    }
}

#[async_trait]
impl PageFetcher for StaticFetcher {
    async fn fetch(
        &self,
        url: &str,
        _marker_class: &str,
        _timeout: Duration,
    ) -> Result<String, FetchError> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::PageUnavailable {
                url: url.to_string(),
            })
    }
}
