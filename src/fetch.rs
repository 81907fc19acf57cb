//! HTTP page fetching with outcome classification and bounded retries.
//!
//! The newspaper archive is served from a single origin that fails in
//! a few well-understood ways: a 404 for a page that was never
//! published, transient 5xx responses, and plain timeouts. This module
//! folds all of those into one contract — [`PageFetcher::fetch`]
//! returns `Some(text)` or `None`, never an error — so the crawl loop
//! needs no failure-specific handling.
//!
//! # Retry Strategy
//!
//! Transient failures (5xx, timeout, connection reset) are retried in
//! a bounded loop with an explicit attempt counter and a fixed,
//! configurable inter-attempt delay. A 404 and any other 4xx give up
//! immediately: the resource genuinely does not exist for that date.
//!
//! # Decoding
//!
//! Older issues were served as GB2312/GBK and the `Content-Type`
//! header does not always carry a charset, so the body is decoded from
//! the declared charset when present and otherwise sniffed from the
//! bytes.

use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, instrument, warn};

/// Why a single fetch attempt failed.
///
/// Only [`FetchError::Server`] and [`FetchError::Transport`] are worth
/// retrying; the rest are definitive for the URL.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP 404: the issue/page/article does not exist for that date.
    #[error("resource not found (404)")]
    NotFound,
    /// Any other 4xx response.
    #[error("client error: {0}")]
    Client(StatusCode),
    /// A 5xx response, assumed transient.
    #[error("server error: {0}")]
    Server(StatusCode),
    /// Timeout, connection failure, or body read failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl FetchError {
    fn is_retryable(&self) -> bool {
        matches!(self, FetchError::Server(_) | FetchError::Transport(_))
    }
}

/// Blocking-style page fetcher with fixed headers, a fixed timeout,
/// and a bounded retry budget.
///
/// One fetch is in flight at a time; the crawl is strictly sequential.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    max_attempts: usize,
    retry_delay: Duration,
}

impl PageFetcher {
    /// Build a fetcher.
    ///
    /// # Arguments
    ///
    /// * `timeout` - Per-request timeout (covers connect and body read)
    /// * `max_attempts` - Total attempts per URL before giving up (>= 1)
    /// * `retry_delay` - Fixed delay between attempts; may be zero
    pub fn new(
        timeout: Duration,
        max_attempts: usize,
        retry_delay: Duration,
    ) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,image/apng,*/*;q=0.8",
            ),
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(
                "Mozilla/5.0 (Windows NT 10.0; WOW64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/68.0.3440.106 Safari/537.36",
            ),
        );
        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            max_attempts: max_attempts.max(1),
            retry_delay,
        })
    }

    /// Fetch a URL and return its decoded body text.
    ///
    /// Returns `None` after a 404, any other client error, or once the
    /// retry budget for transient failures is exhausted. No error ever
    /// escapes this method.
    #[instrument(level = "debug", skip(self))]
    pub async fn fetch(&self, url: &str) -> Option<String> {
        let mut attempt = 0usize;
        loop {
            attempt += 1;
            match self.try_fetch(url).await {
                Ok(text) => return Some(text),
                Err(e) if e.is_retryable() && attempt < self.max_attempts => {
                    warn!(
                        %url,
                        attempt,
                        max = self.max_attempts,
                        error = %e,
                        "fetch failed; retrying"
                    );
                    if !self.retry_delay.is_zero() {
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
                Err(FetchError::NotFound) => {
                    debug!(%url, "page does not exist");
                    return None;
                }
                Err(e) => {
                    error!(%url, attempt, error = %e, "fetch failed; giving up");
                    return None;
                }
            }
        }
    }

    /// One GET attempt, classified.
    async fn try_fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound);
        }
        if status.is_server_error() {
            return Err(FetchError::Server(status));
        }
        if !status.is_success() {
            return Err(FetchError::Client(status));
        }

        let declared_charset = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(charset_from_content_type);
        let bytes = response.bytes().await?;
        Ok(decode_body(&bytes, declared_charset.as_deref()))
    }
}

/// Pull the charset label out of a `Content-Type` header value.
fn charset_from_content_type(value: &str) -> Option<String> {
    value
        .split(';')
        .filter_map(|part| part.trim().strip_prefix("charset="))
        .map(|label| label.trim_matches('"').to_string())
        .next()
}

/// Decode response bytes into text.
///
/// Uses the server-declared charset when it names a known encoding;
/// otherwise sniffs the encoding from the bytes. Undecodable byte
/// sequences become replacement characters rather than failures.
fn decode_body(bytes: &[u8], declared_charset: Option<&str>) -> String {
    let encoding = declared_charset
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or_else(|| {
            let mut detector = EncodingDetector::new();
            detector.feed(bytes, true);
            detector.guess(None, true)
        });
    let (text, _, _) = encoding.decode(bytes);
    text.into_owned()
}
