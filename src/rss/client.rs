//! HTTP retrieval of feed payloads.

use reqwest::header;
use tokio::time::{timeout, Duration};
use tracing::{debug, warn};

use super::types::{Dialect, NormalizedItem, REQUEST_TIMEOUT, USER_AGENT};
use crate::error::{Result, ScrapeError};
use crate::TARGET_WEB_REQUEST;

/// Fetches feed URLs with a hard per-request timeout and hands the body to the
/// dialect decoder. There is no retry here; a failed feed is picked up again
/// on a later scheduler tick.
#[derive(Clone, Debug)]
pub struct FeedClient {
    http: reqwest::Client,
    timeout: Duration,
}

impl FeedClient {
    pub fn new() -> reqwest::Result<Self> {
        Self::with_timeout(REQUEST_TIMEOUT)
    }

    /// Build a client whose requests give up after `timeout`. Fails only if
    /// the TLS backend cannot be initialised.
    pub fn with_timeout(timeout: Duration) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder()
            .gzip(true)
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(Self { http, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Retrieve `url` and decode it as `dialect`.
    pub async fn fetch(&self, url: &str, dialect: Dialect) -> Result<Vec<NormalizedItem>> {
        let body = self.fetch_bytes(url).await?;
        let items = dialect.decode(&body)?;

        debug!(target: TARGET_WEB_REQUEST, "Decoded {} {} items from {}", items.len(), dialect.name(), url);
        Ok(items)
    }

    /// Retrieve the full response body of `url`.
    ///
    /// The request and the body read share a single deadline. The response is
    /// consumed or dropped on every path so the connection goes back to the pool.
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        debug!(target: TARGET_WEB_REQUEST, "Loading feed from {}", url);

        let request = async {
            let response = self
                .http
                .get(url)
                .header(header::USER_AGENT, USER_AGENT)
                .header(
                    header::ACCEPT,
                    "application/rss+xml, application/xml, text/xml, */*;q=0.9",
                )
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Ok::<_, reqwest::Error>(Err(status));
            }

            let bytes = response.bytes().await?;
            Ok(Ok(bytes))
        };

        match timeout(self.timeout, request).await {
            Ok(Ok(Ok(bytes))) => {
                debug!(target: TARGET_WEB_REQUEST, "Received {} bytes from {}", bytes.len(), url);
                Ok(bytes.to_vec())
            }
            Ok(Ok(Err(status))) => {
                warn!(target: TARGET_WEB_REQUEST, "Non-success status {} from {}", status, url);
                Err(ScrapeError::FetchTransport {
                    url: url.to_string(),
                    message: format!("unexpected HTTP status {}", status),
                })
            }
            Ok(Err(err)) if err.is_timeout() => Err(self.timed_out(url)),
            Ok(Err(err)) => Err(ScrapeError::FetchTransport {
                url: url.to_string(),
                message: err.to_string(),
            }),
            Err(_) => Err(self.timed_out(url)),
        }
    }

    fn timed_out(&self, url: &str) -> ScrapeError {
        ScrapeError::FetchTimeout {
            url: url.to_string(),
            timeout: self.timeout,
        }
    }
}
