use std::future::Future;
use std::time::Duration;

use futures::StreamExt;
use thiserror::Error;

use super::parser::{self, RssChannel};

/// Client marker sent with every fetch.
pub const USER_AGENT: &str = concat!("creel/", env!("CARGO_PKG_VERSION"));

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_FEED_SIZE: usize = 4 * 1024 * 1024;

/// Errors from retrieving and decoding one feed.
///
/// All of these are per-feed failures: the fetcher returns them to the
/// scheduler, which logs and moves on. No retries happen here — a failed
/// feed gets retried when the staleness ordering surfaces it again.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, timeout)
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Response body exceeded the size limit
    #[error("response body exceeded {} bytes", MAX_FEED_SIZE)]
    ResponseTooLarge,
    /// Body could not be decoded as an RSS document
    #[error("feed decode error: {0}")]
    Decode(#[from] quick_xml::DeError),
}

/// A source of structured feed documents.
///
/// The scheduler and ingestor only ever see this trait, so the pipeline
/// can be driven from synthetic in-memory payloads in tests instead of
/// real network I/O.
pub trait FeedSource: Send + Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<RssChannel, FetchError>> + Send;
}

/// The reqwest-backed source used by the real scheduler.
pub struct HttpFeedSource {
    client: reqwest::Client,
}

impl HttpFeedSource {
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }
}

impl FeedSource for HttpFeedSource {
    async fn fetch(&self, url: &str) -> Result<RssChannel, FetchError> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::HttpStatus(response.status().as_u16()));
        }
        let bytes = read_limited(response, MAX_FEED_SIZE).await?;
        Ok(parser::parse_channel(&bytes)?)
    }
}

/// Read a response body, bailing out once it grows past `limit`.
async fn read_limited(response: reqwest::Response, limit: usize) -> Result<Vec<u8>, FetchError> {
    // Fast path: trust Content-Length when the server sends one
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
