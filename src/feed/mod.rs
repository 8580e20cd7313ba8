//! The feed scraping pipeline.
//!
//! Control flow per scheduler tick: [`scheduler`] selects the stalest
//! feed and marks it fetched, [`fetcher`] retrieves and decodes it via
//! [`parser`], [`dates`] normalizes each item's publication timestamp,
//! and [`ingest`] commits new posts idempotently.

pub mod dates;
pub mod fetcher;
pub mod ingest;
pub mod parser;
pub mod scheduler;

pub use fetcher::{FeedSource, FetchError, HttpFeedSource};
pub use ingest::IngestSummary;
pub use parser::{RssChannel, RssItem};
pub use scheduler::MIN_INTERVAL;
