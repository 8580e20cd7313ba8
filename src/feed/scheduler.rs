//! The fetch scheduler: a single periodic loop that refreshes the stalest
//! feed once per tick.
//!
//! Failures never stop the loop. A feed that errors is already marked
//! fetched (the mark happens before the network call), so it rotates to
//! the back of the staleness queue instead of being retried ahead of its
//! peers; the next natural turn is the retry policy.

use std::time::Duration;

use chrono::Utc;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::storage::{Database, StoreError};

use super::fetcher::{FeedSource, FetchError};
use super::ingest::{self, IngestSummary};

/// Floor for the tick interval; requests below this are clamped.
pub const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Why one scheduling cycle produced no ingestion.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The feed table is empty — nothing to schedule.
    #[error("no feeds registered to fetch")]
    NoFeed,
    /// The store failed during selection or marking.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The fetch or decode of the selected feed failed.
    #[error("fetching {url} failed: {source}")]
    Fetch { url: String, source: FetchError },
}

/// What one successful cycle did.
#[derive(Debug)]
pub struct CycleOutcome {
    pub feed_url: String,
    pub summary: IngestSummary,
}

/// Clamp a requested interval to the floor, warning when it was too short.
pub fn effective_interval(requested: Duration) -> Duration {
    if requested < MIN_INTERVAL {
        tracing::warn!(
            requested_ms = requested.as_millis() as u64,
            floor_secs = MIN_INTERVAL.as_secs(),
            "requested interval is below the floor, clamping"
        );
        MIN_INTERVAL
    } else {
        requested
    }
}

/// Run the scheduler until a shutdown message (or sender drop) arrives.
///
/// The first cycle runs immediately; later ones follow the clamped
/// interval. Shutdown is honored both between ticks and mid-fetch —
/// aborting an in-flight cycle is safe because the optimistic mark is
/// already durable and posts commit one item at a time.
pub async fn run<S: FeedSource>(
    db: Database,
    source: S,
    requested: Duration,
    mut shutdown: mpsc::Receiver<()>,
) {
    let interval = effective_interval(requested);
    tracing::info!(interval_secs = interval.as_secs(), "collecting feeds");

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                tokio::select! {
                    outcome = run_once(&db, &source) => report(outcome),
                    _ = shutdown.recv() => break,
                }
            }
            _ = shutdown.recv() => break,
        }
    }

    tracing::info!("feed scheduler stopped");
}

/// One scheduling cycle: select the stalest feed, mark it fetched, then
/// fetch and ingest it.
///
/// The mark happens before the network call, so a slow or failing feed
/// does not get retried ahead of its peers on the next tick.
pub async fn run_once<S: FeedSource>(
    db: &Database,
    source: &S,
) -> Result<CycleOutcome, ScrapeError> {
    let feed = match db.next_feed_to_fetch().await {
        Ok(feed) => feed,
        Err(StoreError::NotFound) => return Err(ScrapeError::NoFeed),
        Err(e) => return Err(ScrapeError::Store(e)),
    };

    tracing::debug!(feed = %feed.url, "fetching feed");
    db.mark_feed_fetched(feed.id, Utc::now().timestamp()).await?;

    let channel = source
        .fetch(&feed.url)
        .await
        .map_err(|source| ScrapeError::Fetch {
            url: feed.url.clone(),
            source,
        })?;

    let summary = ingest::ingest_items(db, feed.id, &channel.items).await;
    Ok(CycleOutcome {
        feed_url: feed.url,
        summary,
    })
}

fn report(outcome: Result<CycleOutcome, ScrapeError>) {
    match outcome {
        Ok(cycle) => tracing::info!(
            feed = %cycle.feed_url,
            inserted = cycle.summary.inserted,
            duplicates = cycle.summary.duplicates,
            skipped = cycle.summary.skipped,
            "feed scraped"
        ),
        Err(ScrapeError::NoFeed) => tracing::warn!("no feeds registered, nothing to fetch"),
        Err(e) => tracing::error!(error = %e, "feed scrape failed"),
    }
}
