//! Post ingestion: fetched items become persisted posts.

use crate::storage::{Database, NewPost, StoreError};

use super::dates;
use super::parser::RssItem;

/// Outcome of ingesting one feed's item list.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestSummary {
    /// New posts written
    pub inserted: usize,
    /// Items already present (same feed and URL), left untouched
    pub duplicates: usize,
    /// Items dropped for a per-item failure (bad date, store error)
    pub skipped: usize,
}

/// Persist the items of one fetched feed, in document order.
///
/// Items are fully independent: a bad publication date or a store failure
/// skips that item only, and a duplicate URL counts as success. Running
/// the same batch twice therefore yields the same post set as running it
/// once. Never fails as a whole — the summary is the result.
pub async fn ingest_items(db: &Database, feed_id: i64, items: &[RssItem]) -> IngestSummary {
    let mut summary = IngestSummary::default();

    for item in items {
        let published_at = match dates::parse_published_at(&item.pub_date) {
            Ok(parsed) => parsed.timestamp(),
            Err(e) => {
                tracing::warn!(feed_id, title = %item.title, error = %e, "skipping item");
                summary.skipped += 1;
                continue;
            }
        };

        let post = NewPost {
            feed_id,
            title: &item.title,
            url: &item.link,
            description: &item.description,
            published_at,
        };
        match db.create_post(post).await {
            Ok(_) => summary.inserted += 1,
            Err(StoreError::UniqueViolation) => summary.duplicates += 1,
            Err(e) => {
                tracing::warn!(feed_id, url = %item.link, error = %e, "failed to store post");
                summary.skipped += 1;
            }
        }
    }

    summary
}
