use chrono::Utc;

use super::schema::Database;
use super::types::{Feed, FeedWithOwner, StoreError};

const FEED_COLUMNS: &str = "id, created_at, name, url, user_id, last_fetched_at";

impl Database {
    // ========================================================================
    // Feed Operations
    // ========================================================================

    /// Register a feed. URLs are globally unique; registering the same URL
    /// twice surfaces as `StoreError::UniqueViolation`.
    pub async fn create_feed(
        &self,
        name: &str,
        url: &str,
        user_id: i64,
    ) -> Result<Feed, StoreError> {
        sqlx::query_as::<_, Feed>(&format!(
            r#"
            INSERT INTO feeds (created_at, name, url, user_id)
            VALUES (?, ?, ?, ?)
            RETURNING {FEED_COLUMNS}
        "#
        ))
        .bind(Utc::now().timestamp())
        .bind(name)
        .bind(url)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)
    }

    /// Look up a feed by its source URL.
    pub async fn feed_by_url(&self, url: &str) -> Result<Feed, StoreError> {
        sqlx::query_as::<_, Feed>(&format!("SELECT {FEED_COLUMNS} FROM feeds WHERE url = ?"))
            .bind(url)
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)
    }

    /// All feeds with their owners' names, for display.
    pub async fn list_feeds(&self) -> Result<Vec<FeedWithOwner>, StoreError> {
        sqlx::query_as::<_, FeedWithOwner>(
            r#"
            SELECT f.name AS name, f.url AS url, u.name AS owner
            FROM feeds f
            JOIN users u ON u.id = f.user_id
            ORDER BY f.id
        "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)
    }

    /// The feed whose last fetch is oldest, never-fetched feeds first.
    ///
    /// This is the scheduler's round-robin-by-staleness selection; ties
    /// break on id so the order is deterministic. An empty feed table
    /// yields `StoreError::NotFound`.
    pub async fn next_feed_to_fetch(&self) -> Result<Feed, StoreError> {
        sqlx::query_as::<_, Feed>(&format!(
            r#"
            SELECT {FEED_COLUMNS}
            FROM feeds
            ORDER BY last_fetched_at ASC NULLS FIRST, id ASC
            LIMIT 1
        "#
        ))
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)?
        .ok_or(StoreError::NotFound)
    }

    /// Advance a feed's `last_fetched_at` to `fetched_at`.
    ///
    /// The guard keeps the timestamp monotonic, which also makes the update
    /// usable as an atomic claim if fetches are ever parallelized.
    pub async fn mark_feed_fetched(&self, feed_id: i64, fetched_at: i64) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE feeds
            SET last_fetched_at = ?1
            WHERE id = ?2
              AND (last_fetched_at IS NULL OR last_fetched_at <= ?1)
        "#,
        )
        .bind(fetched_at)
        .bind(feed_id)
        .execute(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)?;
        Ok(())
    }
}
