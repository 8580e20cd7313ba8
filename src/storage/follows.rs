use chrono::Utc;

use super::schema::Database;
use super::types::{FeedFollow, FollowedFeed, StoreError};

impl Database {
    // ========================================================================
    // Follow Operations
    // ========================================================================

    /// Create the follow edge between a user and a feed.
    ///
    /// The (user, feed) pair is unique; following twice surfaces as
    /// `StoreError::UniqueViolation` rather than a second row.
    pub async fn create_feed_follow(
        &self,
        user_id: i64,
        feed_id: i64,
    ) -> Result<FeedFollow, StoreError> {
        sqlx::query_as::<_, FeedFollow>(
            r#"
            INSERT INTO feed_follows (created_at, user_id, feed_id)
            VALUES (?, ?, ?)
            RETURNING id, created_at, user_id, feed_id
        "#,
        )
        .bind(Utc::now().timestamp())
        .bind(user_id)
        .bind(feed_id)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)
    }

    /// Delete the follow edge identified by user and feed URL.
    ///
    /// Deleting an edge that does not exist yields `StoreError::NotFound`.
    pub async fn delete_feed_follow(&self, user_id: i64, url: &str) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            DELETE FROM feed_follows
            WHERE user_id = ?
              AND feed_id IN (SELECT id FROM feeds WHERE url = ?)
        "#,
        )
        .bind(user_id)
        .bind(url)
        .execute(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    /// The feeds a user follows, joined for display, oldest follow first.
    pub async fn feed_follows_for_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<FollowedFeed>, StoreError> {
        sqlx::query_as::<_, FollowedFeed>(
            r#"
            SELECT
                ff.id AS follow_id,
                f.id AS feed_id,
                f.name AS feed_name,
                f.url AS feed_url,
                ff.created_at AS followed_at
            FROM feed_follows ff
            JOIN feeds f ON f.id = ff.feed_id
            WHERE ff.user_id = ?
            ORDER BY ff.id
        "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)
    }
}
