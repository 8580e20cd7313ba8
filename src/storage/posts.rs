use chrono::Utc;

use super::schema::Database;
use super::types::{NewPost, Post, StoreError};

impl Database {
    // ========================================================================
    // Post Operations
    // ========================================================================

    /// Insert one post. A duplicate (feed, url) pair surfaces as
    /// `StoreError::UniqueViolation`, which the ingestor treats as a no-op.
    pub async fn create_post(&self, post: NewPost<'_>) -> Result<Post, StoreError> {
        sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (created_at, feed_id, title, url, description, published_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id, created_at, feed_id, title, url, description, published_at
        "#,
        )
        .bind(Utc::now().timestamp())
        .bind(post.feed_id)
        .bind(post.title)
        .bind(post.url)
        .bind(post.description)
        .bind(post.published_at)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)
    }

    /// The newest posts from feeds the user follows.
    pub async fn posts_for_user(&self, user_id: i64, limit: i64) -> Result<Vec<Post>, StoreError> {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT p.id, p.created_at, p.feed_id, p.title, p.url, p.description, p.published_at
            FROM posts p
            JOIN feed_follows ff ON ff.feed_id = p.feed_id
            WHERE ff.user_id = ?
            ORDER BY p.published_at DESC, p.id DESC
            LIMIT ?
        "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)
    }
}
