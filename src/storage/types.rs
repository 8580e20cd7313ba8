use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Store errors, folded down to the kinds callers branch on.
///
/// The ingestor depends on `UniqueViolation` being distinguishable from
/// other failures: a duplicate post is a no-op, anything else is a skip.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write (duplicate user name,
    /// feed URL, follow pair, or post URL).
    #[error("record already exists")]
    UniqueViolation,

    /// The requested row does not exist.
    #[error("record not found")]
    NotFound,

    /// Any other database failure.
    #[error("database error: {0}")]
    Other(#[from] sqlx::Error),
}

impl StoreError {
    /// Classify a sqlx error into the kinds the rest of the crate handles.
    pub(crate) fn from_sqlx(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::UniqueViolation,
            _ => StoreError::Other(err),
        }
    }
}

// ============================================================================
// Rows
// ============================================================================

/// A registered user. Created once, never mutated.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub created_at: i64,
    pub name: String,
}

/// A subscribable feed, owned by the user who first registered it.
///
/// `last_fetched_at` is None until the scheduler first picks the feed up,
/// and only ever moves forward afterwards.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Feed {
    pub id: i64,
    pub created_at: i64,
    pub name: String,
    pub url: String,
    pub user_id: i64,
    pub last_fetched_at: Option<i64>,
}

/// The subscription edge between a user and a feed.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FeedFollow {
    pub id: i64,
    pub created_at: i64,
    pub user_id: i64,
    pub feed_id: i64,
}

/// A single ingested feed item. Immutable once written; deduplicated on
/// (feed_id, url).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub created_at: i64,
    pub feed_id: i64,
    pub title: String,
    pub url: String,
    pub description: String,
    pub published_at: i64,
}

/// Feed joined with its owner's name, for listing.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FeedWithOwner {
    pub name: String,
    pub url: String,
    pub owner: String,
}

/// Follow edge joined with the followed feed, for listing.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FollowedFeed {
    pub follow_id: i64,
    pub feed_id: i64,
    pub feed_name: String,
    pub feed_url: String,
    pub followed_at: i64,
}

/// Parameters for inserting one post.
#[derive(Debug, Clone, Copy)]
pub struct NewPost<'a> {
    pub feed_id: i64,
    pub title: &'a str,
    pub url: &'a str,
    pub description: &'a str,
    pub published_at: i64,
}
