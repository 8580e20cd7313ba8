//! Integration tests for the subscription graph: users, feeds, follows,
//! and the browse query that hangs off them.
//!
//! Each test creates its own in-memory SQLite database for isolation.

use creel::storage::{Database, NewPost, StoreError};
use pretty_assertions::assert_eq;

async fn test_db() -> Database {
    Database::open(":memory:").await.unwrap()
}

// ============================================================================
// Users
// ============================================================================

#[tokio::test]
async fn duplicate_user_name_is_a_unique_violation() {
    let db = test_db().await;
    db.create_user("ada").await.unwrap();

    assert!(matches!(
        db.create_user("ada").await.unwrap_err(),
        StoreError::UniqueViolation
    ));
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let db = test_db().await;
    assert!(matches!(
        db.user_by_name("nobody").await.unwrap_err(),
        StoreError::NotFound
    ));
}

#[tokio::test]
async fn users_list_in_registration_order() {
    let db = test_db().await;
    db.create_user("ada").await.unwrap();
    db.create_user("brian").await.unwrap();

    let names: Vec<String> = db
        .list_users()
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.name)
        .collect();
    assert_eq!(names, vec!["ada".to_string(), "brian".to_string()]);
}

// ============================================================================
// Feeds
// ============================================================================

#[tokio::test]
async fn duplicate_feed_url_is_a_unique_violation() {
    let db = test_db().await;
    let ada = db.create_user("ada").await.unwrap();
    let brian = db.create_user("brian").await.unwrap();

    db.create_feed("Ada's pick", "https://example.com/rss", ada.id)
        .await
        .unwrap();
    // Same URL under a different name and owner still conflicts
    assert!(matches!(
        db.create_feed("Brian's pick", "https://example.com/rss", brian.id)
            .await
            .unwrap_err(),
        StoreError::UniqueViolation
    ));
}

#[tokio::test]
async fn feeds_list_includes_owner_names() {
    let db = test_db().await;
    let ada = db.create_user("ada").await.unwrap();
    db.create_feed("Example", "https://example.com/rss", ada.id)
        .await
        .unwrap();

    let feeds = db.list_feeds().await.unwrap();
    assert_eq!(feeds.len(), 1);
    assert_eq!(feeds[0].name, "Example");
    assert_eq!(feeds[0].owner, "ada");
}

// ============================================================================
// Follows
// ============================================================================

#[tokio::test]
async fn following_twice_never_creates_two_rows() {
    let db = test_db().await;
    let ada = db.create_user("ada").await.unwrap();
    let feed = db
        .create_feed("Example", "https://example.com/rss", ada.id)
        .await
        .unwrap();

    db.create_feed_follow(ada.id, feed.id).await.unwrap();
    assert!(matches!(
        db.create_feed_follow(ada.id, feed.id).await.unwrap_err(),
        StoreError::UniqueViolation
    ));

    let follows = db.feed_follows_for_user(ada.id).await.unwrap();
    assert_eq!(follows.len(), 1);
}

#[tokio::test]
async fn two_users_can_follow_the_same_feed() {
    let db = test_db().await;
    let ada = db.create_user("ada").await.unwrap();
    let brian = db.create_user("brian").await.unwrap();
    let feed = db
        .create_feed("Example", "https://example.com/rss", ada.id)
        .await
        .unwrap();

    db.create_feed_follow(ada.id, feed.id).await.unwrap();
    db.create_feed_follow(brian.id, feed.id).await.unwrap();

    assert_eq!(db.feed_follows_for_user(ada.id).await.unwrap().len(), 1);
    assert_eq!(db.feed_follows_for_user(brian.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn followed_feeds_are_joined_for_display() {
    let db = test_db().await;
    let ada = db.create_user("ada").await.unwrap();
    let feed = db
        .create_feed("Example", "https://example.com/rss", ada.id)
        .await
        .unwrap();
    db.create_feed_follow(ada.id, feed.id).await.unwrap();

    let follows = db.feed_follows_for_user(ada.id).await.unwrap();
    assert_eq!(follows[0].feed_name, "Example");
    assert_eq!(follows[0].feed_url, "https://example.com/rss");
    assert_eq!(follows[0].feed_id, feed.id);
}

#[tokio::test]
async fn unfollow_removes_the_edge() {
    let db = test_db().await;
    let ada = db.create_user("ada").await.unwrap();
    let feed = db
        .create_feed("Example", "https://example.com/rss", ada.id)
        .await
        .unwrap();
    db.create_feed_follow(ada.id, feed.id).await.unwrap();

    db.delete_feed_follow(ada.id, "https://example.com/rss")
        .await
        .unwrap();
    assert!(db.feed_follows_for_user(ada.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn unfollowing_an_unfollowed_feed_is_not_found() {
    let db = test_db().await;
    let ada = db.create_user("ada").await.unwrap();
    db.create_feed("Example", "https://example.com/rss", ada.id)
        .await
        .unwrap();

    assert!(matches!(
        db.delete_feed_follow(ada.id, "https://example.com/rss")
            .await
            .unwrap_err(),
        StoreError::NotFound
    ));
    assert!(matches!(
        db.delete_feed_follow(ada.id, "https://unknown.example.com")
            .await
            .unwrap_err(),
        StoreError::NotFound
    ));
}

// ============================================================================
// Browse
// ============================================================================

#[tokio::test]
async fn browse_sees_only_followed_feeds_newest_first() {
    let db = test_db().await;
    let ada = db.create_user("ada").await.unwrap();
    let followed = db
        .create_feed("Followed", "https://a.example.com/rss", ada.id)
        .await
        .unwrap();
    let ignored = db
        .create_feed("Ignored", "https://b.example.com/rss", ada.id)
        .await
        .unwrap();
    db.create_feed_follow(ada.id, followed.id).await.unwrap();

    for (feed_id, title, published_at) in [
        (followed.id, "old", 1_000),
        (followed.id, "new", 3_000),
        (ignored.id, "unseen", 2_000),
    ] {
        db.create_post(NewPost {
            feed_id,
            title,
            url: &format!("https://example.com/{title}"),
            description: "",
            published_at,
        })
        .await
        .unwrap();
    }

    let posts = db.posts_for_user(ada.id, 10).await.unwrap();
    let titles: Vec<&str> = posts.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["new", "old"]);

    let limited = db.posts_for_user(ada.id, 1).await.unwrap();
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].title, "new");
}
