//! Command-line surface: argument definitions and the record-management
//! handlers behind them.
//!
//! Handlers that act on behalf of a user take the resolved [`User`]
//! explicitly; nothing below this layer reads session state.

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::{TimeZone, Utc};
use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::feed::FeedSource;
use crate::storage::{Database, StoreError, User};

#[derive(Parser, Debug)]
#[command(name = "creel", about = "Multi-user RSS aggregator", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new user and log in as them
    Register { name: String },
    /// Switch the session to an existing user
    Login { name: String },
    /// List registered users
    Users,
    /// Register a feed (validating it with one fetch) and follow it
    AddFeed { name: String, url: String },
    /// List every feed with its owner
    Feeds,
    /// Follow a feed by URL, registering it first if nobody has
    Follow { url: String },
    /// List the feeds the current user follows
    Following,
    /// Stop following a feed
    Unfollow { url: String },
    /// Run the feed scheduler, fetching one feed per interval (e.g. "30s", "2m")
    Agg {
        #[arg(value_parser = humantime::parse_duration)]
        interval: Duration,
    },
    /// Show the newest posts from followed feeds
    Browse {
        #[arg(default_value_t = 2)]
        limit: i64,
    },
}

// ============================================================================
// Session
// ============================================================================

/// Resolve the acting user from the session config, once, at the boundary.
pub async fn require_user(db: &Database, config: &Config) -> Result<User> {
    let Some(name) = config.current_user.as_deref() else {
        bail!("no user logged in; run 'creel register <name>' first");
    };
    match db.user_by_name(name).await {
        Ok(user) => Ok(user),
        Err(StoreError::NotFound) => {
            bail!("current user '{name}' no longer exists; run 'creel login <name>'")
        }
        Err(e) => Err(e).context("couldn't resolve current user"),
    }
}

// ============================================================================
// User Commands
// ============================================================================

pub async fn register(
    db: &Database,
    config: &mut Config,
    config_path: &Path,
    name: &str,
) -> Result<()> {
    let user = match db.create_user(name).await {
        Ok(user) => user,
        Err(StoreError::UniqueViolation) => bail!("user '{name}' already exists"),
        Err(e) => return Err(e).context("couldn't register user"),
    };
    config.current_user = Some(user.name.clone());
    config.save(config_path).context("couldn't save config")?;
    println!("User '{}' registered", user.name);
    Ok(())
}

pub async fn login(
    db: &Database,
    config: &mut Config,
    config_path: &Path,
    name: &str,
) -> Result<()> {
    let user = match db.user_by_name(name).await {
        Ok(user) => user,
        Err(StoreError::NotFound) => bail!("user '{name}' does not exist"),
        Err(e) => return Err(e).context("couldn't look up user"),
    };
    config.current_user = Some(user.name.clone());
    config.save(config_path).context("couldn't save config")?;
    println!("Logged in as '{}'", user.name);
    Ok(())
}

pub async fn users(db: &Database, config: &Config) -> Result<()> {
    for user in db.list_users().await? {
        if config.current_user.as_deref() == Some(user.name.as_str()) {
            println!("* {} (current)", user.name);
        } else {
            println!("* {}", user.name);
        }
    }
    Ok(())
}

// ============================================================================
// Feed Commands
// ============================================================================

pub async fn add_feed<S: FeedSource>(
    db: &Database,
    source: &S,
    user: &User,
    name: &str,
    url: &str,
) -> Result<()> {
    // One validating fetch up front, so a typoed URL fails here instead of
    // erroring on every scheduler pass
    source
        .fetch(url)
        .await
        .with_context(|| format!("'{url}' does not look like a reachable feed"))?;

    let feed = match db.create_feed(name, url, user.id).await {
        Ok(feed) => feed,
        Err(StoreError::UniqueViolation) => {
            bail!("a feed with URL '{url}' is already registered")
        }
        Err(e) => return Err(e).context("couldn't create feed"),
    };
    db.create_feed_follow(user.id, feed.id)
        .await
        .context("couldn't follow the new feed")?;
    println!("Feed '{}' added, now following it", feed.name);
    Ok(())
}

pub async fn feeds(db: &Database) -> Result<()> {
    let feeds = db.list_feeds().await?;
    if feeds.is_empty() {
        println!("No feeds registered yet");
        return Ok(());
    }
    for feed in feeds {
        println!("* {} : {} (added by {})", feed.name, feed.url, feed.owner);
    }
    Ok(())
}

pub async fn follow(db: &Database, user: &User, url: &str) -> Result<()> {
    let feed = match db.feed_by_url(url).await {
        Ok(feed) => feed,
        Err(StoreError::NotFound) => db
            .create_feed(&feed_name_from_url(url), url, user.id)
            .await
            .context("couldn't create feed")?,
        Err(e) => return Err(e).context("couldn't look up feed"),
    };
    match db.create_feed_follow(user.id, feed.id).await {
        Ok(_) => println!("Now following '{}'", feed.name),
        Err(StoreError::UniqueViolation) => println!("Already following '{}'", feed.name),
        Err(e) => return Err(e).context("couldn't follow feed"),
    }
    Ok(())
}

pub async fn following(db: &Database, user: &User) -> Result<()> {
    let follows = db.feed_follows_for_user(user.id).await?;
    if follows.is_empty() {
        println!("You're not following any feeds");
        return Ok(());
    }
    for follow in follows {
        println!("* {} : {}", follow.feed_name, follow.feed_url);
    }
    Ok(())
}

pub async fn unfollow(db: &Database, user: &User, url: &str) -> Result<()> {
    match db.delete_feed_follow(user.id, url).await {
        Ok(()) => {
            println!("Unfollowed '{url}'");
            Ok(())
        }
        Err(StoreError::NotFound) => bail!("you are not following '{url}'"),
        Err(e) => Err(e).context("couldn't unfollow feed"),
    }
}

// ============================================================================
// Browse
// ============================================================================

pub async fn browse(db: &Database, user: &User, limit: i64) -> Result<()> {
    let posts = db.posts_for_user(user.id, limit).await?;
    if posts.is_empty() {
        println!("No posts yet - follow some feeds and run 'creel agg 1m'");
        return Ok(());
    }
    for post in posts {
        let published = Utc
            .timestamp_opt(post.published_at, 0)
            .single()
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| post.published_at.to_string());
        println!();
        println!("---------------------------");
        println!("Title: {}", post.title);
        println!("Published: {published}");
        println!("URL: {}", post.url);
        println!();
        println!("{}", wrap_text(&post.description, 80));
        println!("---------------------------");
    }
    Ok(())
}

/// Greedy word wrap for terminal output. Words longer than the width get
/// a line of their own.
fn wrap_text(text: &str, line_width: usize) -> String {
    let mut words = text.split_whitespace();
    let Some(first) = words.next() else {
        return String::new();
    };

    let mut wrapped = first.to_string();
    let mut space_left = line_width.saturating_sub(first.len());
    for word in words {
        if word.len() + 1 > space_left {
            wrapped.push('\n');
            wrapped.push_str(word);
            space_left = line_width.saturating_sub(word.len());
        } else {
            wrapped.push(' ');
            wrapped.push_str(word);
            space_left -= word.len() + 1;
        }
    }
    wrapped
}

fn feed_name_from_url(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_string))
        .unwrap_or_else(|| url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn agg_rejects_invalid_durations() {
        assert!(Cli::try_parse_from(["creel", "agg", "soon"]).is_err());
        assert!(Cli::try_parse_from(["creel", "agg"]).is_err());
        assert!(Cli::try_parse_from(["creel", "agg", "30s"]).is_ok());
    }

    #[test]
    fn wrap_text_breaks_long_lines() {
        let wrapped = wrap_text("alpha beta gamma delta", 11);
        assert_eq!(wrapped, "alpha beta\ngamma delta");
    }

    #[test]
    fn wrap_text_handles_empty_input() {
        assert_eq!(wrap_text("", 80), "");
        assert_eq!(wrap_text("   ", 80), "");
    }

    #[test]
    fn feed_name_falls_back_to_the_raw_url() {
        assert_eq!(
            feed_name_from_url("https://blog.example.com/rss"),
            "blog.example.com"
        );
        assert_eq!(feed_name_from_url("not a url"), "not a url");
    }
}
