//! creel — a multi-user RSS aggregator.
//!
//! Feeds are registered and followed by users, then scraped on a fixed
//! cadence by a staleness-driven scheduler: the feed that was fetched
//! longest ago (never-fetched feeds first) is refreshed on each tick, its
//! items are normalized and stored, and duplicates are dropped so that
//! re-ingesting a feed is always a no-op.
//!
//! The crate is split along the pipeline:
//!
//! - [`feed`] - scheduling, HTTP retrieval, RSS decoding, and ingestion
//! - [`storage`] - the SQLite-backed store for users, feeds, follows, posts
//! - [`config`] - the session file (current user, database location)
//! - [`cli`] - command definitions and their handlers

pub mod cli;
pub mod config;
pub mod feed;
pub mod storage;
