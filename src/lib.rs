//! Skywrapped - a Bluesky "year in review" generator.
//!
//! # Overview
//!
//! Skywrapped paginates a user's posts, likes, bookmarks, and social graph
//! for a target year and reduces them into a single summary record: post
//! counts, busiest posting times, engagement totals, top languages, top
//! hashtags, emoji champions, a best post, and top interaction partners.
//! Summaries are persisted to SQLite and served back as JSON.
//!
//! # Modules
//!
//! - [`lexicon`]: serde types for the AT Protocol payloads consumed
//! - [`normalize`]: the one defaulting pass from raw payloads to the model
//! - [`model`]: normalized internal types and the `Wrapped` output record
//! - [`wrapped`]: the pure aggregation engine
//! - [`bluesky`]: XRPC client with cursor pagination and year cutoff
//! - [`storage`]: SQLite storage layer
//! - [`api`]: HTTP API handlers

pub mod api;
pub mod bluesky;
pub mod lexicon;
pub mod model;
pub mod normalize;
pub mod storage;
pub mod wrapped;
