//! Data models for scraped articles, configured sources and the feed document.
//!
//! - [`SourceSpec`]: one school website, read from the sources file
//! - [`ArticleRecord`]: a normalised article ready to become an RSS item
//! - [`FeedDocument`]: the ordered item list plus channel metadata
//! - [`Skip`] / [`RunSummary`]: per-unit failures collected during a run

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;

/// A school website being scraped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpec {
    /// Human-readable name, used as the `[name]` title prefix.
    pub display_name: String,
    /// URL of the page listing the school's news.
    pub listing_url: String,
}

impl SourceSpec {
    pub fn new(display_name: impl Into<String>, listing_url: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            listing_url: listing_url.into(),
        }
    }
}

/// A single scraped article.
///
/// Built once by the article summarizer and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleRecord {
    /// `[School] Heading`
    pub title: String,
    /// Absolute article URL; also used as the RSS guid.
    pub link: String,
    /// Cleaned article text, bounded in length.
    pub description: String,
    /// Publication time parsed from the article text, if any.
    pub publish_date: Option<DateTime<FixedOffset>>,
}

/// The aggregated feed, ready to be serialised.
#[derive(Debug, Clone)]
pub struct FeedDocument {
    pub title: String,
    pub link: String,
    pub description: String,
    pub last_build: DateTime<Utc>,
    /// Items ordered newest first.
    pub items: Vec<ArticleRecord>,
}

/// A unit of work that was dropped, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Skip {
    /// Article URL or source name.
    pub target: String,
    pub reason: String,
}

impl Skip {
    pub fn new(target: impl Into<String>, reason: impl ToString) -> Self {
        Self {
            target: target.into(),
            reason: reason.to_string(),
        }
    }
}

/// Outcome counters for one aggregation run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub sources_total: usize,
    pub sources_failed: Vec<Skip>,
    pub articles_scraped: usize,
    pub articles_skipped: Vec<Skip>,
    /// Records dropped because their link was already seen.
    pub duplicates_dropped: usize,
    /// Items in the written feed.
    pub items_written: usize,
}
