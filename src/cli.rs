//! Command-line interface definitions.
//!
//! Every option has a default, so running the binary with no arguments
//! reads `schools.txt` and writes `docs/schools.xml`. Options can also be
//! supplied through environment variables.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{
    DEFAULT_ARTICLE_DELAY_MS, DEFAULT_FEED_DESCRIPTION, DEFAULT_FEED_LINK, DEFAULT_FEED_TITLE,
    DEFAULT_OUTPUT_FILE, DEFAULT_PER_SCHOOL, DEFAULT_SOURCE_DELAY_MS, DEFAULT_SOURCES_FILE,
    MAX_FEED_ITEMS, Settings,
};

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Defaults: schools.txt -> docs/schools.xml
/// school_news_rss
///
/// # Three articles per school, and a JSON report of what was skipped
/// school_news_rss --per-school 3 --summary-json docs/summary.json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Sources file with one `Name|ListingURL` per line
    #[arg(short, long, env = "SCHOOLS_FILE", default_value = DEFAULT_SOURCES_FILE)]
    pub sources: PathBuf,

    /// Where to write the RSS feed
    #[arg(short, long, env = "FEED_OUTPUT", default_value = DEFAULT_OUTPUT_FILE)]
    pub output: PathBuf,

    /// Optional path for a JSON run summary
    #[arg(long, env = "SUMMARY_JSON")]
    pub summary_json: Option<PathBuf>,

    /// Newest articles taken from each school
    #[arg(long, default_value_t = DEFAULT_PER_SCHOOL)]
    pub per_school: usize,

    /// Maximum number of items in the feed
    #[arg(long, default_value_t = MAX_FEED_ITEMS)]
    pub max_items: usize,

    /// Pause between article fetches, in milliseconds
    #[arg(long, default_value_t = DEFAULT_ARTICLE_DELAY_MS)]
    pub article_delay_ms: u64,

    /// Pause between schools, in milliseconds
    #[arg(long, default_value_t = DEFAULT_SOURCE_DELAY_MS)]
    pub source_delay_ms: u64,

    /// Channel title
    #[arg(long, env = "FEED_TITLE", default_value = DEFAULT_FEED_TITLE)]
    pub feed_title: String,

    /// Channel link
    #[arg(long, env = "FEED_LINK", default_value = DEFAULT_FEED_LINK)]
    pub feed_link: String,

    /// Channel description
    #[arg(long, env = "FEED_DESCRIPTION", default_value = DEFAULT_FEED_DESCRIPTION)]
    pub feed_description: String,
}

impl From<Cli> for Settings {
    fn from(cli: Cli) -> Self {
        Settings {
            sources_file: cli.sources,
            output_file: cli.output,
            summary_json: cli.summary_json,
            per_school: cli.per_school,
            max_items: cli.max_items,
            article_delay: Duration::from_millis(cli.article_delay_ms),
            source_delay: Duration::from_millis(cli.source_delay_ms),
            feed_title: cli.feed_title,
            feed_link: cli.feed_link,
            feed_description: cli.feed_description,
        }
    }
}
