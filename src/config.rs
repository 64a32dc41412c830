//! Tunable thresholds, run settings and the sources file loader.
//!
//! The heuristic thresholds are deliberately kept as named constants so the
//! extraction can be retuned for a template change without touching logic.

use crate::error::Result;
use crate::models::SourceSpec;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Maximum number of ancestors visited when growing the article container.
pub const ANCESTOR_WALK_LIMIT: usize = 10;
/// Visible characters a container needs before it counts as "article sized".
pub const CONTAINER_MIN_CHARS: usize = 250;
/// Description budget, in characters, before the ellipsis is appended.
pub const DESCRIPTION_MAX_CHARS: usize = 800;
/// Articles taken from each listing page.
pub const DEFAULT_PER_SCHOOL: usize = 2;
/// Global cap on feed items.
pub const MAX_FEED_ITEMS: usize = 300;
/// Offset of the sites' local clock (Moscow time, no DST).
pub const LOCAL_UTC_OFFSET_SECS: i32 = 3 * 3600;

pub const DEFAULT_SOURCES_FILE: &str = "schools.txt";
pub const DEFAULT_OUTPUT_FILE: &str = "docs/schools.xml";
pub const DEFAULT_ARTICLE_DELAY_MS: u64 = 500;
pub const DEFAULT_SOURCE_DELAY_MS: u64 = 1000;

pub const USER_AGENT: &str = concat!(
    "Mozilla/5.0 (compatible; school_news_rss/",
    env!("CARGO_PKG_VERSION"),
    ")"
);
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(25);

pub const DEFAULT_FEED_TITLE: &str = "Новости школ";
pub const DEFAULT_FEED_LINK: &str = "http://localhost/schools.xml";
pub const DEFAULT_FEED_DESCRIPTION: &str = "Свежие новости с сайтов школ";

/// Everything the pipeline needs for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub sources_file: PathBuf,
    pub output_file: PathBuf,
    pub summary_json: Option<PathBuf>,
    pub per_school: usize,
    pub max_items: usize,
    pub article_delay: Duration,
    pub source_delay: Duration,
    pub feed_title: String,
    pub feed_link: String,
    pub feed_description: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sources_file: PathBuf::from(DEFAULT_SOURCES_FILE),
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            summary_json: None,
            per_school: DEFAULT_PER_SCHOOL,
            max_items: MAX_FEED_ITEMS,
            article_delay: Duration::from_millis(DEFAULT_ARTICLE_DELAY_MS),
            source_delay: Duration::from_millis(DEFAULT_SOURCE_DELAY_MS),
            feed_title: DEFAULT_FEED_TITLE.to_string(),
            feed_link: DEFAULT_FEED_LINK.to_string(),
            feed_description: DEFAULT_FEED_DESCRIPTION.to_string(),
        }
    }
}

/// Parse the `name|url` line format.
///
/// Blank lines and lines starting with `#` are ignored. A line without a
/// `|` is used as both the name and the URL.
pub fn parse_sources(content: &str) -> Vec<SourceSpec> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| match line.split_once('|') {
            Some((name, url)) => SourceSpec::new(name.trim(), url.trim()),
            None => SourceSpec::new(line, line),
        })
        .collect()
}

/// Read and parse the sources file. A missing file is fatal for the run.
#[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
pub async fn load_sources<P: AsRef<Path>>(path: P) -> Result<Vec<SourceSpec>> {
    let content = tokio::fs::read_to_string(path.as_ref()).await?;
    let sources = parse_sources(&content);
    info!(count = sources.len(), "Loaded sources");
    debug!(?sources, "Sources");
    Ok(sources)
}
