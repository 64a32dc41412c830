//! # School News RSS
//!
//! Scrapes the news sections of a list of school websites and aggregates
//! the newest articles into a single RSS 2.0 feed.
//!
//! ## Usage
//!
//! ```sh
//! school_news_rss            # schools.txt -> docs/schools.xml
//! ```
//!
//! ## Architecture
//!
//! The run is a strictly sequential pipeline:
//! 1. **Sources**: read `Name|ListingURL` lines from the sources file
//! 2. **Indexing**: pick the newest article links from each listing page
//! 3. **Fetching**: download each article, isolate its text and date
//! 4. **Aggregation**: dedupe by link, sort newest first, cap the item count
//! 5. **Output**: write the RSS document (and optionally a JSON run summary)
//!
//! A failing article or school is logged and skipped; only an unreadable
//! sources file or an unwritable output aborts the run.

use chrono::Utc;
use clap::Parser;
use std::error::Error;
use tracing::{debug, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod aggregate;
mod cli;
mod config;
mod error;
mod extract;
mod fetch;
mod models;
mod outputs;
mod scrapers;
mod utils;

use cli::Cli;
use config::{Settings, load_sources};
use fetch::{FetchPage, HttpFetcher};
use models::RunSummary;
use outputs::{json, rss};
use utils::ensure_writable_dir;

/// Run the whole pipeline with the given fetcher and settings.
#[instrument(level = "info", skip_all, fields(sources = %settings.sources_file.display()))]
async fn run<F: FetchPage>(fetcher: &F, settings: &Settings) -> error::Result<RunSummary> {
    let sources = load_sources(&settings.sources_file).await?;
    ensure_writable_dir(&settings.output_file).await?;

    let (items, summary) = aggregate::collect_articles(fetcher, &sources, settings).await;
    let feed = aggregate::build_feed(items, settings, Utc::now());
    rss::write_feed(&feed, &settings.output_file).await?;

    if let Some(path) = &settings.summary_json {
        json::write_summary(&summary, path).await?;
    }
    Ok(summary)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("school_news_rss starting up");

    let settings = Settings::from(Cli::parse());
    debug!(?settings, "Resolved settings");

    let fetcher = HttpFetcher::new()?;
    let summary = run(&fetcher, &settings).await?;

    for skip in &summary.sources_failed {
        warn!(school = %skip.target, reason = %skip.reason, "School skipped");
    }
    for skip in &summary.articles_skipped {
        warn!(url = %skip.target, reason = %skip.reason, "Article skipped");
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        sources = summary.sources_total,
        failed_sources = summary.sources_failed.len(),
        articles = summary.articles_scraped,
        skipped_articles = summary.articles_skipped.len(),
        items = summary.items_written,
        output = %settings.output_file.display(),
        "Execution complete"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::StaticPages;
    use std::time::Duration;

    const LISTING: &str = "https://school.example/novosti/";
    const ARTICLE: &str = "https://school.example/novosti/novosti_17.html";

    fn settings_in(dir: &std::path::Path) -> Settings {
        Settings {
            sources_file: dir.join("schools.txt"),
            output_file: dir.join("docs").join("schools.xml"),
            summary_json: Some(dir.join("docs").join("summary.json")),
            article_delay: Duration::ZERO,
            source_delay: Duration::ZERO,
            ..Settings::default()
        }
    }

    #[tokio::test]
    async fn test_run_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(dir.path());
        std::fs::write(
            &settings.sources_file,
            format!("# test\nSourceName|{LISTING}\nBroken|https://broken.example/\n"),
        )
        .unwrap();

        let fetcher = StaticPages::new()
            .with_page(
                LISTING,
                r#"<html><body><a href="/novosti/novosti_17.html">Test</a></body></html>"#,
            )
            .with_page(
                ARTICLE,
                "<html><body><div><h1>Test</h1><p>Новость от 11 декабря 2025, 10:28 о школьной жизни.</p></div></body></html>",
            );

        let summary = run(&fetcher, &settings).await.unwrap();
        assert_eq!(summary.items_written, 1);
        assert_eq!(summary.sources_failed.len(), 1);

        let xml = std::fs::read_to_string(&settings.output_file).unwrap();
        assert!(xml.contains("<title>[SourceName] Test</title>"));
        assert!(xml.contains(&format!("<link>{ARTICLE}</link>")));
        assert!(xml.contains("<pubDate>Thu, 11 Dec 2025 07:28:00 +0000</pubDate>"));
        assert!(xml.contains("<description>Новость от 11 декабря"));
        assert!(settings.summary_json.as_ref().unwrap().exists());
    }

    #[tokio::test]
    async fn test_run_missing_sources_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(dir.path());
        let fetcher = StaticPages::new();

        assert!(run(&fetcher, &settings).await.is_err());
        assert!(!settings.output_file.exists());
        assert!(fetcher.requested.borrow().is_empty());
    }
}
