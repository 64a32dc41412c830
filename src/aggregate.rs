//! Feed aggregation across all configured schools.
//!
//! Sources are crawled sequentially with a fixed pause between them. A
//! source that fails outright contributes nothing and is recorded in the
//! [`RunSummary`]; the rest of the batch still runs.

use chrono::{DateTime, Utc};
use itertools::Itertools;
use tokio::time::sleep;
use tracing::{error, info, instrument};

use crate::config::Settings;
use crate::fetch::FetchPage;
use crate::models::{ArticleRecord, FeedDocument, RunSummary, Skip, SourceSpec};
use crate::scrapers::listing::crawl_listing;

/// Deduplicate by link (first occurrence wins), order newest first with
/// undated records last, and cap to `max_items`.
///
/// Returns the merged list and how many duplicates were dropped.
pub fn merge_records(records: Vec<ArticleRecord>, max_items: usize) -> (Vec<ArticleRecord>, usize) {
    let total = records.len();
    let mut merged: Vec<ArticleRecord> = records
        .into_iter()
        .unique_by(|r| r.link.clone())
        .collect();
    let duplicates = total - merged.len();

    // `None < Some(_)`, so comparing b to a puts undated records last.
    merged.sort_by(|a, b| b.publish_date.cmp(&a.publish_date));
    merged.truncate(max_items);
    (merged, duplicates)
}

/// Crawl every source and merge the results.
#[instrument(level = "info", skip_all, fields(sources = sources.len()))]
pub async fn collect_articles<F: FetchPage>(
    fetcher: &F,
    sources: &[SourceSpec],
    settings: &Settings,
) -> (Vec<ArticleRecord>, RunSummary) {
    let mut summary = RunSummary {
        sources_total: sources.len(),
        ..RunSummary::default()
    };
    let mut all_records = Vec::new();

    for (i, source) in sources.iter().enumerate() {
        if i > 0 && !settings.source_delay.is_zero() {
            sleep(settings.source_delay).await;
        }

        match crawl_listing(
            fetcher,
            &source.listing_url,
            &source.display_name,
            settings.per_school,
            settings.article_delay,
        )
        .await
        {
            Ok(outcome) => {
                summary.articles_scraped += outcome.records.len();
                summary.articles_skipped.extend(outcome.skipped);
                all_records.extend(outcome.records);
            }
            Err(e) => {
                error!(
                    school = %source.display_name,
                    url = %source.listing_url,
                    error = %e,
                    "Source failed; skipping"
                );
                summary
                    .sources_failed
                    .push(Skip::new(source.display_name.as_str(), e));
            }
        }
    }

    let (merged, duplicates) = merge_records(all_records, settings.max_items);
    summary.duplicates_dropped = duplicates;
    summary.items_written = merged.len();
    info!(
        items = merged.len(),
        duplicates,
        failed_sources = summary.sources_failed.len(),
        skipped_articles = summary.articles_skipped.len(),
        "Aggregation complete"
    );
    (merged, summary)
}

/// Wrap merged records with the channel metadata.
pub fn build_feed(items: Vec<ArticleRecord>, settings: &Settings, now: DateTime<Utc>) -> FeedDocument {
    FeedDocument {
        title: settings.feed_title.clone(),
        link: settings.feed_link.clone(),
        description: settings.feed_description.clone(),
        last_build: now,
        items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::StaticPages;
    use chrono::{FixedOffset, TimeZone};
    use std::time::Duration;

    fn at(day: u32, hour: u32) -> Option<DateTime<FixedOffset>> {
        FixedOffset::east_opt(3 * 3600)
            .unwrap()
            .with_ymd_and_hms(2025, 12, day, hour, 0, 0)
            .single()
    }

    fn record(link: &str, title: &str, date: Option<DateTime<FixedOffset>>) -> ArticleRecord {
        ArticleRecord {
            title: title.to_string(),
            link: link.to_string(),
            description: String::new(),
            publish_date: date,
        }
    }

    fn quiet_settings() -> Settings {
        Settings {
            article_delay: Duration::ZERO,
            source_delay: Duration::ZERO,
            ..Settings::default()
        }
    }

    #[test]
    fn test_merge_keeps_first_duplicate() {
        let records = vec![
            record("https://a/1", "first", at(1, 10)),
            record("https://a/2", "other", at(2, 10)),
            record("https://a/1", "second", at(5, 10)),
        ];
        let (merged, dropped) = merge_records(records, 300);
        assert_eq!(dropped, 1);
        assert_eq!(merged.len(), 2);
        let kept = merged.iter().find(|r| r.link == "https://a/1").unwrap();
        assert_eq!(kept.title, "first");
        assert_eq!(kept.publish_date, at(1, 10));
    }

    #[test]
    fn test_merge_sorts_newest_first_undated_last() {
        let records = vec![
            record("https://a/undated", "u", None),
            record("https://a/old", "o", at(1, 8)),
            record("https://a/new", "n", at(3, 8)),
            record("https://a/mid", "m", at(2, 23)),
        ];
        let (merged, _) = merge_records(records, 300);
        let links: Vec<_> = merged.iter().map(|r| r.link.as_str()).collect();
        assert_eq!(
            links,
            vec!["https://a/new", "https://a/mid", "https://a/old", "https://a/undated"]
        );
    }

    #[test]
    fn test_merge_caps_item_count() {
        let records: Vec<_> = (0..10)
            .map(|i| record(&format!("https://a/{i}"), "t", at(1 + i, 0)))
            .collect();
        let (merged, _) = merge_records(records, 4);
        assert_eq!(merged.len(), 4);
        assert_eq!(merged[0].link, "https://a/9");

        let (small, _) = merge_records(vec![record("https://a/x", "t", None)], 300);
        assert_eq!(small.len(), 1);
    }

    #[tokio::test]
    async fn test_collect_articles_survives_failed_source() {
        let fetcher = StaticPages::new()
            .with_page(
                "https://one.example/novosti/",
                r#"<a href="/novosti/novosti_3.html">x</a>"#,
            )
            .with_page(
                "https://one.example/novosti/novosti_3.html",
                "<html><body><h1>Концерт</h1><p>4 декабря 2025, 15:00 прошёл концерт.</p></body></html>",
            );
        let sources = vec![
            SourceSpec::new("Сломанная", "https://broken.example/novosti/"),
            SourceSpec::new("Школа 1", "https://one.example/novosti/"),
        ];

        let (items, summary) = collect_articles(&fetcher, &sources, &quiet_settings()).await;

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "[Школа 1] Концерт");
        assert_eq!(summary.sources_total, 2);
        assert_eq!(summary.sources_failed.len(), 1);
        assert_eq!(summary.sources_failed[0].target, "Сломанная");
        assert_eq!(summary.items_written, 1);
    }

    #[tokio::test]
    async fn test_collect_articles_dedups_across_sources() {
        let listing = r#"<a href="https://shared.example/novosti/novosti_1.html">x</a>"#;
        let fetcher = StaticPages::new()
            .with_page("https://a.example/", listing)
            .with_page("https://b.example/", listing)
            .with_page(
                "https://shared.example/novosti/novosti_1.html",
                "<html><body><h1>Общая</h1><p>текст</p></body></html>",
            );
        let sources = vec![
            SourceSpec::new("A", "https://a.example/"),
            SourceSpec::new("B", "https://b.example/"),
        ];

        let (items, summary) = collect_articles(&fetcher, &sources, &quiet_settings()).await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "[A] Общая");
        assert_eq!(summary.articles_scraped, 2);
        assert_eq!(summary.duplicates_dropped, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_collect_articles_pauses_between_sources() {
        let fetcher = StaticPages::new()
            .with_page("https://a.example/", "<html><body></body></html>")
            .with_page("https://b.example/", "<html><body></body></html>")
            .with_page("https://c.example/", "<html><body></body></html>");
        let sources = vec![
            SourceSpec::new("A", "https://a.example/"),
            SourceSpec::new("B", "https://b.example/"),
            SourceSpec::new("C", "https://c.example/"),
        ];
        let settings = Settings {
            source_delay: Duration::from_secs(1),
            ..quiet_settings()
        };

        let t0 = tokio::time::Instant::now();
        let (items, summary) = collect_articles(&fetcher, &sources, &settings).await;
        let elapsed = t0.elapsed();

        assert!(items.is_empty());
        assert!(summary.sources_failed.is_empty());
        assert!(elapsed >= Duration::from_secs(2));
        assert!(elapsed < Duration::from_secs(3));
    }

    #[test]
    fn test_build_feed_copies_channel_metadata() {
        let now = Utc::now();
        let feed = build_feed(vec![], &Settings::default(), now);
        assert_eq!(feed.title, "Новости школ");
        assert_eq!(feed.last_build, now);
        assert!(feed.items.is_empty());
    }
}
