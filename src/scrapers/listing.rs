//! School news listing pages.
//!
//! Articles are linked as `…/novosti/novosti_<id>.html`. The numeric id grows
//! with every new post, so it is the only recency signal available before
//! the article pages themselves are fetched.

use futures::stream::{self, StreamExt};
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::error::Result;
use crate::fetch::FetchPage;
use crate::models::{ArticleRecord, Skip};
use crate::scrapers::article::summarize_article;

static ARTICLE_HREF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"novosti/novosti_(\d+)\.html").expect("article pattern is valid"));

static LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("valid selector"));

/// Articles scraped from one listing, plus the ones that had to be dropped.
#[derive(Debug, Default)]
pub struct ListingOutcome {
    pub records: Vec<ArticleRecord>,
    pub skipped: Vec<Skip>,
}

/// Numeric article id of a `novosti_<id>.html` link.
pub fn article_id(link: &str) -> Option<u64> {
    ARTICLE_HREF_RE
        .captures(link)
        .and_then(|caps| caps[1].parse().ok())
}

/// Extract the newest `per_school` article links from a listing page.
///
/// Links are resolved against the scheme and host of `listing_url` with any
/// `#fragment` dropped, deduplicated in first-seen order, then ordered by
/// article id, highest first.
pub fn extract_article_links(html: &str, listing_url: &str, per_school: usize) -> Result<Vec<String>> {
    let origin = Url::parse(listing_url)?.join("/")?;
    let document = Html::parse_document(html);

    let mut links: Vec<(u64, String)> = document
        .select(&LINK_SELECTOR)
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| ARTICLE_HREF_RE.is_match(href))
        .filter_map(|href| origin.join(href.trim()).ok())
        .map(|mut url| {
            url.set_fragment(None);
            url.to_string()
        })
        .unique()
        .filter_map(|link| article_id(&link).map(|id| (id, link)))
        .collect();

    // Stable, so equal ids keep listing order.
    links.sort_by(|a, b| b.0.cmp(&a.0));
    links.truncate(per_school);
    Ok(links.into_iter().map(|(_, link)| link).collect())
}

/// Crawl one school's listing and summarise its newest articles.
///
/// Articles are fetched one at a time with `article_delay` between them. A
/// failing article is recorded in [`ListingOutcome::skipped`]; only a
/// failure to fetch or read the listing itself is returned as an error.
#[instrument(level = "info", skip_all, fields(%listing_url, school = %school_name))]
pub async fn crawl_listing<F: FetchPage>(
    fetcher: &F,
    listing_url: &str,
    school_name: &str,
    per_school: usize,
    article_delay: Duration,
) -> Result<ListingOutcome> {
    let html = fetcher.fetch(listing_url).await?;
    let links = extract_article_links(&html, listing_url, per_school)?;
    info!(count = links.len(), "Indexed article links");
    debug!(?links, "Article links");

    let results: Vec<std::result::Result<ArticleRecord, Skip>> = stream::iter(links.into_iter().enumerate())
        .then(|(i, url)| async move {
            if i > 0 && !article_delay.is_zero() {
                sleep(article_delay).await;
            }
            summarize_article(fetcher, &url, school_name)
                .await
                .map_err(|e| {
                    warn!(%url, error = %e, "Article fetch failed; skipping");
                    Skip::new(url.as_str(), e)
                })
        })
        .collect()
        .await;

    let (records, skipped): (Vec<_>, Vec<_>) = results.into_iter().partition_result();
    info!(scraped = records.len(), skipped = skipped.len(), "Listing done");
    Ok(ListingOutcome { records, skipped })
}
