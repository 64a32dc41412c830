//! Single article page → [`ArticleRecord`].

use scraper::Html;
use tracing::{debug, info, instrument};

use crate::config::DESCRIPTION_MAX_CHARS;
use crate::error::Result;
use crate::extract::content::{isolate_content, primary_heading};
use crate::extract::date::extract_publish_date;
use crate::fetch::FetchPage;
use crate::models::ArticleRecord;
use crate::utils::{truncate_chars, truncate_for_log};

/// Build an [`ArticleRecord`] from already-downloaded HTML.
///
/// The heading becomes `[school] heading`; the date is looked for in the
/// isolated text, not the whole page, so menu widgets with dates are ignored.
pub fn summarize_html(html: &str, url: &str, school_name: &str) -> ArticleRecord {
    let mut document = Html::parse_document(html);
    let heading = primary_heading(&document);
    let text = isolate_content(&mut document, &heading);
    let publish_date = extract_publish_date(&text);

    debug!(
        %heading,
        chars = text.chars().count(),
        ?publish_date,
        preview = %truncate_for_log(&text, 120),
        "Isolated article text"
    );

    ArticleRecord {
        title: format!("[{school_name}] {heading}"),
        link: url.to_string(),
        description: truncate_chars(&text, DESCRIPTION_MAX_CHARS),
        publish_date,
    }
}

/// Fetch and summarise one article. Fetch errors are returned to the caller.
#[instrument(level = "info", skip_all, fields(%url, school = %school_name))]
pub async fn summarize_article<F: FetchPage>(
    fetcher: &F,
    url: &str,
    school_name: &str,
) -> Result<ArticleRecord> {
    let html = fetcher.fetch(url).await?;
    let record = summarize_html(&html, url, school_name);
    info!(title = %record.title, dated = record.publish_date.is_some(), "Parsed article");
    Ok(record)
}
