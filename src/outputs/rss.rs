//! RSS 2.0 serialisation of the aggregated feed.
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <rss version="2.0">
//!   <channel>
//!     <title/> <link/> <description/> <lastBuildDate/>
//!     <item> <title/> <link/> <guid/> <pubDate/> <description/> </item>
//!   </channel>
//! </rss>
//! ```
//!
//! Dates are RFC 2822 in UTC. An item without a parsed publish date gets
//! the feed's build time so readers still see a valid `pubDate`.

use chrono::{DateTime, TimeZone, Utc};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::Write;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

use crate::error::Result;
use crate::models::{ArticleRecord, FeedDocument};
use crate::utils::sanitize_xml_text;

/// RFC 2822 timestamp in UTC, as RSS readers expect.
pub fn rfc822<Tz: TimeZone>(dt: &DateTime<Tz>) -> String {
    dt.with_timezone(&Utc).to_rfc2822()
}

fn write_text_element<W: Write>(w: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    w.write_event(Event::Start(BytesStart::new(name)))?;
    w.write_event(Event::Text(BytesText::new(&sanitize_xml_text(text))))?;
    w.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn write_item<W: Write>(w: &mut Writer<W>, item: &ArticleRecord, fallback_date: &str) -> Result<()> {
    w.write_event(Event::Start(BytesStart::new("item")))?;
    write_text_element(w, "title", &item.title)?;
    write_text_element(w, "link", &item.link)?;

    let mut guid = BytesStart::new("guid");
    guid.push_attribute(("isPermaLink", "true"));
    w.write_event(Event::Start(guid))?;
    w.write_event(Event::Text(BytesText::new(&sanitize_xml_text(&item.link))))?;
    w.write_event(Event::End(BytesEnd::new("guid")))?;

    let pub_date = item
        .publish_date
        .as_ref()
        .map(rfc822)
        .unwrap_or_else(|| fallback_date.to_string());
    write_text_element(w, "pubDate", &pub_date)?;
    write_text_element(w, "description", &item.description)?;
    w.write_event(Event::End(BytesEnd::new("item")))?;
    Ok(())
}

/// Render the feed document to UTF-8 XML bytes.
pub fn render_feed(feed: &FeedDocument) -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut rss = BytesStart::new("rss");
    rss.push_attribute(("version", "2.0"));
    writer.write_event(Event::Start(rss))?;
    writer.write_event(Event::Start(BytesStart::new("channel")))?;

    let build_date = rfc822(&feed.last_build);
    write_text_element(&mut writer, "title", &feed.title)?;
    write_text_element(&mut writer, "link", &feed.link)?;
    write_text_element(&mut writer, "description", &feed.description)?;
    write_text_element(&mut writer, "lastBuildDate", &build_date)?;

    for item in &feed.items {
        write_item(&mut writer, item, &build_date)?;
    }

    writer.write_event(Event::End(BytesEnd::new("channel")))?;
    writer.write_event(Event::End(BytesEnd::new("rss")))?;

    let mut out = writer.into_inner();
    out.push(b'\n');
    Ok(out)
}

/// Render and write the feed, replacing any existing file at `path`.
#[instrument(level = "info", skip_all, fields(path = %path.display(), items = feed.items.len()))]
pub async fn write_feed(feed: &FeedDocument, path: &Path) -> Result<()> {
    let xml = render_feed(feed)?;
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).await?;
    }
    fs::write(path, &xml).await?;
    info!(bytes = xml.len(), "Wrote RSS feed");
    Ok(())
}
