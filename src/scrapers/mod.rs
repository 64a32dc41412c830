//! School website scrapers.
//!
//! Every source follows the same two-phase pattern:
//!
//! 1. **Indexing** ([`listing`]): fetch the listing page and pick the newest
//!    `novosti_<id>.html` article links
//! 2. **Fetching** ([`article`]): download each article and summarise it into
//!    an [`ArticleRecord`](crate::models::ArticleRecord)
//!
//! Both phases run strictly one request at a time. Failed articles are
//! logged and recorded as skips without failing the listing.

pub mod article;
pub mod listing;
