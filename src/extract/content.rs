//! Article body isolation for school news pages.
//!
//! The sites share one template family: an `<h1>` sits a few levels inside
//! the block that holds the article prose, surrounded by breadcrumbs, menus
//! and an accessibility ("версия для слабовидящих") toolbar. The heuristic
//! grows a container outward from the heading until it holds enough text,
//! cuts the known non-article blocks out of it and trims the heading off the
//! front of what remains.
//!
//! None of these steps fail: a page without a heading, landmark or any of
//! the markers simply degrades to a coarser container.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};

use crate::config::{ANCESTOR_WALK_LIMIT, CONTAINER_MIN_CHARS};
use crate::utils::collapse_whitespace;

/// Used as the heading when a page has no usable `<h1>`.
pub const HEADING_PLACEHOLDER: &str = "Новость";

/// Blocks that are never part of an article body.
pub const NON_ARTICLE_SELECTORS: &[&str] = &[
    ".breadcrumb",
    "nav[aria-label='breadcrumb']",
    "ol.breadcrumb",
    "ul.breadcrumb",
    ".gw-breadcrumbs",
    "header",
    "footer",
    "nav",
    "aside",
    ".bvi-panel",
    ".bvi-body",
    ".bvi-open",
    ".special-version",
    ".visually-impaired",
];

/// Characters trimmed after a heading that was repeated at the start of the body.
const HEADING_SEPARATORS: &[char] = &[' ', '\t', '\r', '\n', '-', '–', '—', ':', '|'];

/// Elements whose text is never visible.
const INVISIBLE_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

static H1: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").expect("valid selector"));
static MAIN: Lazy<Selector> = Lazy::new(|| Selector::parse("main").expect("valid selector"));
static BODY: Lazy<Selector> = Lazy::new(|| Selector::parse("body").expect("valid selector"));
static NON_ARTICLE: Lazy<Vec<Selector>> = Lazy::new(|| {
    NON_ARTICLE_SELECTORS
        .iter()
        .map(|s| Selector::parse(s).expect("valid selector"))
        .collect()
});

/// Visible text of an element: text nodes joined by single spaces with
/// whitespace runs collapsed. Script and style contents are skipped.
pub fn visible_text(element: ElementRef<'_>) -> String {
    let mut parts = Vec::new();
    collect_text(element, &mut parts);
    collapse_whitespace(&parts.join(" "))
}

fn collect_text<'a>(element: ElementRef<'a>, out: &mut Vec<&'a str>) {
    if INVISIBLE_ELEMENTS.contains(&element.value().name()) {
        return;
    }
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            collect_text(child_element, out);
        } else if let Some(text) = child.value().as_text() {
            out.push(&**text);
        }
    }
}

/// Text of the first `<h1>`, or [`HEADING_PLACEHOLDER`].
pub fn primary_heading(document: &Html) -> String {
    document
        .select(&H1)
        .next()
        .map(visible_text)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| HEADING_PLACEHOLDER.to_string())
}

/// Pick the element most likely to wrap the article prose.
///
/// Walks up from the first `<h1>` for at most [`ANCESTOR_WALK_LIMIT`] steps,
/// stopping at the first node with more than [`CONTAINER_MIN_CHARS`]
/// characters of text. Falls back to `<main>`, then `<body>`.
fn find_container(document: &Html) -> ElementRef<'_> {
    let grown = document.select(&H1).next().and_then(|h1| {
        let mut current = Some(h1);
        for _ in 0..ANCESTOR_WALK_LIMIT {
            let element = current?;
            if visible_text(element).chars().count() > CONTAINER_MIN_CHARS {
                return Some(element);
            }
            current = element.parent().and_then(ElementRef::wrap);
        }
        current
    });

    grown
        .or_else(|| document.select(&MAIN).next())
        .or_else(|| document.select(&BODY).next())
        .unwrap_or_else(|| document.root_element())
}

/// Cut everything before the first occurrence of `heading`, then drop every
/// leading repeat of the heading (and the separator run after each) so the
/// result never starts with it.
pub fn strip_heading_preamble(text: &str, heading: &str) -> String {
    let mut rest = match text.find(heading) {
        Some(pos) => &text[pos..],
        None => text,
    };
    if heading.is_empty() {
        return rest.trim_start_matches(HEADING_SEPARATORS).to_string();
    }
    while let Some(after) = rest.strip_prefix(heading) {
        rest = after.trim_start_matches(HEADING_SEPARATORS);
    }
    rest.to_string()
}

/// Isolate the cleaned article text of `document`.
///
/// Non-article blocks inside the chosen container are detached from the
/// document tree, so the document is modified.
#[instrument(level = "debug", skip_all, fields(%heading))]
pub fn isolate_content(document: &mut Html, heading: &str) -> String {
    let container_id = find_container(document).id();

    let doomed: Vec<_> = match document.tree.get(container_id).and_then(ElementRef::wrap) {
        Some(container) => NON_ARTICLE
            .iter()
            .flat_map(|selector| container.select(selector))
            .map(|element| element.id())
            .collect(),
        None => Vec::new(),
    };
    debug!(removed = doomed.len(), "Detaching non-article blocks");
    for id in doomed {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }

    let text = document
        .tree
        .get(container_id)
        .and_then(ElementRef::wrap)
        .map(visible_text)
        .unwrap_or_default();

    strip_heading_preamble(&text, heading)
}
