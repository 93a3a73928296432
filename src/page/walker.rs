//! Pagination walker
//!
//! Finds the page links beyond the current page in a result page's
//! pagination region and turns them into normalized requests.

use crate::page::classifier::{marker_index, pagination, visible_text};
use crate::page::Markup;
use crate::request::{RequestBuilder, SearchRequest};
use scraper::Html;
use url::Url;

/// A link to a later page of the same result set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationLink {
    /// Page number shown on the anchor
    pub index: u32,

    /// Request that fetches the page
    pub request: SearchRequest,
}

/// Walks the pagination region and emits every link past the current page
///
/// # Algorithm
///
/// 1. No pagination region: nothing is emitted and the single-page result is
///    logged. This is a normal end of the crawl, not an error.
/// 2. The current-page marker is read as an integer (non-numeric counts as 0).
/// 3. Each anchor in the region, in document order, is emitted when its text
///    is not a previous/next label and parses to an index greater than the
///    current one. Its `href` is resolved against `base` and passed through
///    the request builder.
///
/// Everything else (labels, ellipses, earlier pages, the current page's own
/// link, anchors without a usable `href`) is skipped silently.
///
/// # Arguments
///
/// * `document` - The parsed result page
/// * `markup` - Compiled markup selectors
/// * `base` - Absolute URL of the page, used to resolve relative links
/// * `builder` - Request builder for the engine
/// * `emit` - Receives each discovered link
pub fn walk<F>(
    document: &Html,
    markup: &Markup,
    base: &Url,
    builder: &RequestBuilder,
    mut emit: F,
) where
    F: FnMut(PaginationLink),
{
    let region = match pagination(document, markup) {
        Some(region) => region,
        None => {
            tracing::info!("Only one page of results for {}", base);
            return;
        }
    };

    let current = marker_index(region, markup);

    for anchor in region.select(&markup.link) {
        let text = visible_text(anchor);
        if markup.is_control_label(&text) {
            continue;
        }

        let index = match text.parse::<u32>() {
            Ok(index) if index > current => index,
            _ => continue,
        };

        let path = match anchor
            .value()
            .attr("href")
            .and_then(|href| resolve_href(href, base))
        {
            Some(path) => path,
            None => {
                tracing::debug!("Skipping page {} link without a usable href", index);
                continue;
            }
        };

        emit(PaginationLink {
            index,
            request: builder.build(&path),
        });
    }
}

/// Collects the links [`walk`] emits, in document order
pub fn collect_links(
    document: &Html,
    markup: &Markup,
    base: &Url,
    builder: &RequestBuilder,
) -> Vec<PaginationLink> {
    let mut links = Vec::new();
    walk(document, markup, base, builder, |link| links.push(link));
    links
}

/// Resolves an anchor `href` to an absolute path on the engine's host
///
/// Returns None for empty, fragment-only, and script hrefs, and for links
/// that leave the engine's host.
fn resolve_href(href: &str, base: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') || href.starts_with("javascript:") {
        return None;
    }

    let resolved = base.join(href).ok()?;
    if resolved.host_str() != base.host_str()
        || resolved.port_or_known_default() != base.port_or_known_default()
    {
        tracing::debug!("Skipping off-engine link {}", resolved);
        return None;
    }

    let mut path = resolved.path().to_string();
    if let Some(query) = resolved.query() {
        path.push('?');
        path.push_str(query);
    }
    Some(path)
}
