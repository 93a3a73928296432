//! Page classification queries
//!
//! Side-effect-free questions asked of a parsed result page: did the query
//! match anything, is this the first page, is it the last one, and how many
//! results does the engine report.

use crate::page::Markup;
use scraper::{ElementRef, Html};

/// Returns the pagination region, if the page has one
pub fn pagination<'a>(document: &'a Html, markup: &Markup) -> Option<ElementRef<'a>> {
    document.select(&markup.pagination).next()
}

/// False if the no-results marker appears anywhere in the document
pub fn has_results(document: &Html, markup: &Markup) -> bool {
    document.select(&markup.no_results).next().is_none()
}

/// True for a single-page result set, or when the current-page marker reads `1`
pub fn is_root_page(document: &Html, markup: &Markup) -> bool {
    match pagination(document, markup) {
        None => true,
        Some(region) => current_marker(region, markup).as_deref() == Some("1"),
    }
}

/// True if the pagination region contains the disabled marker
///
/// Pages without a pagination region are never "last"; check
/// [`is_root_page`] or [`pagination`] first.
pub fn is_last_page(document: &Html, markup: &Markup) -> bool {
    pagination(document, markup)
        .map(|region| region.select(&markup.disabled).next().is_some())
        .unwrap_or(false)
}

/// The engine-reported total, with surrounding and repeated whitespace removed
pub fn total_count(document: &Html, markup: &Markup) -> Option<String> {
    document
        .select(&markup.total)
        .next()
        .map(collapsed_text)
        .filter(|s| !s.is_empty())
}

/// The current page index, when the page is paginated
///
/// A missing or non-numeric current-page marker reads as 0.
pub fn current_index(document: &Html, markup: &Markup) -> Option<u32> {
    pagination(document, markup).map(|region| marker_index(region, markup))
}

/// Index of the current-page marker inside a pagination region, 0 if not numeric
pub(crate) fn marker_index(region: ElementRef<'_>, markup: &Markup) -> u32 {
    current_marker(region, markup)
        .and_then(|text| text.parse().ok())
        .unwrap_or(0)
}

fn current_marker(region: ElementRef<'_>, markup: &Markup) -> Option<String> {
    region.select(&markup.current).next().map(visible_text)
}

/// Concatenated text of an element, trimmed
pub(crate) fn visible_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

pub(crate) fn collapsed_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
