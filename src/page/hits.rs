use crate::page::classifier::{collapsed_text, visible_text};
use crate::page::Markup;
use scraper::Html;

/// One search result listed on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    /// Result heading, or the leading text of the entry when it has none
    pub title: String,

    /// First link inside the entry
    pub link: Option<String>,

    /// Whole entry text with whitespace collapsed
    pub snippet: String,
}

/// Extracts every result entry on the page, in document order
pub fn extract_hits(document: &Html, markup: &Markup) -> Vec<SearchHit> {
    document
        .select(&markup.result)
        .map(|entry| {
            let snippet = collapsed_text(entry);
            let title = entry
                .select(&markup.result_title)
                .next()
                .map(visible_text)
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| snippet.chars().take(80).collect());
            let link = entry
                .select(&markup.anchor)
                .next()
                .and_then(|a| a.value().attr("href"))
                .map(|href| href.trim().to_string());

            SearchHit {
                title,
                link,
                snippet,
            }
        })
        .collect()
}
