//! Crawler module for fetching and walking result pages
//!
//! This module contains the core crawling logic, including:
//! - The transport to the engine (Tor SOCKS5)
//! - One-shot page fetches, one task each
//! - Overall crawl coordination and deduplication

mod coordinator;
mod fetcher;
mod transport;

pub use coordinator::{Coordinator, CrawlHandle, CrawlSummary};
pub use fetcher::{fetch_page, FetchResult};
pub use transport::{TorTransport, Transport};

use crate::config::Config;
use crate::page::ResultPage;
use crate::Result;

/// Starts a crawl for `query` over the configured Tor proxy
///
/// This is the main entry point. Pages stream from the returned handle as
/// they complete; [`CrawlHandle::finish`] reports the outcome.
///
/// # Example
///
/// ```no_run
/// use onion_spider::config::Config;
/// use onion_spider::crawler::crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut crawl = crawl(&Config::default(), "openssh")?;
/// while let Some(page) = crawl.next_page().await {
///     println!("page {}: {} hits", page.page_index(), page.hits.len());
/// }
/// let summary = crawl.finish().await?;
/// println!("{} pages", summary.pages);
/// # Ok(())
/// # }
/// ```
pub fn crawl(config: &Config, query: &str) -> Result<CrawlHandle> {
    Ok(Coordinator::new(config)?.start(query))
}

/// Crawls `query` to completion and returns every page, sorted by page index
pub async fn crawl_all(config: &Config, query: &str) -> Result<(Vec<ResultPage>, CrawlSummary)> {
    let (mut pages, outcome) = crawl(config, query)?.collect().await;
    let summary = outcome?;
    pages.sort_by_key(ResultPage::page_index);
    Ok((pages, summary))
}
