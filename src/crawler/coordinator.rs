//! Crawler coordinator - main crawl orchestration logic
//!
//! This module drives one search invocation:
//! - Building the root request and dispatching it
//! - Awaiting fetch outcomes in completion order
//! - Failing the crawl on transport errors or an empty result set
//! - Publishing every classified page to the consumer
//! - Dispatching newly discovered pages exactly once

use crate::config::Config;
use crate::crawler::fetcher::{fetch_page, FetchResult};
use crate::crawler::transport::{TorTransport, Transport};
use crate::page::{PageParser, ResultPage};
use crate::request::{RequestBuilder, SearchRequest};
use crate::state::{CrawlState, HandledSet};
use crate::{Result, SpiderError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};

/// Statistics for a finished crawl
#[derive(Debug, Clone, Default)]
pub struct CrawlSummary {
    /// The query as given by the caller
    pub query: String,

    /// Total reported by the engine on the first page
    pub total: Option<String>,

    /// Pages published to the consumer
    pub pages: usize,

    /// Requests dispatched to the transport
    pub dispatched: usize,

    /// True if the consumer stopped receiving before the crawl finished
    pub interrupted: bool,

    /// Wall time from the root dispatch to the end of the crawl
    pub elapsed: Duration,
}

/// Main crawler coordinator structure
///
/// A coordinator serves exactly one search: [`Coordinator::start`] consumes it,
/// so every crawl begins with an empty [`HandledSet`].
pub struct Coordinator {
    transport: Arc<dyn Transport>,
    parser: Arc<PageParser>,
    builder: RequestBuilder,
    handled: Arc<HandledSet>,
    page_buffer: usize,
}

impl Coordinator {
    /// Creates a coordinator that reaches the engine through the configured Tor proxy
    pub fn new(config: &Config) -> Result<Self> {
        let transport = TorTransport::from_config(&config.engine, &config.proxy)?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Creates a coordinator over any transport
    pub fn with_transport(config: &Config, transport: Arc<dyn Transport>) -> Result<Self> {
        Ok(Self {
            transport,
            parser: Arc::new(PageParser::from_config(&config.engine, &config.markup)?),
            builder: RequestBuilder::from_config(&config.engine),
            handled: Arc::new(HandledSet::new()),
            page_buffer: config.crawler.page_buffer.max(1),
        })
    }

    /// The requests handled so far, shared with the running crawl
    pub fn handled(&self) -> Arc<HandledSet> {
        self.handled.clone()
    }

    pub fn builder(&self) -> &RequestBuilder {
        &self.builder
    }

    /// Starts crawling `query` in a background task
    ///
    /// Pages arrive on the returned handle in completion order. The page
    /// channel closes once every dispatched fetch has settled, or as soon as
    /// the crawl fails.
    pub fn start(self, query: impl Into<String>) -> CrawlHandle {
        let (tx, rx) = mpsc::channel(self.page_buffer);
        let query = query.into();
        let task = tokio::spawn(async move { self.run(&query, tx).await });

        CrawlHandle { pages: rx, task }
    }

    /// Runs the crawl for `query`, sending each page on `pages`
    ///
    /// # Flow
    ///
    /// 1. Build and dispatch the root request
    /// 2. Take the next completed fetch:
    ///    a. Transport or parse error → fail the crawl
    ///    b. No-results page → fail the crawl without publishing
    ///    c. Otherwise publish the page
    ///    d. If the page is paginating, dispatch its unhandled links
    /// 3. Stop when nothing is in flight
    ///
    /// Returning drops `pages`, which closes the consumer's channel. It also
    /// drops `in_flight`, whose tasks hold the fetch receivers, so fetches
    /// still running are cancelled and never published.
    async fn run(&self, query: &str, pages: mpsc::Sender<ResultPage>) -> Result<CrawlSummary> {
        let start_time = Instant::now();
        let mut summary = CrawlSummary {
            query: query.to_string(),
            ..CrawlSummary::default()
        };
        let mut in_flight: JoinSet<(SearchRequest, FetchResult)> = JoinSet::new();

        let root = self.builder.build(query);
        tracing::info!("Starting crawl for {:?} ({})", query, root);
        self.dispatch(root, &mut in_flight, &mut summary);

        while let Some(joined) = in_flight.join_next().await {
            let (request, outcome) = joined?;

            let page = match outcome {
                Ok(page) => page,
                Err(e) => {
                    tracing::error!("Fetch failed for {}: {}", request, e);
                    self.handled.advance(&request, CrawlState::Failed)?;
                    return Err(e);
                }
            };
            self.handled.advance(&request, CrawlState::Classified)?;

            let next = page.disposition();
            if next == CrawlState::Failed {
                tracing::error!("No results for {:?}", query);
                self.handled.advance(&request, CrawlState::Failed)?;
                return Err(SpiderError::NoResults {
                    query: query.to_string(),
                });
            }

            if page.is_root && summary.total.is_none() {
                summary.total = page.total.clone();
            }

            let links = if next == CrawlState::Paginating {
                page.links.clone()
            } else {
                Vec::new()
            };
            self.handled.advance(&request, next)?;

            tracing::info!(
                "Page {} ready ({} hits, {} new links)",
                page.page_index(),
                page.hits.len(),
                links.len()
            );
            if pages.send(page).await.is_err() {
                tracing::warn!("Page consumer went away, stopping crawl");
                summary.interrupted = true;
                break;
            }
            summary.pages += 1;

            for link in links {
                self.dispatch(link.request, &mut in_flight, &mut summary);
            }

            if next == CrawlState::Paginating {
                self.handled.advance(&request, CrawlState::Done)?;
            }
        }

        summary.elapsed = start_time.elapsed();
        tracing::info!(
            "Crawl completed: {} pages from {} requests in {:?}",
            summary.pages,
            summary.dispatched,
            summary.elapsed
        );

        Ok(summary)
    }

    /// Dispatches `request` unless it was handled before
    fn dispatch(
        &self,
        request: SearchRequest,
        in_flight: &mut JoinSet<(SearchRequest, FetchResult)>,
        summary: &mut CrawlSummary,
    ) {
        if !self.handled.mark(&request) {
            tracing::debug!("Already handled: {}", request);
            return;
        }

        tracing::info!("Fetching {}", request);
        summary.dispatched += 1;

        let delivery = fetch_page(self.transport.clone(), self.parser.clone(), request.clone());
        in_flight.spawn(async move {
            let outcome = delivery.await.unwrap_or_else(|_| {
                Err(SpiderError::FetchAborted {
                    request: request.to_string(),
                })
            });
            (request, outcome)
        });
    }
}

/// Consumer side of a running crawl
pub struct CrawlHandle {
    pages: mpsc::Receiver<ResultPage>,
    task: JoinHandle<Result<CrawlSummary>>,
}

impl CrawlHandle {
    /// Waits for the next page; `None` once the crawl has finished or failed
    pub async fn next_page(&mut self) -> Option<ResultPage> {
        self.pages.recv().await
    }

    /// Waits for the crawl to end and returns its outcome
    ///
    /// Pages not yet received are dropped, which stops a crawl still in progress.
    pub async fn finish(self) -> Result<CrawlSummary> {
        drop(self.pages);
        self.task.await?
    }

    /// Receives every page, then returns them with the crawl's outcome
    pub async fn collect(mut self) -> (Vec<ResultPage>, Result<CrawlSummary>) {
        let mut pages = Vec::new();
        while let Some(page) = self.next_page().await {
            pages.push(page);
        }
        let outcome = self.finish().await;
        (pages, outcome)
    }
}
