//! Result page parsing and classification
//!
//! This module turns a raw engine response into a [`ResultPage`]:
//! - Classifier queries (results present, first page, last page, total count)
//! - Pagination walking (links to later pages)
//! - Extraction of the individual search hits
//!
//! The marker selectors are compiled once into a [`Markup`] and shared by all
//! fetch tasks of a crawl.

pub mod classifier;
mod hits;
mod markup;
pub mod walker;

pub use hits::{extract_hits, SearchHit};
pub use markup::Markup;
pub use walker::{collect_links, walk, PaginationLink};

use crate::config::{EngineConfig, MarkupConfig};
use crate::request::{RequestBuilder, SearchRequest};
use crate::state::CrawlState;
use crate::{ConfigError, Result, SpiderError};
use chrono::{DateTime, Utc};
use scraper::Html;
use url::Url;

/// A fetched result page and the facts derived from it
#[derive(Debug, Clone)]
pub struct ResultPage {
    /// The request that produced this page
    pub request: SearchRequest,

    /// Response body as received
    pub body: String,

    /// False when the engine reported no matches
    pub has_results: bool,

    /// True for a single-page result set or page 1 of a paginated one
    pub is_root: bool,

    /// True when the disabled "next" marker is present
    pub is_last: bool,

    /// True when the page carries a pagination region
    pub is_paginated: bool,

    /// Engine-reported total result count
    pub total: Option<String>,

    /// Current page index for paginated pages; 0 when the marker is not numeric
    pub current_index: Option<u32>,

    /// Links to later pages (empty unless the crawl continues past this page)
    pub links: Vec<PaginationLink>,

    /// Search results listed on this page
    pub hits: Vec<SearchHit>,

    /// When the response was parsed
    pub fetched_at: DateTime<Utc>,
}

impl ResultPage {
    /// Re-parses the body into a document tree
    pub fn document(&self) -> Html {
        Html::parse_document(&self.body)
    }

    /// Page number, treating single-page results as page 1
    ///
    /// Agrees with the index the pagination walker compares links against.
    pub fn page_index(&self) -> u32 {
        self.current_index.unwrap_or(1)
    }

    /// The state this page moves the crawl into once classified
    ///
    /// | Page | State |
    /// |------|-------|
    /// | no-results marker | `Failed` |
    /// | paginated, not last | `Paginating` |
    /// | single page, or last page | `Done` |
    pub fn disposition(&self) -> CrawlState {
        if !self.has_results {
            CrawlState::Failed
        } else if self.is_paginated && !self.is_last {
            CrawlState::Paginating
        } else {
            CrawlState::Done
        }
    }
}

/// Parses responses from one engine into [`ResultPage`]s
#[derive(Debug, Clone)]
pub struct PageParser {
    markup: Markup,
    builder: RequestBuilder,
    engine_url: Url,
}

impl PageParser {
    pub fn new(markup: Markup, builder: RequestBuilder, engine_url: Url) -> Self {
        Self {
            markup,
            builder,
            engine_url,
        }
    }

    /// Builds a parser from the engine and markup configuration
    pub fn from_config(engine: &EngineConfig, markup: &MarkupConfig) -> Result<Self> {
        let engine_url = Url::parse(&format!("http://{}/", engine.address)).map_err(|e| {
            ConfigError::InvalidAddress(format!("Engine address '{}': {}", engine.address, e))
        })?;

        Ok(Self::new(
            Markup::compile(markup)?,
            RequestBuilder::from_config(engine),
            engine_url,
        ))
    }

    pub fn markup(&self) -> &Markup {
        &self.markup
    }

    /// Absolute URL of the page a request fetches
    pub fn page_url(&self, request: &SearchRequest) -> Url {
        self.engine_url
            .join(request.path())
            .unwrap_or_else(|_| self.engine_url.clone())
    }

    /// Parses a complete response into a classified page
    ///
    /// # Returns
    ///
    /// * `Ok(ResultPage)` - The page and its classification
    /// * `Err(SpiderError::MalformedResponse)` - Empty or non-UTF-8 response
    pub fn parse(&self, request: SearchRequest, raw: Vec<u8>) -> Result<ResultPage> {
        let body = String::from_utf8(raw).map_err(|e| SpiderError::MalformedResponse {
            request: request.to_string(),
            message: format!("response is not UTF-8: {}", e),
        })?;

        if body.trim().is_empty() {
            return Err(SpiderError::MalformedResponse {
                request: request.to_string(),
                message: "empty response".to_string(),
            });
        }

        let document = Html::parse_document(&body);
        let markup = &self.markup;

        let has_results = classifier::has_results(&document, markup);
        let is_paginated = classifier::pagination(&document, markup).is_some();
        let is_last = classifier::is_last_page(&document, markup);

        let links = if has_results && !is_last {
            let base = self.page_url(&request);
            collect_links(&document, markup, &base, &self.builder)
        } else {
            Vec::new()
        };

        let page = ResultPage {
            has_results,
            is_root: classifier::is_root_page(&document, markup),
            is_last,
            is_paginated,
            total: classifier::total_count(&document, markup),
            current_index: classifier::current_index(&document, markup),
            links,
            hits: extract_hits(&document, markup),
            fetched_at: Utc::now(),
            request,
            body,
        };

        tracing::debug!(
            "Parsed {}: results={}, root={}, last={}, links={}, hits={}",
            page.request,
            page.has_results,
            page.is_root,
            page.is_last,
            page.links.len(),
            page.hits.len()
        );

        Ok(page)
    }
}
