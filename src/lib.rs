//! Onion-Spider: a paginating crawler for an onion search engine
//!
//! This crate issues a query against a single onion search engine through a
//! Tor SOCKS5 proxy, walks the paginated result set concurrently, and streams
//! every classified result page to the caller.

pub mod config;
pub mod crawler;
pub mod page;
pub mod request;
pub mod state;

use thiserror::Error;

/// Main error type for Onion-Spider operations
///
/// Every variant is fatal for the crawl invocation that produced it.
#[derive(Debug, Error)]
pub enum SpiderError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to connect to {target} through the Tor proxy: {source}")]
    Connect {
        target: String,
        source: tokio_socks::Error,
    },

    #[error("I/O error while requesting {request:?}: {source}")]
    Io {
        request: String,
        source: std::io::Error,
    },

    #[error("Request timeout for {request:?}")]
    Timeout { request: String },

    #[error("Malformed response for {request:?}: {message}")]
    MalformedResponse { request: String, message: String },

    #[error("Nothing found for query {query:?}")]
    NoResults { query: String },

    #[error("Fetch task for {request:?} ended without delivering a page")]
    FetchAborted { request: String },

    #[error("Crawl task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),

    #[error("Invalid state transition for {request:?}: {from:?} -> {to:?}")]
    InvalidTransition {
        request: String,
        from: state::CrawlState,
        to: state::CrawlState,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid address in config: {0}")]
    InvalidAddress(String),

    #[error("Invalid selector {selector:?} for {field}: {message}")]
    InvalidSelector {
        field: &'static str,
        selector: String,
        message: String,
    },
}

/// Result type alias for Onion-Spider operations
pub type Result<T> = std::result::Result<T, SpiderError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, CrawlHandle, CrawlSummary};
pub use page::{PaginationLink, ResultPage, SearchHit};
pub use request::{RequestBuilder, SearchRequest};
pub use state::{CrawlState, HandledSet};
