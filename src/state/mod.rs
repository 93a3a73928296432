//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: the per-request state machine (idle, fetching, classified, paginating, done, failed)
//! - `HandledSet`: the crawl's record of dispatched requests, with atomic check-and-mark

mod crawl_state;
mod handled;

// Re-export main types
pub use crawl_state::CrawlState;
pub use handled::HandledSet;
