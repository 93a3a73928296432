/// Crawl state definitions for tracking each request
///
/// Every normalized request moves through these states once per crawl.
use std::fmt;

/// Represents the current state of a request in the crawl process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlState {
    // ===== Active States =====
    /// Not yet dispatched
    Idle,

    /// Dispatched, waiting for the fetch to deliver
    Fetching,

    /// Fetched and classified, next step not yet taken
    Classified,

    /// Links to later pages are being dispatched
    Paginating,

    // ===== Terminal States =====
    /// Page handled successfully
    Done,

    /// Fetch failed or the query matched nothing
    Failed,
}

impl CrawlState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Returns true if this is an active state (request may still be processed)
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Returns true if the state machine allows moving from `self` to `to`
    ///
    /// ```text
    /// Idle -> Fetching -> Classified -> Paginating -> Done
    ///            |             |------------------->  Done
    ///            |             `------------------->  Failed
    ///            `--------------------------------->  Failed
    /// ```
    pub fn can_transition_to(&self, to: CrawlState) -> bool {
        matches!(
            (self, to),
            (Self::Idle, Self::Fetching)
                | (Self::Fetching, Self::Classified)
                | (Self::Fetching, Self::Failed)
                | (Self::Classified, Self::Paginating)
                | (Self::Classified, Self::Done)
                | (Self::Classified, Self::Failed)
                | (Self::Paginating, Self::Done)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Fetching => "fetching",
            Self::Classified => "classified",
            Self::Paginating => "paginating",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }

    /// Returns all possible crawl states
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Idle,
            Self::Fetching,
            Self::Classified,
            Self::Paginating,
            Self::Done,
            Self::Failed,
        ]
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
