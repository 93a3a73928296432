use crate::request::SearchRequest;
use crate::state::CrawlState;
use crate::SpiderError;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Requests already dispatched during a crawl, with their current state
///
/// Checking and marking happen under one lock, so two concurrent discoveries
/// of the same request can never both be dispatched.
#[derive(Debug, Default)]
pub struct HandledSet {
    entries: Mutex<HashMap<SearchRequest, CrawlState>>,
}

impl HandledSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SearchRequest, CrawlState>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Marks `request` as fetching if it has not been handled yet
    ///
    /// Returns true exactly once per request; the caller that gets `true`
    /// owns the dispatch.
    pub fn mark(&self, request: &SearchRequest) -> bool {
        let mut entries = self.lock();
        if entries.contains_key(request) {
            return false;
        }
        entries.insert(request.clone(), CrawlState::Fetching);
        true
    }

    /// Moves a handled request to its next state
    ///
    /// Unknown requests are treated as `Idle`.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlState)` - The state the request left
    /// * `Err(SpiderError::InvalidTransition)` - The move is not allowed
    pub fn advance(&self, request: &SearchRequest, to: CrawlState) -> Result<CrawlState, SpiderError> {
        let mut entries = self.lock();
        let from = entries.get(request).copied().unwrap_or(CrawlState::Idle);

        if !from.can_transition_to(to) {
            return Err(SpiderError::InvalidTransition {
                request: request.to_string(),
                from,
                to,
            });
        }

        entries.insert(request.clone(), to);
        Ok(from)
    }

    /// Current state of a request; `Idle` if it was never dispatched
    pub fn state_of(&self, request: &SearchRequest) -> CrawlState {
        self.lock().get(request).copied().unwrap_or(CrawlState::Idle)
    }

    pub fn contains(&self, request: &SearchRequest) -> bool {
        self.lock().contains_key(request)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Number of requests currently in `state`
    pub fn count_in(&self, state: CrawlState) -> usize {
        self.lock().values().filter(|s| **s == state).count()
    }
}
