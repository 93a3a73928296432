//! Page fetcher
//!
//! Each fetch runs in its own task and delivers exactly one outcome, a
//! classified page or a fatal error, through a private one-shot channel.

use crate::crawler::transport::Transport;
use crate::page::{PageParser, ResultPage};
use crate::request::SearchRequest;
use crate::Result;
use std::sync::Arc;
use tokio::sync::oneshot;

/// Outcome of a single fetch
pub type FetchResult = Result<ResultPage>;

/// Dispatches a fetch and returns the channel its outcome arrives on
///
/// The request is exchanged over `transport`, and the full response is parsed
/// and classified before delivery. The caller suspends only when awaiting
/// the returned receiver. Dropping the receiver cancels the exchange, which
/// closes its connection.
///
/// Must be called from within a tokio runtime.
pub fn fetch_page(
    transport: Arc<dyn Transport>,
    parser: Arc<PageParser>,
    request: SearchRequest,
) -> oneshot::Receiver<FetchResult> {
    let (mut tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let label = request.to_string();
        let work = async move {
            match transport.exchange(&request).await {
                Ok(raw) => parser.parse(request, raw),
                Err(e) => Err(e),
            }
        };

        let outcome = tokio::select! {
            outcome = work => Some(outcome),
            _ = tx.closed() => None,
        };

        match outcome {
            Some(outcome) => {
                if tx.send(outcome).is_err() {
                    tracing::debug!("Fetch result for {} discarded, receiver dropped", label);
                }
            }
            None => tracing::debug!("Fetch of {} cancelled, receiver dropped", label),
        }
    });

    rx
}
