use async_trait::async_trait;
use onion_spider::crawler::Transport;
use onion_spider::{SearchRequest, SpiderError};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Serves canned pages by request path and records every request it sees
#[derive(Default)]
pub struct StubTransport {
    pages: HashMap<String, String>,
    failures: Vec<String>,
    delays: HashMap<String, Duration>,
    seen: Mutex<Vec<String>>,
    finished: Mutex<Vec<String>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, path: &str, body: String) -> Self {
        self.pages.insert(path.to_string(), body);
        self
    }

    pub fn failing(mut self, path: &str) -> Self {
        self.failures.push(path.to_string());
        self
    }

    pub fn delayed(mut self, path: &str, delay: Duration) -> Self {
        self.delays.insert(path.to_string(), delay);
        self
    }

    /// Every request line received, in arrival order
    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }

    /// Request lines whose exchange ran to completion
    pub fn finished(&self) -> Vec<String> {
        self.finished.lock().unwrap().clone()
    }

    pub fn times_seen(&self, path: &str) -> usize {
        let line = format!("GET {}\n", path);
        self.seen().iter().filter(|s| **s == line).count()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn exchange(&self, request: &SearchRequest) -> onion_spider::Result<Vec<u8>> {
        self.seen.lock().unwrap().push(request.as_str().to_string());

        if let Some(delay) = self.delays.get(request.path()) {
            tokio::time::sleep(*delay).await;
        }
        self.finished.lock().unwrap().push(request.as_str().to_string());

        if self.failures.iter().any(|p| p == request.path()) {
            return Err(SpiderError::Io {
                request: request.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::ConnectionReset, "circuit closed"),
            });
        }

        self.pages
            .get(request.path())
            .map(|body| body.as_bytes().to_vec())
            .ok_or_else(|| SpiderError::Io {
                request: request.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no stub page"),
            })
    }
}

/// Replies with the request line it was sent
pub struct EchoTransport;

#[async_trait]
impl Transport for EchoTransport {
    async fn exchange(&self, request: &SearchRequest) -> onion_spider::Result<Vec<u8>> {
        Ok(request.as_bytes().to_vec())
    }
}

/// Path of page `index` for query `term`; page 1 is the plain search path
pub fn page_path(term: &str, index: u32) -> String {
    if index == 1 {
        format!("/search?query={}", term)
    } else {
        format!("/search?query={}&page={}", term, index)
    }
}

/// Renders a result page in the engine's default markup
///
/// `listed` are the page numbers shown in the pagination bar; `last` marks
/// the "next" control disabled.
pub fn results_page(term: &str, current: u32, listed: &[u32], last: bool) -> String {
    let mut items = String::from(r#"<li><a href="/search?query=prev">previous</a></li>"#);
    for &index in listed {
        let class = if index == current { r#" class="active""# } else { "" };
        items.push_str(&format!(
            r#"<li{}><a href="{}">{}</a></li>"#,
            class,
            page_path(term, index),
            index
        ));
    }
    if last {
        items.push_str(r#"<li class="disabled"><a>next</a></li>"#);
    } else {
        items.push_str(&format!(
            r#"<li><a href="{}">next</a></li>"#,
            page_path(term, current + 1)
        ));
    }

    format!(
        r#"<html><body>
        <span class="total-results"> 57 results </span>
        <div class="search-result"><h4>{term} hit {current}a</h4><a href="/host/{current}a">x</a></div>
        <div class="search-result"><h4>{term} hit {current}b</h4></div>
        <ul class="pagination">{items}</ul>
        </body></html>"#,
        term = term,
        current = current,
        items = items
    )
}

pub fn single_page(term: &str) -> String {
    format!(
        r#"<html><body>
        <span class="total-results">1 result</span>
        <div class="search-result"><h4>{} only hit</h4></div>
        </body></html>"#,
        term
    )
}

pub fn no_results_page() -> String {
    r#"<html><body><div class="no-results">Nothing found</div></body></html>"#.to_string()
}
