//! Request construction for the engine's line protocol
//!
//! The engine accepts a single plaintext line per connection:
//! `GET <path>\n`, with no headers and no protocol version token. The exact
//! request string doubles as the crawl's deduplication key.

use crate::config::EngineConfig;
use std::fmt;

const VERB: &str = "GET ";
const TERMINATOR: char = '\n';

/// A normalized protocol request line
///
/// Always starts with `GET ` and ends with a single `\n`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SearchRequest(String);

impl SearchRequest {
    fn from_path(path: &str) -> Self {
        let mut line = String::with_capacity(VERB.len() + path.len() + 1);
        line.push_str(VERB);
        line.push_str(path);
        line.push(TERMINATOR);
        Self(line)
    }

    /// The full request line, including verb and terminator
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The bytes written to the wire
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// The requested path, without verb and terminator
    pub fn path(&self) -> &str {
        &self.0[VERB.len()..self.0.len() - 1]
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for SearchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

impl AsRef<str> for SearchRequest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Turns search terms and paths into request lines for one engine
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    search_prefix: String,
    delimiter: String,
}

impl RequestBuilder {
    pub fn new(search_prefix: impl Into<String>, delimiter: impl Into<String>) -> Self {
        Self {
            search_prefix: search_prefix.into(),
            delimiter: delimiter.into(),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(&config.search_prefix, &config.delimiter)
    }

    pub fn search_prefix(&self) -> &str {
        &self.search_prefix
    }

    /// Builds the request line for `input`
    ///
    /// # Rules
    ///
    /// | Input | Request |
    /// |-------|---------|
    /// | starts with `/` | `GET <input>\n` (exact resource) |
    /// | contains the delimiter, not at the start | `GET <prefix><text before first delimiter>\n` |
    /// | anything else | `GET <prefix><input>\n` |
    ///
    /// `input` must not be empty; callers reject empty queries first.
    ///
    /// # Example
    ///
    /// ```
    /// use onion_spider::request::RequestBuilder;
    ///
    /// let builder = RequestBuilder::new("/search?query=", "&");
    /// assert_eq!(builder.build("nginx&page=2").as_str(), "GET /search?query=nginx\n");
    /// assert_eq!(builder.build("/about").as_str(), "GET /about\n");
    /// ```
    pub fn build(&self, input: &str) -> SearchRequest {
        if input.starts_with('/') {
            return SearchRequest::from_path(input);
        }

        let term = match input.split_once(self.delimiter.as_str()) {
            Some((head, _)) if !head.is_empty() => head,
            _ => input,
        };

        SearchRequest::from_path(&format!("{}{}", self.search_prefix, term))
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}
