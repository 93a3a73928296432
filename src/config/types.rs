use serde::Deserialize;

/// Main configuration structure for Onion-Spider
///
/// Every section is optional; missing sections and keys fall back to the
/// defaults matching the engine's current markup.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub proxy: ProxyConfig,
    pub crawler: CrawlerConfig,
    pub markup: MarkupConfig,
}

/// Target search engine configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Onion address of the engine as `host:port`
    pub address: String,

    /// Path prefix for keyword searches
    #[serde(rename = "search-prefix")]
    pub search_prefix: String,

    /// Token that truncates free-text input
    pub delimiter: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            address: "ichidanv34wrx7m7.onion:80".to_string(),
            search_prefix: "/search?query=".to_string(),
            delimiter: "&".to_string(),
        }
    }
}

/// Tor SOCKS5 proxy configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Socket address of the local Tor SOCKS5 listener
    pub address: String,

    /// Time allowed for the SOCKS handshake and circuit setup (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,

    /// Time allowed for writing the request and reading the full response (seconds)
    #[serde(rename = "read-timeout-secs")]
    pub read_timeout_secs: u64,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:9050".to_string(),
            connect_timeout_secs: 60,
            read_timeout_secs: 120,
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Capacity of the channel carrying result pages to the consumer
    #[serde(rename = "page-buffer")]
    pub page_buffer: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self { page_buffer: 16 }
    }
}

/// CSS selectors and labels describing the engine's result markup
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MarkupConfig {
    /// Element present only when a query matched nothing
    #[serde(rename = "no-results")]
    pub no_results: String,

    /// Container of the page-navigation controls
    pub pagination: String,

    /// Current-page marker inside the pagination container
    pub current: String,

    /// Marker of the disabled "next" control on the final page
    pub disabled: String,

    /// Element holding the reported total result count
    pub total: String,

    /// Page-link anchors inside the pagination container
    pub link: String,

    /// One element per search result
    pub result: String,

    /// Title element inside a search result
    #[serde(rename = "result-title")]
    pub result_title: String,

    #[serde(rename = "previous-label")]
    pub previous_label: String,

    #[serde(rename = "next-label")]
    pub next_label: String,
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            no_results: "div.no-results".to_string(),
            pagination: "ul.pagination".to_string(),
            current: "li.active".to_string(),
            disabled: "li.disabled".to_string(),
            total: "span.total-results".to_string(),
            link: "a".to_string(),
            result: "div.search-result".to_string(),
            result_title: "h4".to_string(),
            previous_label: "previous".to_string(),
            next_label: "next".to_string(),
        }
    }
}
