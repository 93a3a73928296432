//! Transport to the search engine
//!
//! This module handles the connection to the onion engine:
//! - One SOCKS5 connection through the local Tor proxy per request
//! - Writing the request line and reading the response to end of stream
//! - Connect and read timeouts
//!
//! There is no connection reuse and no retry; every failure is fatal for the
//! request that hit it.

use crate::config::{EngineConfig, ProxyConfig};
use crate::request::SearchRequest;
use crate::{ConfigError, Result, SpiderError};
use async_trait::async_trait;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::time::timeout;
use tokio_socks::tcp::Socks5Stream;

/// A single request/response exchange with the engine
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `request` and returns the complete response
    async fn exchange(&self, request: &SearchRequest) -> Result<Vec<u8>>;
}

/// Transport that reaches the engine through a Tor SOCKS5 proxy
#[derive(Debug, Clone)]
pub struct TorTransport {
    proxy: SocketAddr,
    target: String,
    connect_timeout: Duration,
    read_timeout: Duration,
}

impl TorTransport {
    /// Creates a transport with default timeouts
    ///
    /// # Arguments
    ///
    /// * `proxy` - Address of the Tor SOCKS5 listener
    /// * `target` - Engine address as `host:port`; the proxy resolves the host
    pub fn new(proxy: SocketAddr, target: impl Into<String>) -> Self {
        let defaults = ProxyConfig::default();
        Self {
            proxy,
            target: target.into(),
            connect_timeout: Duration::from_secs(defaults.connect_timeout_secs),
            read_timeout: Duration::from_secs(defaults.read_timeout_secs),
        }
    }

    /// Builds a transport from the engine and proxy configuration
    pub fn from_config(engine: &EngineConfig, proxy: &ProxyConfig) -> Result<Self> {
        let proxy_addr = proxy.address.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidAddress(format!("Invalid proxy address '{}': {}", proxy.address, e))
        })?;

        Ok(Self::new(proxy_addr, engine.address.clone()).with_timeouts(
            Duration::from_secs(proxy.connect_timeout_secs),
            Duration::from_secs(proxy.read_timeout_secs),
        ))
    }

    pub fn with_timeouts(mut self, connect: Duration, read: Duration) -> Self {
        self.connect_timeout = connect;
        self.read_timeout = read;
        self
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}

#[async_trait]
impl Transport for TorTransport {
    async fn exchange(&self, request: &SearchRequest) -> Result<Vec<u8>> {
        tracing::trace!("Connecting to {} via {}", self.target, self.proxy);

        let connect = Socks5Stream::connect(self.proxy, self.target.as_str());
        let mut stream = timeout(self.connect_timeout, connect)
            .await
            .map_err(|_| SpiderError::Timeout {
                request: request.to_string(),
            })?
            .map_err(|source| SpiderError::Connect {
                target: self.target.clone(),
                source,
            })?;

        let round_trip = async {
            stream.write_all(request.as_bytes()).await?;
            stream.flush().await?;

            let mut response = Vec::new();
            stream.read_to_end(&mut response).await?;
            Ok::<_, std::io::Error>(response)
        };

        let response = timeout(self.read_timeout, round_trip)
            .await
            .map_err(|_| SpiderError::Timeout {
                request: request.to_string(),
            })?
            .map_err(|source| SpiderError::Io {
                request: request.to_string(),
                source,
            })?;

        tracing::debug!("Received {} bytes for {}", response.len(), request);
        Ok(response)
    }
}
