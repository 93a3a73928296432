use crate::config::types::{Config, CrawlerConfig, EngineConfig, MarkupConfig, ProxyConfig};
use crate::page::Markup;
use crate::ConfigError;
use std::net::SocketAddr;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_engine_config(&config.engine)?;
    validate_proxy_config(&config.proxy)?;
    validate_crawler_config(&config.crawler)?;
    validate_markup_config(&config.markup)?;
    Ok(())
}

/// Validates the target engine configuration
fn validate_engine_config(config: &EngineConfig) -> Result<(), ConfigError> {
    validate_host_port(&config.address)?;

    if !config.search_prefix.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "search-prefix must start with '/', got '{}'",
            config.search_prefix
        )));
    }

    if config.search_prefix.contains(char::is_whitespace) {
        return Err(ConfigError::Validation(format!(
            "search-prefix cannot contain whitespace, got '{}'",
            config.search_prefix
        )));
    }

    if config.delimiter.is_empty() {
        return Err(ConfigError::Validation(
            "delimiter cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the Tor proxy configuration
fn validate_proxy_config(config: &ProxyConfig) -> Result<(), ConfigError> {
    config.address.parse::<SocketAddr>().map_err(|e| {
        ConfigError::InvalidAddress(format!("Invalid proxy address '{}': {}", config.address, e))
    })?;

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "connect-timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.read_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "read-timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.page_buffer < 1 || config.page_buffer > 1024 {
        return Err(ConfigError::Validation(format!(
            "page-buffer must be between 1 and 1024, got {}",
            config.page_buffer
        )));
    }

    Ok(())
}

/// Validates markup selectors and labels
fn validate_markup_config(config: &MarkupConfig) -> Result<(), ConfigError> {
    if config.previous_label.trim().is_empty() || config.next_label.trim().is_empty() {
        return Err(ConfigError::Validation(
            "previous-label and next-label cannot be empty".to_string(),
        ));
    }

    Markup::compile(config).map(|_| ())
}

/// Validates a `host:port` pair such as `example.onion:80`
fn validate_host_port(address: &str) -> Result<(), ConfigError> {
    let (host, port) = address.rsplit_once(':').ok_or_else(|| {
        ConfigError::InvalidAddress(format!("Engine address '{}' must be host:port", address))
    })?;

    if host.is_empty()
        || !host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::InvalidAddress(format!(
            "Engine host '{}' contains invalid characters",
            host
        )));
    }

    port.parse::<u16>().map_err(|_| {
        ConfigError::InvalidAddress(format!("Engine port '{}' is not a valid port", port))
    })?;

    Ok(())
}
