//! Configuration module for Onion-Spider
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! A missing file is not an error for the binary: [`Config::default`] targets the
//! engine's current address and markup.
//!
//! # Example
//!
//! ```no_run
//! use onion_spider::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("spider.toml")).unwrap();
//! println!("Searching {}", config.engine.address);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, EngineConfig, MarkupConfig, ProxyConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
