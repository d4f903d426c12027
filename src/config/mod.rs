//! Configuration module for bibliocrawl
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use bibliocrawl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("bibliocrawl.toml")).unwrap();
//! println!("Concurrency: {}", config.crawl.max_concurrent_pages_open);
//! ```

mod parser;
mod types;
mod validation;

pub use types::{
    parse_flag, Config, CrawlConfig, CrawlMode, OutputConfig, OutputFormat, SiteConfig,
    UserAgentConfig, DEFAULT_BASE_URL,
};

pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
