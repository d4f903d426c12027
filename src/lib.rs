//! Bibliocrawl: book and author extraction from a book-cataloging site
//!
//! This crate crawls list, book and author pages and turns their
//! semi-structured HTML into typed [`Record`]s. The extraction core
//! (`extract`, `loader`, `page`, `crawl`) is synchronous and I/O free; the
//! `engine` module drives it against the network.

pub mod config;
pub mod crawl;
pub mod engine;
pub mod extract;
pub mod loader;
pub mod output;
pub mod page;
pub mod record;
pub mod url;

use thiserror::Error;

/// Main error type for bibliocrawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for bibliocrawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawl::{Emission, FollowUp, Orchestrator, PageFetched, ParserRole};
pub use record::{Author, Book, RatingHistogram, Record};
