use crate::ConfigError;
use serde::{Deserialize, Deserializer};
use url::Url;

/// Site crawled when no base URL is configured
pub const DEFAULT_BASE_URL: &str = "https://www.goodreads.com/";

/// Main configuration structure for bibliocrawl
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    pub crawl: CrawlConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Target site configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Root URL every seed is built from
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Where a crawl starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrawlMode {
    /// Walk a range of list pages, then their books and authors
    #[default]
    List,
    /// Start from author-rich pages and follow author links
    Author,
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    #[serde(default)]
    pub mode: CrawlMode,

    /// List identifier, e.g. "1.Best_Books_Ever"
    #[serde(rename = "list-name", default)]
    pub list_name: Option<String>,

    /// First list page to visit
    #[serde(rename = "start-page", default = "default_page")]
    pub start_page: u32,

    /// Last list page to visit (inclusive)
    #[serde(rename = "end-page", default = "default_page")]
    pub end_page: u32,

    /// Whether author pages discover further author pages
    ///
    /// Accepts a boolean or one of the strings "true", "yes", "y".
    #[serde(rename = "author-crawl", default, deserialize_with = "deserialize_flag")]
    pub author_crawl: bool,

    /// Maximum number of concurrent page fetches
    #[serde(
        rename = "max-concurrent-pages-open",
        default = "default_max_concurrent_pages_open"
    )]
    pub max_concurrent_pages_open: u32,

    /// Minimum time between two request dispatches (milliseconds)
    #[serde(
        rename = "minimum-time-between-requests",
        default = "default_minimum_time_between_requests"
    )]
    pub minimum_time_between_requests: u64,

    /// Stop after this many fetched pages
    #[serde(rename = "max-pages", default)]
    pub max_pages: Option<u64>,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Record sink format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One JSON object per line
    #[default]
    Jsonl,
    /// SQLite database with `books` and `authors` tables
    Sqlite,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    /// Path of the JSON Lines file or SQLite database
    pub path: String,
}

/// Interprets a loosely typed boolean
///
/// "true", "yes" and "y" (any case, surrounding whitespace ignored) are
/// true; everything else is false.
///
/// # Examples
///
/// ```
/// use bibliocrawl::config::parse_flag;
///
/// assert!(parse_flag("Yes"));
/// assert!(!parse_flag("False"));
/// assert!(!parse_flag("1"));
/// ```
pub fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "yes" | "y")
}

fn deserialize_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum LooseFlag {
        Bool(bool),
        Text(String),
    }

    Ok(match LooseFlag::deserialize(deserializer)? {
        LooseFlag::Bool(value) => value,
        LooseFlag::Text(text) => parse_flag(&text),
    })
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_page() -> u32 {
    1
}

fn default_max_concurrent_pages_open() -> u32 {
    4
}

fn default_minimum_time_between_requests() -> u64 {
    250
}

impl Config {
    /// The base URL with a guaranteed trailing slash
    ///
    /// Relative seed paths are joined onto this, so a base such as
    /// `http://host/mirror` must keep its last path segment.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let mut url = Url::parse(&self.site.base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(url)
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// Format: `{name}/{version} (+{url}; {email})`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}
