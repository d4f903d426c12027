use crate::config::types::{
    Config, CrawlConfig, CrawlMode, OutputConfig, SiteConfig, UserAgentConfig,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_crawl_config(&config.crawl)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the target site
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must use http or https, got '{}'",
            config.base_url
        )));
    }

    Ok(())
}

/// Validates crawl configuration
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.mode == CrawlMode::List {
        let list_name = config.list_name.as_deref().unwrap_or("").trim();
        if list_name.is_empty() {
            return Err(ConfigError::Validation(
                "list-name is required in list mode".to_string(),
            ));
        }

        if config.start_page < 1 {
            return Err(ConfigError::Validation(format!(
                "start-page must be >= 1, got {}",
                config.start_page
            )));
        }

        if config.end_page < config.start_page {
            return Err(ConfigError::Validation(format!(
                "end-page ({}) must not be before start-page ({})",
                config.end_page, config.start_page
            )));
        }
    }

    if config.max_concurrent_pages_open < 1 || config.max_concurrent_pages_open > 100 {
        return Err(ConfigError::Validation(format!(
            "max-concurrent-pages-open must be between 1 and 100, got {}",
            config.max_concurrent_pages_open
        )));
    }

    if config.max_pages == Some(0) {
        return Err(ConfigError::Validation(
            "max-pages must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
