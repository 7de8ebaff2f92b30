use crate::config::types::{Config, CrawlerConfig, UserAgentConfig};
use crate::url::resolve_url;
use crate::{ConfigError, ConfigResult};
use url::Url;

/// Upper bound on `max-depth`
const MAX_DEPTH_LIMIT: usize = 64;

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> ConfigResult<()> {
    if let Some(root_url) = config.root_url.as_deref() {
        resolve_url(None, root_url).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid root-url '{}': {}", root_url, e))
        })?;
    }

    if config.max_depth > MAX_DEPTH_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max_depth must be <= {}, got {}",
            MAX_DEPTH_LIMIT, config.max_depth
        )));
    }

    if config.timeout_secs < 1 || config.timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be between 1 and 300, got {}",
            config.timeout_secs
        )));
    }

    if config.rate_limit < 1 || config.rate_limit > 1000 {
        return Err(ConfigError::Validation(format!(
            "rate_limit must be between 1 and 1000, got {}",
            config.rate_limit
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> ConfigResult<()> {
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

/// Basic email validation
fn validate_email(email: &str) -> ConfigResult<()> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    // Must contain exactly one @ with text on both sides
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

    // Domain part should contain at least one dot
    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> Config {
        Config::default()
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&create_test_config()).is_ok());
    }

    #[test]
    fn test_root_url_must_be_absolute_http() {
        let mut config = create_test_config();

        config.crawler.root_url = Some("https://example.com".to_string());
        assert!(validate(&config).is_ok());

        config.crawler.root_url = Some("/relative".to_string());
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));

        config.crawler.root_url = Some("ftp://example.com/".to_string());
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_crawler_bounds() {
        let mut config = create_test_config();
        config.crawler.max_depth = 65;
        assert!(validate(&config).is_err());

        let mut config = create_test_config();
        config.crawler.max_depth = 0;
        assert!(validate(&config).is_ok());

        let mut config = create_test_config();
        config.crawler.timeout_secs = 0;
        assert!(validate(&config).is_err());

        let mut config = create_test_config();
        config.crawler.rate_limit = 1001;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_crawler_name() {
        let mut config = create_test_config();
        config.user_agent.crawler_name = "Audit-Bot2".to_string();
        assert!(validate(&config).is_ok());

        config.user_agent.crawler_name = "Audit Bot".to_string();
        assert!(validate(&config).is_err());

        config.user_agent.crawler_name = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("admin@sub.example.com").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@").is_err());
        assert!(validate_email("user@domain").is_err());
        assert!(validate_email("a@b@example.com").is_err());
    }
}
