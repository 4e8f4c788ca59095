//! Connection settings for the Langfuse trace store.

use std::time::Duration;
use thiserror::Error;
use validator::Validate;

/// Default Langfuse endpoint.
pub const DEFAULT_BASE_URL: &str = "https://cloud.langfuse.com";

/// Default request timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default page size when listing observations (the API maximum).
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Errors that can occur while loading or validating the Langfuse settings.
#[derive(Debug, Error)]
pub enum LangfuseConfigError {
    /// A numeric variable could not be parsed.
    #[error("{name} must be a positive integer, got {value:?}")]
    InvalidNumber {
        /// Variable name.
        name: &'static str,
        /// Raw value.
        value: String,
    },

    /// Validation failed with details.
    #[error("Invalid Langfuse configuration: {0}")]
    ValidationError(#[from] validator::ValidationErrors),
}

/// Langfuse API settings.
///
/// Configuration values can be set via environment variables:
/// - `LANGFUSE_BASE_URL`: API endpoint (default: <https://cloud.langfuse.com>)
/// - `LANGFUSE_PUBLIC_KEY`: project public key
/// - `LANGFUSE_SECRET_KEY`: project secret key
/// - `LANGFUSE_TIMEOUT_SECS`: request timeout (default: 30)
/// - `LANGFUSE_PAGE_SIZE`: observations per page, 1 to 100 (default: 100)
#[derive(Clone, Validate)]
pub struct LangfuseConfig {
    /// API endpoint, without a trailing slash.
    #[validate(url(message = "LANGFUSE_BASE_URL must be a valid URL"))]
    pub base_url: String,

    /// Project public key, used as the basic-auth user.
    #[validate(length(min = 1, message = "LANGFUSE_PUBLIC_KEY must be set"))]
    pub public_key: String,

    /// Project secret key, used as the basic-auth password.
    #[validate(length(min = 1, message = "LANGFUSE_SECRET_KEY must be set"))]
    pub secret_key: String,

    /// Per-request timeout.
    pub timeout: Duration,

    /// Observations requested per page.
    #[validate(range(min = 1, max = 100, message = "LANGFUSE_PAGE_SIZE must be between 1 and 100"))]
    pub page_size: u32,
}

impl LangfuseConfig {
    /// Creates a configuration with default endpoint and timeouts.
    #[must_use]
    pub fn new(public_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            public_key: public_key.into(),
            secret_key: secret_key.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Sets the API endpoint. A trailing slash is removed.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the observation page size.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Loads the configuration from environment variables.
    ///
    /// Missing keys load as empty strings; call [`LangfuseConfig::validate_config`]
    /// to reject them.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, LangfuseConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads the configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable is set but cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LangfuseConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new(
            lookup("LANGFUSE_PUBLIC_KEY").unwrap_or_default(),
            lookup("LANGFUSE_SECRET_KEY").unwrap_or_default(),
        );

        if let Some(base_url) = lookup("LANGFUSE_BASE_URL").filter(|v| !v.is_empty()) {
            config = config.with_base_url(base_url);
        }
        if let Some(raw) = lookup("LANGFUSE_TIMEOUT_SECS") {
            let secs = parse_number::<u64>("LANGFUSE_TIMEOUT_SECS", raw)?;
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Some(raw) = lookup("LANGFUSE_PAGE_SIZE") {
            config = config.with_page_size(parse_number("LANGFUSE_PAGE_SIZE", raw)?);
        }

        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The base URL is not a valid URL
    /// - Either key is empty
    /// - The page size is outside 1..=100
    pub fn validate_config(&self) -> Result<(), LangfuseConfigError> {
        self.validate()?;
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(
    name: &'static str,
    raw: String,
) -> Result<T, LangfuseConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| LangfuseConfigError::InvalidNumber { name, value: raw })
}

impl std::fmt::Debug for LangfuseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LangfuseConfig")
            .field("base_url", &self.base_url)
            .field("public_key", &self.public_key)
            .field("secret_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("page_size", &self.page_size)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = LangfuseConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.page_size, 100);
        assert!(config.public_key.is_empty());
    }

    #[test]
    fn test_config_from_lookup() {
        let config = LangfuseConfig::from_lookup(lookup(&[
            ("LANGFUSE_PUBLIC_KEY", "pk-lf-1"),
            ("LANGFUSE_SECRET_KEY", "sk-lf-1"),
            ("LANGFUSE_BASE_URL", "http://localhost:3000/"),
            ("LANGFUSE_TIMEOUT_SECS", "5"),
            ("LANGFUSE_PAGE_SIZE", "25"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.public_key, "pk-lf-1");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.page_size, 25);
        assert!(config.validate_config().is_ok());
    }

    #[test]
    fn test_config_invalid_timeout() {
        let result = LangfuseConfig::from_lookup(lookup(&[("LANGFUSE_TIMEOUT_SECS", "soon")]));

        assert!(matches!(
            result,
            Err(LangfuseConfigError::InvalidNumber {
                name: "LANGFUSE_TIMEOUT_SECS",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_missing_keys() {
        let config = LangfuseConfig::new("", "sk");

        let Err(LangfuseConfigError::ValidationError(errors)) = config.validate_config() else {
            panic!("expected validation error");
        };

        let fields = errors.field_errors();
        assert!(fields.contains_key("public_key"));
        assert!(!fields.contains_key("secret_key"));
    }

    #[test]
    fn test_validate_bad_url_and_page_size() {
        let config = LangfuseConfig::new("pk", "sk").with_base_url("not a url");
        assert!(config.validate_config().is_err());

        let config = LangfuseConfig::new("pk", "sk").with_page_size(0);
        assert!(config.validate_config().is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = LangfuseConfig::new("pk-lf-1", "sk-lf-secret");

        let debug = format!("{config:?}");

        assert!(debug.contains("pk-lf-1"));
        assert!(!debug.contains("sk-lf-secret"));
    }
}
