//! Server configuration module.
//!
//! Handles loading configuration from environment variables with sensible defaults.

use anyhow::{Context, Result};
use shared::config::LangfuseConfig;
use shared::dashboard::{DEFAULT_INFO_LIMIT, DEFAULT_INFO_LOOKBACK_HOURS};
use std::net::SocketAddr;
use std::str::FromStr;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => anyhow::bail!("Unknown log format: {other}"),
        }
    }
}

/// Server configuration.
///
/// Configuration values can be set via environment variables:
/// - `LLMSCOPE_HOST`: The host address to bind to (default: "0.0.0.0")
/// - `LLMSCOPE_PORT`: The port to listen on (default: 8080)
/// - `LLMSCOPE_INFO_LOOKBACK_HOURS`: How far back the `info` view looks (default: 24)
/// - `LLMSCOPE_INFO_LIMIT`: How many traces the `info` view lists (default: 10)
/// - `LLMSCOPE_LOG_FORMAT`: `pretty` or `json` (default: pretty)
/// - `LANGFUSE_*`: see [`LangfuseConfig`]
#[derive(Debug, Clone)]
pub struct Config {
    /// The host address to bind to.
    pub host: String,
    /// The port to listen on.
    pub port: u16,
    /// Lookback window of the `info` view, in hours.
    pub info_lookback_hours: i64,
    /// Maximum number of traces listed by the `info` view.
    pub info_limit: usize,
    /// Log output format.
    pub log_format: LogFormat,
    /// Trace store connection.
    pub langfuse: LangfuseConfig,
}

impl Config {
    /// Creates a new configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `LLMSCOPE_PORT` is set but cannot be parsed as a valid port number
    /// - `LLMSCOPE_INFO_LOOKBACK_HOURS` or `LLMSCOPE_INFO_LIMIT` cannot be parsed
    /// - `LLMSCOPE_LOG_FORMAT` names an unknown format
    /// - The Langfuse settings are missing or invalid
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("LLMSCOPE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = std::env::var("LLMSCOPE_PORT")
            .ok()
            .map(|p| p.parse::<u16>())
            .transpose()
            .context("LLMSCOPE_PORT must be a valid port number")?
            .unwrap_or(8080);

        let info_lookback_hours = std::env::var("LLMSCOPE_INFO_LOOKBACK_HOURS")
            .ok()
            .map(|h| h.parse::<i64>())
            .transpose()
            .context("LLMSCOPE_INFO_LOOKBACK_HOURS must be an integer")?
            .unwrap_or(DEFAULT_INFO_LOOKBACK_HOURS);

        let info_limit = std::env::var("LLMSCOPE_INFO_LIMIT")
            .ok()
            .map(|l| l.parse::<usize>())
            .transpose()
            .context("LLMSCOPE_INFO_LIMIT must be a positive integer")?
            .unwrap_or(DEFAULT_INFO_LIMIT);

        let log_format = log_format_from_env()?;

        let langfuse = LangfuseConfig::from_env()?;
        langfuse.validate_config()?;

        Ok(Self {
            host,
            port,
            info_lookback_hours,
            info_limit,
            log_format,
            langfuse,
        })
    }

    /// Returns the socket address for binding.
    ///
    /// # Panics
    ///
    /// Panics if the host and port combination cannot be parsed as a valid socket address.
    #[must_use]
    pub fn socket_addr(&self) -> SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .expect("Invalid socket address from config")
    }

    /// Returns the `info` view lookback as a duration.
    #[must_use]
    pub fn info_lookback(&self) -> chrono::Duration {
        chrono::Duration::hours(self.info_lookback_hours)
    }
}

/// Reads `LLMSCOPE_LOG_FORMAT`.
///
/// # Errors
///
/// Returns an error if the variable names an unknown format.
pub fn log_format_from_env() -> Result<LogFormat> {
    std::env::var("LLMSCOPE_LOG_FORMAT")
        .ok()
        .map(|f| f.parse::<LogFormat>())
        .transpose()
        .map(Option::unwrap_or_default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            info_lookback_hours: DEFAULT_INFO_LOOKBACK_HOURS,
            info_limit: DEFAULT_INFO_LIMIT,
            log_format: LogFormat::Pretty,
            langfuse: LangfuseConfig::new("", ""),
        }
    }
}
