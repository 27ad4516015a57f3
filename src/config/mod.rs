//! Configuration handling for the client.
//!
//! Everything is read from environment variables with development defaults
//! that point at a sentiment server on the local machine. `Config::from_env`
//! validates what it reads.

use std::env;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

use url::Url;

/// Environment variable names.
pub const ENV_SERVER_URL: &str = "FINANSWER_SERVER_URL";
pub const ENV_HEALTH_TIMEOUT_MS: &str = "FINANSWER_HEALTH_TIMEOUT_MS";
pub const ENV_ANALYZE_TIMEOUT_SECS: &str = "FINANSWER_ANALYZE_TIMEOUT_SECS";
pub const ENV_MAX_TEXT_CHARS: &str = "FINANSWER_MAX_TEXT_CHARS";
pub const ENV_MODEL_VERSION: &str = "FINANSWER_MODEL_VERSION";

/// Default values used when environment variables are absent.
const DEFAULT_SERVER_URL: &str = "http://localhost:5001";
const DEFAULT_HEALTH_TIMEOUT_MS: u64 = 3000;
const DEFAULT_ANALYZE_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_TEXT_CHARS: usize = 10_000;
const DEFAULT_MODEL_VERSION: &str = "1.0";

/// Client runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    server_url: Url,
    health_timeout: Duration,
    analyze_timeout: Duration,
    max_text_chars: usize,
    model_version: String,
}

impl Config {
    /// Load from environment variables, falling back to development defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let server_url = match env::var(ENV_SERVER_URL) {
            Ok(raw) => parse_server_url(&raw, ENV_SERVER_URL)?,
            Err(_) => default_server_url(),
        };
        let health_timeout = Duration::from_millis(parse_number(
            ENV_HEALTH_TIMEOUT_MS,
            DEFAULT_HEALTH_TIMEOUT_MS,
        )?);
        let analyze_timeout = Duration::from_secs(parse_number(
            ENV_ANALYZE_TIMEOUT_SECS,
            DEFAULT_ANALYZE_TIMEOUT_SECS,
        )?);
        let max_text_chars = parse_number(ENV_MAX_TEXT_CHARS, DEFAULT_MAX_TEXT_CHARS)?;
        let model_version =
            env::var(ENV_MODEL_VERSION).unwrap_or_else(|_| DEFAULT_MODEL_VERSION.to_string());

        if health_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: ENV_HEALTH_TIMEOUT_MS,
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            server_url,
            health_timeout,
            analyze_timeout,
            max_text_chars,
            model_version,
        })
    }

    /// Replace the server address, e.g. from a command-line flag.
    pub fn with_server_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.server_url = parse_server_url(raw, "server")?;
        Ok(self)
    }

    /// Base address of the sentiment server.
    pub fn server_url(&self) -> &Url {
        &self.server_url
    }
    /// Bound on the `/health` probe that precedes every analysis.
    pub fn health_timeout(&self) -> Duration {
        self.health_timeout
    }
    /// Bound on the `/analyze` call itself.
    pub fn analyze_timeout(&self) -> Duration {
        self.analyze_timeout
    }
    /// Longest page text sent for analysis; zero disables the check.
    pub fn max_text_chars(&self) -> usize {
        self.max_text_chars
    }
    /// Tag attached to feedback records.
    pub fn model_version(&self) -> &str {
        &self.model_version
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            health_timeout: Duration::from_millis(DEFAULT_HEALTH_TIMEOUT_MS),
            analyze_timeout: Duration::from_secs(DEFAULT_ANALYZE_TIMEOUT_SECS),
            max_text_chars: DEFAULT_MAX_TEXT_CHARS,
            model_version: DEFAULT_MODEL_VERSION.to_string(),
        }
    }
}

fn default_server_url() -> Url {
    Url::parse(DEFAULT_SERVER_URL).expect("default server url is valid")
}

fn parse_server_url(raw: &str, field: &'static str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidValue {
        field,
        reason: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidValue {
            field,
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }

    Ok(url)
}

fn parse_number<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            field: key,
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

/// Errors that can occur while building a configuration.
#[derive(Debug)]
pub enum ConfigError {
    InvalidValue { field: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl Error for ConfigError {}
