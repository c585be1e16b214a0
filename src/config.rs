//! Configuration for the redemption controller and the portal API.
//!
//! Values come from builder methods or from the environment:
//!
//! | Variable | Default |
//! |----------|---------|
//! | `PORTAL_REDEEM_TIME_UNIT_MS` | 1000 |
//! | `PORTAL_REDEEM_REPEAT_SUPPRESSION_MS` | unset (off) |
//! | `PORTAL_API_URL` | `http://localhost:8080/api` |
//! | `PORTAL_API_TOKEN` | unset |
//! | `PORTAL_API_TIMEOUT_SECS` | 10 |

use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

/// Display window after a rejected validation, in time units.
pub const VALIDATION_FAILURE_UNITS: u32 = 3;
/// Display window after a successful commit, in time units.
pub const SUCCESS_UNITS: u32 = 5;
/// Display window after a failed commit, in time units.
pub const COMMIT_FAILURE_UNITS: u32 = 2;

const ENV_TIME_UNIT_MS: &str = "PORTAL_REDEEM_TIME_UNIT_MS";
const ENV_REPEAT_SUPPRESSION_MS: &str = "PORTAL_REDEEM_REPEAT_SUPPRESSION_MS";
const ENV_API_URL: &str = "PORTAL_API_URL";
const ENV_API_TOKEN: &str = "PORTAL_API_TOKEN";
const ENV_API_TIMEOUT_SECS: &str = "PORTAL_API_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },
}

/// Timing configuration for the redemption controller.
///
/// # Example
///
/// ```
/// use portal_redeem::config::RedemptionConfig;
/// use std::time::Duration;
///
/// let config = RedemptionConfig::default().with_time_unit(Duration::from_millis(500));
/// assert_eq!(config.success_delay(), Duration::from_millis(2500));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RedemptionConfig {
    /// Length of one time unit (default: 1s)
    pub time_unit: Duration,
    /// Units shown after a rejected validation or missing context (default: 3)
    pub validation_failure_units: u32,
    /// Units shown after a successful redemption (default: 5)
    pub success_units: u32,
    /// Units shown after a failed commit (default: 2)
    pub commit_failure_units: u32,
    /// Ignore a re-scan of the previous token for this long after re-arming
    pub repeat_suppression: Option<Duration>,
}

impl Default for RedemptionConfig {
    fn default() -> Self {
        Self {
            time_unit: Duration::from_secs(1),
            validation_failure_units: VALIDATION_FAILURE_UNITS,
            success_units: SUCCESS_UNITS,
            commit_failure_units: COMMIT_FAILURE_UNITS,
            repeat_suppression: None,
        }
    }
}

impl RedemptionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_time_unit(mut self, time_unit: Duration) -> Self {
        self.time_unit = time_unit;
        self
    }

    pub fn with_repeat_suppression(mut self, window: Duration) -> Self {
        self.repeat_suppression = Some(window);
        self
    }

    pub fn validation_failure_delay(&self) -> Duration {
        self.time_unit * self.validation_failure_units
    }

    pub fn success_delay(&self) -> Duration {
        self.time_unit * self.success_units
    }

    pub fn commit_failure_delay(&self) -> Duration {
        self.time_unit * self.commit_failure_units
    }

    /// Load from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(ms) = parse_u64(&lookup, ENV_TIME_UNIT_MS)? {
            if ms == 0 {
                return Err(invalid(ENV_TIME_UNIT_MS, "0"));
            }
            config.time_unit = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_u64(&lookup, ENV_REPEAT_SUPPRESSION_MS)? {
            config.repeat_suppression = (ms > 0).then(|| Duration::from_millis(ms));
        }
        Ok(config)
    }
}

/// Connection settings for the portal API.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    /// Base URL without trailing slash
    pub base_url: String,
    /// Bearer token sent with every request
    pub api_token: Option<String>,
    /// Per-request timeout enforced by the transport
    pub request_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            api_token: None,
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::default().with_base_url(base_url)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Load from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(url) = lookup(ENV_API_URL).filter(|u| !u.trim().is_empty()) {
            config = config.with_base_url(url.trim());
        }
        if let Some(token) = lookup(ENV_API_TOKEN).filter(|t| !t.trim().is_empty()) {
            config.api_token = Some(token.trim().to_string());
        }
        if let Some(secs) = parse_u64(&lookup, ENV_API_TIMEOUT_SECS)? {
            if secs == 0 {
                return Err(invalid(ENV_API_TIMEOUT_SECS, "0"));
            }
            config.request_timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }
}

fn parse_u64<F>(lookup: &F, key: &str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| invalid(key, &raw)),
    }
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}
