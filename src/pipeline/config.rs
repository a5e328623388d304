//! Statistics pipeline configuration from environment variables

use std::env;
use std::time::Duration;

#[derive(Debug)]
pub enum ConfigError {
    InvalidValue(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue(msg) => write!(f, "Invalid configuration value: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Configuration for the statistics runtime
///
/// Loaded from environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsConfig {
    /// Length of one window bucket in milliseconds
    pub bucket_duration_ms: u64,

    /// Number of buckets in the window
    pub bucket_count: usize,

    /// Channel buffer size for transaction ingestion
    pub channel_buffer: usize,

    /// How often the ingestion task logs the current summary (milliseconds)
    pub report_interval_ms: u64,
}

impl Default for StatsConfig {
    /// 60 seconds at millisecond resolution
    fn default() -> Self {
        Self {
            bucket_duration_ms: 1,
            bucket_count: 60_000,
            channel_buffer: 10_000,
            report_interval_ms: 5_000,
        }
    }
}

impl StatsConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `STATS_BUCKET_DURATION_MS` (default: 1)
    /// - `STATS_BUCKET_COUNT` (default: 60000)
    /// - `STATS_CHANNEL_BUFFER` (default: 10000)
    /// - `STATS_REPORT_INTERVAL_MS` (default: 5000)
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            bucket_duration_ms: positive_var("STATS_BUCKET_DURATION_MS", defaults.bucket_duration_ms)?,
            bucket_count: positive_var("STATS_BUCKET_COUNT", defaults.bucket_count)?,
            channel_buffer: positive_var("STATS_CHANNEL_BUFFER", defaults.channel_buffer)?,
            report_interval_ms: positive_var("STATS_REPORT_INTERVAL_MS", defaults.report_interval_ms)?,
        })
    }

    pub fn bucket_duration(&self) -> Duration {
        Duration::from_millis(self.bucket_duration_ms)
    }

    pub fn window_length(&self) -> Duration {
        Duration::from_millis(self.bucket_duration_ms.saturating_mul(self.bucket_count as u64))
    }
}

fn positive_var<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialEq + Default,
{
    let raw = match env::var(name) {
        Ok(raw) => raw,
        Err(_) => return Ok(default),
    };

    let value = raw
        .trim()
        .parse::<T>()
        .map_err(|_| ConfigError::InvalidValue(format!("{}={:?} is not a number", name, raw)))?;

    if value == T::default() {
        return Err(ConfigError::InvalidValue(format!("{} must be > 0", name)));
    }

    Ok(value)
}
