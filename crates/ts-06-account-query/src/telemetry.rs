//! # Telemetry
//!
//! Structured logging through `tracing-subscriber`: an `EnvFilter` plus
//! either human-readable or JSON output.

use std::env;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Filter directive, e.g. `info` or `ts_06_account_query=debug`.
    pub log_level: String,
    /// Emit JSON lines instead of pretty output.
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl TelemetryConfig {
    /// Reads the configuration from the environment.
    ///
    /// # Environment Variables
    ///
    /// - `TS_LOG_LEVEL` or `RUST_LOG`: filter directive (default: info)
    /// - `TS_JSON_LOGS`: JSON output when `true` or `1` (default: false)
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            log_level: env::var("TS_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),
            json_logs: env::var("TS_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(false),
        }
    }
}

/// Error raised when the global subscriber cannot be installed.
#[derive(Debug, thiserror::Error)]
#[error("tracing init failed: {0}")]
pub struct TelemetryError(String);

/// Installs the global subscriber.
///
/// # Errors
///
/// Fails on an invalid filter directive or when a subscriber is already set.
pub fn init_tracing(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter =
        EnvFilter::try_new(&config.log_level).map_err(|e| TelemetryError(e.to_string()))?;

    if config.json_logs {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true);
        tracing_subscriber::registry()
            .with(env_filter)
            .with(json_layer)
            .try_init()
            .map_err(|e| TelemetryError(e.to_string()))?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_ansi(true);
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError(e.to_string()))?;
    }

    tracing::info!(
        log_level = %config.log_level,
        json = config.json_logs,
        "tracing initialized"
    );
    Ok(())
}
