//! # Query Configuration
//!
//! Limits applied by the query service, loaded from the environment or
//! deserialized from a host configuration file.

use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

/// Default cap on accounts per batch request.
pub const DEFAULT_MAX_BULK_ACCOUNTS: usize = 100;
/// Default cap on get-method arguments.
pub const DEFAULT_MAX_METHOD_ARGS: usize = 64;

/// Rejected configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A limit is zero.
    #[error("{field} must be greater than zero")]
    ZeroLimit {
        /// Offending field.
        field: &'static str,
    },
}

/// Query service limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Most accounts one `get_accounts` call may name.
    pub max_bulk_accounts: usize,
    /// Most arguments one `exec_get_method` call may pass.
    pub max_method_args: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            max_bulk_accounts: DEFAULT_MAX_BULK_ACCOUNTS,
            max_method_args: DEFAULT_MAX_METHOD_ARGS,
        }
    }
}

impl QueryConfig {
    /// Reads limits from the environment, falling back to defaults for
    /// unset or unparsable values.
    ///
    /// # Environment Variables
    ///
    /// - `TS_MAX_BULK_ACCOUNTS`: batch size cap (default: 100)
    /// - `TS_MAX_METHOD_ARGS`: get-method argument cap (default: 64)
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            max_bulk_accounts: env::var("TS_MAX_BULK_ACCOUNTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_BULK_ACCOUNTS),
            max_method_args: env::var("TS_MAX_METHOD_ARGS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_METHOD_ARGS),
        }
    }

    /// Sets the batch size cap.
    #[must_use]
    pub fn with_max_bulk_accounts(mut self, max: usize) -> Self {
        self.max_bulk_accounts = max;
        self
    }

    /// Sets the argument cap.
    #[must_use]
    pub fn with_max_method_args(mut self, max: usize) -> Self {
        self.max_method_args = max;
        self
    }

    /// Checks the limits.
    ///
    /// # Errors
    ///
    /// [`ConfigError::ZeroLimit`] for a zero limit.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_bulk_accounts == 0 {
            return Err(ConfigError::ZeroLimit {
                field: "max_bulk_accounts",
            });
        }
        if self.max_method_args == 0 {
            return Err(ConfigError::ZeroLimit {
                field: "max_method_args",
            });
        }
        Ok(())
    }
}
