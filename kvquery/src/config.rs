//! Engine configuration module.
//!
//! This module provides configuration loading for the query engine from
//! environment variables.
//!
//! # Environment Variables
//!
//! - `KVQUERY_SCAN_WORKERS`: Number of range scan workers (default: `4`)
//! - `KVQUERY_FILTER_WORKERS`: Number of tuple filter workers (default: `4`)
//! - `KVQUERY_RESOLVE_CONCURRENCY`: Maximum directory list/open calls in
//!   flight while resolving (default: `4`)
//! - `KVQUERY_BYTE_ORDER`: Byte order of fixed-width values, `big` or
//!   `little` (default: `big`)
//!
//! # Invariants
//!
//! - Every worker count is at least 1

use thiserror::Error;

use crate::constants::DEFAULT_WORKERS;
use crate::storage::ByteOrder;

/// Engine configuration.
///
/// # Post-conditions
///
/// When constructed via `from_env()`, every worker count is at least 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Workers in the range scanner pool.
    pub scan_workers: usize,
    /// Workers in the tuple filter pool.
    pub filter_workers: usize,
    /// Maximum concurrent store calls made by the directory resolver.
    pub resolve_concurrency: usize,
    /// Byte order used to encode and decode fixed-width values.
    pub byte_order: ByteOrder,
}

/// Error returned when loading configuration fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scan_workers: DEFAULT_WORKERS,
            filter_workers: DEFAULT_WORKERS,
            resolve_concurrency: DEFAULT_WORKERS,
            byte_order: ByteOrder::Big,
        }
    }
}

impl EngineConfig {
    pub const SCAN_WORKERS_VAR: &'static str = "KVQUERY_SCAN_WORKERS";
    pub const FILTER_WORKERS_VAR: &'static str = "KVQUERY_FILTER_WORKERS";
    pub const RESOLVE_CONCURRENCY_VAR: &'static str = "KVQUERY_RESOLVE_CONCURRENCY";
    pub const BYTE_ORDER_VAR: &'static str = "KVQUERY_BYTE_ORDER";

    /// Load configuration from environment variables.
    ///
    /// Unset variables take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but is not a positive integer
    /// (worker counts) or one of `big` and `little` (byte order).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            scan_workers: load_count(&lookup, Self::SCAN_WORKERS_VAR, defaults.scan_workers)?,
            filter_workers: load_count(&lookup, Self::FILTER_WORKERS_VAR, defaults.filter_workers)?,
            resolve_concurrency: load_count(
                &lookup,
                Self::RESOLVE_CONCURRENCY_VAR,
                defaults.resolve_concurrency,
            )?,
            byte_order: load_byte_order(&lookup, defaults.byte_order)?,
        })
    }

    #[must_use]
    pub const fn with_scan_workers(mut self, workers: usize) -> Self {
        self.scan_workers = workers;
        self
    }

    #[must_use]
    pub const fn with_filter_workers(mut self, workers: usize) -> Self {
        self.filter_workers = workers;
        self
    }

    #[must_use]
    pub const fn with_resolve_concurrency(mut self, concurrency: usize) -> Self {
        self.resolve_concurrency = concurrency;
        self
    }

    #[must_use]
    pub const fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }
}

/// Load a worker count, falling back to `default` if unset.
fn load_count<F>(lookup: &F, name: &str, default: usize) -> Result<usize, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = lookup(name) else {
        return Ok(default);
    };
    match value.trim().parse::<usize>() {
        Ok(count) if count >= 1 => Ok(count),
        _ => Err(ConfigError::InvalidValue {
            name: name.to_string(),
            message: format!("'{value}' is not a positive integer"),
        }),
    }
}

fn load_byte_order<F>(lookup: &F, default: ByteOrder) -> Result<ByteOrder, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let name = EngineConfig::BYTE_ORDER_VAR;
    match lookup(name).as_deref().map(str::trim) {
        None => Ok(default),
        Some(value) if value.eq_ignore_ascii_case("big") => Ok(ByteOrder::Big),
        Some(value) if value.eq_ignore_ascii_case("little") => Ok(ByteOrder::Little),
        Some(value) => Err(ConfigError::InvalidValue {
            name: name.to_string(),
            message: format!("'{value}' is not a byte order (expected big or little)"),
        }),
    }
}
