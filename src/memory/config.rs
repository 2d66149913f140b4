/*!
 * Pool Configuration
 *
 * Arena sizing and limits, from code or from the environment
 */

use super::types::{PoolError, PoolResult};
use crate::core::limits::{
    DEFAULT_INITIAL_CAPACITY, ENV_ALLOCATION_LIMIT, ENV_INITIAL_CAPACITY, SMALL_INITIAL_CAPACITY,
    TESTING_INITIAL_CAPACITY,
};
use crate::core::types::Size;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Pool configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Bytes reserved for the first arena chunk
    pub initial_capacity: Size,
    /// Upper bound on total arena bytes; `None` grows until the system refuses
    pub allocation_limit: Option<Size>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            allocation_limit: None,
        }
    }
}

impl PoolConfig {
    /// Configuration for short-lived scratch pools
    pub const fn small() -> Self {
        Self {
            initial_capacity: SMALL_INITIAL_CAPACITY,
            allocation_limit: None,
        }
    }

    /// Tiny arena that grows early, for tests
    pub const fn testing() -> Self {
        Self {
            initial_capacity: TESTING_INITIAL_CAPACITY,
            allocation_limit: None,
        }
    }

    pub const fn with_initial_capacity(mut self, initial_capacity: Size) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    pub const fn with_allocation_limit(mut self, limit: Size) -> Self {
        self.allocation_limit = Some(limit);
        self
    }

    /// Read configuration from the environment
    ///
    /// Environment variables:
    /// - POOL_INITIAL_CAPACITY: initial arena bytes (default: 1MB)
    /// - POOL_ALLOCATION_LIMIT: total arena byte limit (default: unlimited)
    ///
    /// Unparseable or invalid values fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let config = Self {
            initial_capacity: read_size(ENV_INITIAL_CAPACITY)
                .unwrap_or(defaults.initial_capacity),
            allocation_limit: read_size(ENV_ALLOCATION_LIMIT).or(defaults.allocation_limit),
        };

        match config.validate() {
            Ok(()) => config,
            Err(e) => {
                warn!(error = %e, "Ignoring pool configuration from environment");
                defaults
            }
        }
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> PoolResult<()> {
        if self.initial_capacity == 0 {
            return Err(PoolError::InvalidConfig(
                "initial capacity must be greater than zero".into(),
            ));
        }

        if let Some(limit) = self.allocation_limit {
            if limit < self.initial_capacity {
                return Err(PoolError::InvalidConfig(format!(
                    "allocation limit {} is below initial capacity {}",
                    limit, self.initial_capacity
                )));
            }
        }

        Ok(())
    }
}

fn read_size(key: &str) -> Option<Size> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse::<Size>() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, value = %raw, error = %e, "Invalid size in environment");
            None
        }
    }
}
