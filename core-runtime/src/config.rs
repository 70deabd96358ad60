//! # Runtime Configuration Module
//!
//! Provides configuration management for the evalsys runtime.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a
//! `RuntimeConfig` holding the worker pool settings and the logging setup.
//! Validation is fail-fast: [`RuntimeConfigBuilder::build`] rejects values the
//! pool or the log filter could not honor, before anything is started.
//!
//! ## Defaults
//!
//! - Worker threads: `min(32, available_parallelism + 4)`
//! - Thread name prefix: `evalsys-bg`
//! - Idle keep-alive: 60 seconds
//! - Logging: [`LoggingConfig::default`]
//!
//! ## Usage
//!
//! ```
//! use core_runtime::config::RuntimeConfig;
//! use core_runtime::logging::LogLevel;
//!
//! let config = RuntimeConfig::builder()
//!     .worker_threads(4)
//!     .thread_name("evalsys-io")
//!     .log_level(LogLevel::Debug)
//!     .build()
//!     .expect("valid configuration");
//!
//! assert_eq!(config.pool.size, 4);
//! ```
//!
//! ## Error Handling
//!
//! ```should_panic
//! use core_runtime::config::RuntimeConfig;
//!
//! // A pool without threads can never run anything
//! let config = RuntimeConfig::builder()
//!     .worker_threads(0)
//!     .build()
//!     .expect("Should fail - zero worker threads");
//! ```

use std::time::Duration;

use core_async::pool::PoolConfig;

use crate::error::{Error, Result};
use crate::logging::{self, LogFormat, LogLevel, LoggingConfig};

/// Hard upper bound on worker threads.
pub const MAX_WORKER_THREADS: usize = 512;

/// Runtime configuration for evalsys.
///
/// Use [`RuntimeConfigBuilder`] to construct instances.
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    /// Worker pool settings
    pub pool: PoolConfig,

    /// Logging setup
    pub logging: LoggingConfig,
}

impl RuntimeConfig {
    /// Creates a new builder for constructing a `RuntimeConfig`.
    pub fn builder() -> RuntimeConfigBuilder {
        RuntimeConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Worker thread count is within 1..=512
    /// - Thread name prefix is not empty
    /// - Keep-alive is greater than zero
    /// - A custom log filter, if any, parses
    pub fn validate(&self) -> Result<()> {
        if self.pool.size == 0 {
            return Err(Error::Config(
                "Worker threads must be greater than 0".to_string(),
            ));
        }

        if self.pool.size > MAX_WORKER_THREADS {
            return Err(Error::Config(format!(
                "Worker threads exceeds maximum of {} (got {})",
                MAX_WORKER_THREADS, self.pool.size
            )));
        }

        if self.pool.thread_name.trim().is_empty() {
            return Err(Error::Config(
                "Worker thread name cannot be empty".to_string(),
            ));
        }

        if self.pool.keep_alive.is_zero() {
            return Err(Error::Config(
                "Worker keep-alive must be greater than 0".to_string(),
            ));
        }

        logging::build_filter(&self.logging)?;

        Ok(())
    }
}

/// Builder for constructing [`RuntimeConfig`] instances.
#[derive(Debug, Default)]
pub struct RuntimeConfigBuilder {
    worker_threads: Option<usize>,
    thread_name: Option<String>,
    keep_alive: Option<Duration>,
    logging: Option<LoggingConfig>,
    log_level: Option<LogLevel>,
    log_format: Option<LogFormat>,
}

impl RuntimeConfigBuilder {
    /// Sets the maximum number of concurrently running background callables.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_runtime::config::RuntimeConfig;
    ///
    /// let builder = RuntimeConfig::builder().worker_threads(8);
    /// ```
    pub fn worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = Some(threads);
        self
    }

    /// Sets the worker thread name prefix.
    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = Some(name.into());
        self
    }

    /// Sets how long an idle worker thread lingers before exiting.
    pub fn keep_alive(mut self, keep_alive: Duration) -> Self {
        self.keep_alive = Some(keep_alive);
        self
    }

    /// Replaces the whole logging configuration.
    ///
    /// [`log_level`](Self::log_level) and [`log_format`](Self::log_format)
    /// still apply on top of it.
    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    /// Sets the minimum log level.
    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.log_level = Some(level);
        self
    }

    /// Sets the log output format.
    pub fn log_format(mut self, format: LogFormat) -> Self {
        self.log_format = Some(format);
        self
    }

    /// Builds the final `RuntimeConfig` instance.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] with an actionable message if any value is
    /// out of range.
    pub fn build(self) -> Result<RuntimeConfig> {
        let mut pool = PoolConfig::default();
        if let Some(threads) = self.worker_threads {
            pool = pool.with_size(threads);
        }
        if let Some(name) = self.thread_name {
            pool = pool.with_thread_name(name);
        }
        if let Some(keep_alive) = self.keep_alive {
            pool = pool.with_keep_alive(keep_alive);
        }

        let mut logging = self.logging.unwrap_or_default();
        if let Some(level) = self.log_level {
            logging = logging.with_level(level);
        }
        if let Some(format) = self.log_format {
            logging = logging.with_format(format);
        }

        let config = RuntimeConfig { pool, logging };
        config.validate()?;
        Ok(config)
    }
}
