//! Application runtime context.
//!
//! [`RuntimeContext`] is built once at startup from a validated
//! [`RuntimeConfig`] and owns the process's [`WorkerPool`]. Everything that
//! needs background execution receives the context (or the pool handle)
//! explicitly; cloning the context shares the same pool.

use std::sync::Arc;

use core_async::bridge;
use core_async::pool::WorkerPool;

use crate::config::RuntimeConfig;
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct RuntimeContext {
    config: Arc<RuntimeConfig>,
    pool: Arc<WorkerPool>,
}

impl RuntimeContext {
    /// Validates `config` and starts the worker pool.
    pub fn new(config: RuntimeConfig) -> Result<Self> {
        config.validate()?;
        let pool = WorkerPool::new(config.pool.clone())?;

        tracing::debug!(worker_threads = pool.size(), "runtime context created");

        Ok(Self {
            config: Arc::new(config),
            pool: Arc::new(pool),
        })
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Shared handle to the worker pool.
    pub fn pool(&self) -> &Arc<WorkerPool> {
        &self.pool
    }

    /// Runs a blocking callable on the context's pool.
    ///
    /// See [`core_async::bridge::run_in_background`].
    pub async fn run_in_background<F, T, E>(&self, f: F) -> Result<T>
    where
        F: FnOnce() -> std::result::Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: Into<anyhow::Error> + Send + 'static,
    {
        Ok(bridge::run_in_background(&self.pool, f).await?)
    }

    /// Runs a blocking callable on the context's pool from synchronous code.
    ///
    /// See [`core_async::bridge::run_in_background_blocking`].
    pub fn run_in_background_blocking<F, T, E>(&self, f: F) -> Result<T>
    where
        F: FnOnce() -> std::result::Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: Into<anyhow::Error> + Send + 'static,
    {
        Ok(bridge::run_in_background_blocking(&self.pool, f)?)
    }
}
