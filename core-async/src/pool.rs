//! Bounded worker pool for blocking callables.
//!
//! A [`WorkerPool`] owns a dedicated executor whose blocking thread pool is
//! capped at [`PoolConfig::size`] threads. Callables submitted through
//! [`WorkerPool::spawn`] or [`WorkerPool::run`] execute on those threads, and
//! their completion is observed through a [`BackgroundHandle`]: a plain future
//! that can be awaited from any runtime, including the single-threaded ones
//! built by [`crate::runtime`].
//!
//! The pool is an owned resource. Build it once at startup, share it with
//! `Arc`, and let the last handle drop it. There is no global instance.
//!
//! # Examples
//!
//! ```rust
//! use core_async::pool::{PoolConfig, WorkerPool};
//!
//! let pool = WorkerPool::new(PoolConfig::default().with_size(2)).unwrap();
//!
//! let value = core_async::runtime::block_on(async {
//!     pool.run(|| Ok::<_, std::io::Error>(21 * 2)).await
//! })
//! .unwrap();
//!
//! assert_eq!(value, 42);
//! ```

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::{JoinError, JoinHandle};

use crate::error::{Error, Result};

/// Upper bound on the default pool size.
const MAX_DEFAULT_SIZE: usize = 32;

/// Default thread name prefix for pool workers.
pub const DEFAULT_THREAD_NAME: &str = "evalsys-bg";

/// Default idle time before an unused worker thread exits.
pub const DEFAULT_KEEP_ALIVE: Duration = Duration::from_secs(60);

/// Returns the default worker count: `min(32, available_parallelism + 4)`.
pub fn default_pool_size() -> usize {
    let cpus = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    MAX_DEFAULT_SIZE.min(cpus + 4)
}

/// Worker pool settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Maximum number of callables executing concurrently
    pub size: usize,
    /// Prefix for worker thread names (`<prefix>-<n>`)
    pub thread_name: String,
    /// Idle time before an unused worker thread exits; workers are respawned
    /// on demand
    pub keep_alive: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            size: default_pool_size(),
            thread_name: DEFAULT_THREAD_NAME.to_string(),
            keep_alive: DEFAULT_KEEP_ALIVE,
        }
    }
}

impl PoolConfig {
    /// Sets the maximum number of concurrent workers
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Sets the worker thread name prefix
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Sets the idle keep-alive for worker threads
    pub fn with_keep_alive(mut self, keep_alive: Duration) -> Self {
        self.keep_alive = keep_alive;
        self
    }
}

#[derive(Debug, Default)]
struct PoolStats {
    submitted: AtomicU64,
    completed: AtomicU64,
    active: AtomicUsize,
}

/// Tracks one running callable; decrements `active` even if the callable panics.
struct ActiveGuard {
    stats: Arc<PoolStats>,
}

impl ActiveGuard {
    fn enter(stats: Arc<PoolStats>) -> Self {
        stats.active.fetch_add(1, Ordering::SeqCst);
        Self { stats }
    }
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.stats.active.fetch_sub(1, Ordering::SeqCst);
        self.stats.completed.fetch_add(1, Ordering::SeqCst);
    }
}

/// A bounded pool of worker threads for blocking callables.
pub struct WorkerPool {
    config: PoolConfig,
    // `Option` so `Drop` can hand the runtime to `shutdown_background`.
    runtime: Option<Runtime>,
    handle: Handle,
    stats: Arc<PoolStats>,
}

impl WorkerPool {
    /// Builds a new pool.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPoolSize`] for a zero-sized pool, or
    /// [`Error::Runtime`] if the underlying executor cannot be started.
    pub fn new(config: PoolConfig) -> Result<Self> {
        if config.size == 0 {
            return Err(Error::InvalidPoolSize(config.size));
        }

        let prefix = config.thread_name.clone();
        let counter = Arc::new(AtomicUsize::new(0));
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .max_blocking_threads(config.size)
            .thread_keep_alive(config.keep_alive)
            .thread_name_fn(move || {
                let n = counter.fetch_add(1, Ordering::Relaxed);
                format!("{}-{}", prefix, n)
            })
            .enable_all()
            .build()?;

        tracing::debug!(
            size = config.size,
            thread_name = %config.thread_name,
            "worker pool started"
        );

        Ok(Self {
            handle: runtime.handle().clone(),
            runtime: Some(runtime),
            config,
            stats: Arc::new(PoolStats::default()),
        })
    }

    /// Submits a callable and returns a handle to await its result.
    ///
    /// The callable starts as soon as a worker is free, whether or not the
    /// handle is ever awaited.
    pub fn spawn<F, T>(&self, f: F) -> BackgroundHandle<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        self.stats.submitted.fetch_add(1, Ordering::SeqCst);
        let stats = Arc::clone(&self.stats);
        let inner = self.handle.spawn_blocking(move || {
            let _active = ActiveGuard::enter(stats);
            f()
        });
        BackgroundHandle { inner }
    }

    /// Runs a fallible callable on the pool and waits for its outcome.
    ///
    /// The callable's error is wrapped in [`Error::Task`]; a panic becomes
    /// [`Error::Panicked`].
    pub async fn run<F, T, E>(&self, f: F) -> Result<T>
    where
        F: FnOnce() -> std::result::Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: Into<anyhow::Error> + Send + 'static,
    {
        self.spawn(f).await?.map_err(|e| Error::Task(e.into()))
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Maximum number of concurrently executing callables.
    pub fn size(&self) -> usize {
        self.config.size
    }

    /// Total callables submitted since the pool was built.
    pub fn submitted(&self) -> u64 {
        self.stats.submitted.load(Ordering::SeqCst)
    }

    /// Total callables that finished, including ones that panicked.
    pub fn completed(&self) -> u64 {
        self.stats.completed.load(Ordering::SeqCst)
    }

    /// Callables executing right now.
    pub fn active(&self) -> usize {
        self.stats.active.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerPool")
            .field("config", &self.config)
            .field("submitted", &self.submitted())
            .field("completed", &self.completed())
            .field("active", &self.active())
            .finish()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            tracing::debug!(thread_name = %self.config.thread_name, "worker pool shutting down");
            // Never blocks, so the pool may be dropped from async code.
            runtime.shutdown_background();
        }
    }
}

/// Future resolving to the result of a callable submitted to a [`WorkerPool`].
#[must_use = "dropping a BackgroundHandle does not cancel the callable"]
pub struct BackgroundHandle<T> {
    inner: JoinHandle<T>,
}

impl<T> BackgroundHandle<T> {
    /// Returns `true` once the callable has finished.
    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }
}

impl<T> fmt::Debug for BackgroundHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackgroundHandle")
            .field("finished", &self.is_finished())
            .finish()
    }
}

impl<T> Future for BackgroundHandle<T> {
    type Output = Result<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.inner).poll(cx).map(|res| res.map_err(join_error))
    }
}

fn join_error(err: JoinError) -> Error {
    if err.is_panic() {
        Error::Panicked(panic_message(err.into_panic()))
    } else {
        Error::Cancelled
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
