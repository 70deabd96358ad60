//! Background execution bridge for evalsys.
//!
//! This crate lets synchronous, potentially blocking work run without stalling
//! a single-threaded cooperative runtime, and guarantees that a top-level
//! asynchronous entry point does not return until every task it spawned has
//! finished as well.
//!
//! # Architecture
//!
//! Two components are wired together explicitly:
//!
//! - [`pool::WorkerPool`]: an owned, bounded set of worker threads. Submitting
//!   a callable returns a [`pool::BackgroundHandle`] that any async context can
//!   await.
//! - [`scope::TaskScope`]: structured concurrency. Every task spawned through
//!   [`task::spawn`] or a scope is registered with that scope at spawn time,
//!   and the scope's drain point awaits all of them.
//!
//! [`bridge`] combines both into the three entry points applications use:
//! [`bridge::run_in_background`], [`bridge::run_in_background_blocking`] and
//! [`bridge::run_to_drain`].
//!
//! # Modules
//!
//! - `bridge`: top-level entry points
//! - `pool`: worker pool and background handles
//! - `scope`: task scopes and draining
//! - `runtime`: runtime construction and misuse guards
//! - `task`: task spawning
//! - `signal`: interrupt handling
//! - `time`: time-related operations (sleep, timeout, instant)
//! - `sync`: synchronization primitives (Mutex, Notify, channels)
//!
//! # Examples
//!
//! ```rust
//! use core_async::bridge::{run_in_background, run_to_drain};
//! use core_async::pool::{PoolConfig, WorkerPool};
//! use core_async::task;
//!
//! let pool = WorkerPool::new(PoolConfig::default()).unwrap();
//!
//! let sum = run_to_drain(async {
//!     // Fire-and-forget: drained before `run_to_drain` returns.
//!     task::spawn(async { /* background bookkeeping */ });
//!
//!     run_in_background(&pool, || Ok::<_, std::io::Error>(2 + 2)).await
//! })
//! .unwrap()
//! .unwrap();
//!
//! assert_eq!(sum, 4);
//! ```

// Re-export the async entry-point/test macros so downstream crates never need
// direct Tokio dependencies.
pub use core_async_macros::{main, test};

pub mod bridge;
pub mod error;
pub mod pool;
pub mod runtime;
pub mod scope;
pub mod signal;
pub mod sync;
pub mod task;
pub mod time;

// Re-export commonly used types at crate root for convenience
pub use error::{Error, Result};
pub use pool::{BackgroundHandle, PoolConfig, WorkerPool};
pub use scope::TaskScope;
pub use task::spawn;
pub use time::{sleep, Duration, Instant};
