//! Task spawning and execution abstractions.
//!
//! [`spawn`] is scope-aware: inside a [`TaskScope`] (for example anywhere
//! under [`crate::bridge::run_to_drain`]) the new task is registered with that
//! scope and will be drained with it. Outside a scope it behaves like a plain
//! `tokio::task::spawn`.
//!
//! Blocking work belongs on a [`WorkerPool`](crate::pool::WorkerPool) rather
//! than `tokio::task::spawn_blocking`, so it runs on the application's owned
//! threads.
//!
//! # Examples
//!
//! ```rust
//! use core_async::task;
//!
//! async fn example() {
//!     let handle = task::spawn(async { 42 });
//!     let result = handle.await.unwrap();
//!     assert_eq!(result, 42);
//! }
//! ```

pub use tokio::task::{yield_now, JoinError, JoinHandle};

use crate::scope::TaskScope;

/// Spawns a new asynchronous task.
///
/// The task joins the caller's [`TaskScope`] when there is one. Task-local
/// scopes do not reach worker pool threads, so tasks spawned from a pool
/// callable are not tracked.
///
/// # Arguments
///
/// * `future` - The async computation to run
///
/// # Returns
///
/// A `JoinHandle` that can be awaited to get the task's result.
///
/// # Panics
///
/// Panics when called outside a runtime.
pub fn spawn<F>(future: F) -> JoinHandle<F::Output>
where
    F: std::future::Future + Send + 'static,
    F::Output: Send + 'static,
{
    match TaskScope::current() {
        Some(scope) => scope.spawn(future),
        None => tokio::task::spawn(future),
    }
}

/// Result type for task operations.
pub type Result<T> = std::result::Result<T, JoinError>;
