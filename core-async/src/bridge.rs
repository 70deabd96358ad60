//! Entry points that tie a [`WorkerPool`] to a cooperative runtime.
//!
//! | Operation | Caller | Waits for |
//! |-----------|--------|-----------|
//! | [`run_in_background`] | async code | the callable |
//! | [`run_in_background_blocking`] | sync code, no runtime | the callable |
//! | [`run_to_drain`] | sync code, no runtime | root future, then all tasks it spawned |
//! | [`run_scoped`] | async code | root future, then all tasks it spawned |
//!
//! The blocking entry points build their own single-threaded runtime and
//! refuse to run inside an existing one ([`Error::NestedRuntime`]).
//!
//! [`Error::NestedRuntime`]: crate::error::Error::NestedRuntime

use std::future::Future;

use crate::error::Result;
use crate::pool::WorkerPool;
use crate::runtime;
use crate::scope::TaskScope;

/// Runs a blocking callable on `pool` and waits for its result without
/// stalling the calling runtime.
///
/// Errors returned by the callable come back as
/// [`Error::Task`](crate::error::Error::Task); panics as
/// [`Error::Panicked`](crate::error::Error::Panicked).
pub async fn run_in_background<F, T, E>(pool: &WorkerPool, f: F) -> Result<T>
where
    F: FnOnce() -> std::result::Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Into<anyhow::Error> + Send + 'static,
{
    pool.run(f).await
}

/// Synchronous counterpart of [`run_in_background`].
///
/// Builds a fresh single-threaded runtime, runs the submission inside it and
/// returns the result.
///
/// # Errors
///
/// Besides the callable's own outcome, fails with
/// [`Error::NestedRuntime`](crate::error::Error::NestedRuntime) when called
/// from within a runtime.
pub fn run_in_background_blocking<F, T, E>(pool: &WorkerPool, f: F) -> Result<T>
where
    F: FnOnce() -> std::result::Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Into<anyhow::Error> + Send + 'static,
{
    runtime::ensure_outside_runtime("run_in_background_blocking")?;
    let rt = runtime::current_thread()?;
    rt.block_on(run_in_background(pool, f))
}

/// Drives `root` to completion on a fresh single-threaded runtime, then waits
/// for every task it spawned before tearing the runtime down.
///
/// `root` runs inside a new [`TaskScope`]; tasks spawned through
/// [`crate::task::spawn`] (directly or from other scoped tasks) are drained
/// after `root` finishes. Their errors and panics are not propagated.
///
/// # Examples
///
/// ```rust
/// use core_async::{bridge, task, time};
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
///
/// let done = Arc::new(AtomicBool::new(false));
/// let flag = done.clone();
///
/// bridge::run_to_drain(async move {
///     task::spawn(async move {
///         time::sleep(time::Duration::from_millis(10)).await;
///         flag.store(true, Ordering::SeqCst);
///     });
/// })
/// .unwrap();
///
/// assert!(done.load(Ordering::SeqCst));
/// ```
pub fn run_to_drain<F>(root: F) -> Result<F::Output>
where
    F: Future,
{
    runtime::ensure_outside_runtime("run_to_drain")?;
    let rt = runtime::current_thread()?;
    Ok(rt.block_on(run_scoped(root)))
}

/// Async counterpart of [`run_to_drain`] for code already inside a runtime.
///
/// `root` runs in a fresh [`TaskScope`] that is drained before this returns.
pub async fn run_scoped<F>(root: F) -> F::Output
where
    F: Future,
{
    let scope = TaskScope::new();
    let output = scope.enter(root).await;
    scope.wait_all().await;
    output
}
