//! Runtime utilities that abstract over the underlying async executor.
//!
//! We wrap Tokio's runtime primitives so that downstream crates never need to
//! depend on Tokio directly. Every runtime built here is a single-threaded,
//! cooperative one: blocking work belongs on a [`WorkerPool`](crate::pool::WorkerPool).

use crate::error::{Error, Result};

pub use tokio::runtime::{Builder, Handle, Runtime};

/// Runs the provided future to completion using a lightweight runtime.
pub fn block_on<F>(future: F) -> F::Output
where
    F: std::future::Future,
{
    Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("core_async::runtime::block_on: failed to build Tokio runtime")
        .block_on(future)
}

/// Builds a fresh single-threaded runtime with IO and timers enabled.
pub fn current_thread() -> Result<Runtime> {
    Ok(Builder::new_current_thread().enable_all().build()?)
}

/// Returns `true` when the calling thread is inside a runtime context.
///
/// Worker pool threads count as inside a runtime: they belong to the pool's
/// own executor.
pub fn in_runtime() -> bool {
    Handle::try_current().is_ok()
}

/// Fails with [`Error::NestedRuntime`] when called from within a runtime.
///
/// Entry points that create their own runtime call this first, so misuse
/// surfaces as an error instead of a panic or a deadlock.
pub fn ensure_outside_runtime(operation: &'static str) -> Result<()> {
    if in_runtime() {
        tracing::error!(operation, "blocking entry point called inside a runtime");
        return Err(Error::NestedRuntime { operation });
    }
    Ok(())
}
