//! Structured task scopes.
//!
//! A [`TaskScope`] owns every task spawned into it. Registration happens at
//! spawn time, and tasks spawned from inside a scoped task join the same scope,
//! so a single [`TaskScope::drain`] waits for the whole tree of fire-and-forget
//! work a root future started.
//!
//! The scope a task runs in is ambient: [`TaskScope::current`] returns it, and
//! [`crate::task::spawn`] uses it automatically.
//!
//! Draining only observes completion. Errors and panics of drained tasks are
//! never re-raised; callers that need outcomes must await the returned
//! [`JoinHandle`] themselves.
//!
//! # Examples
//!
//! ```rust
//! use core_async::scope::TaskScope;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! # core_async::runtime::block_on(async {
//! let scope = TaskScope::new();
//! let hits = Arc::new(AtomicUsize::new(0));
//!
//! let counter = hits.clone();
//! scope.spawn(async move {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! scope.drain().await.unwrap();
//! assert_eq!(hits.load(Ordering::SeqCst), 1);
//! # });
//! ```

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::task::TaskTracker;

use crate::error::{Error, Result};

/// Scope the running code belongs to, and whether it is one of that scope's
/// own tasks or just a future entered into it.
#[derive(Clone)]
struct Ambient {
    scope: TaskScope,
    tracked: bool,
}

tokio::task_local! {
    static CURRENT: Ambient;
}

/// Owner of a set of spawned tasks that can be drained as a unit.
#[derive(Clone, Debug, Default)]
pub struct TaskScope {
    tracker: TaskTracker,
    // Identity only; clones compare equal.
    id: Arc<()>,
}

impl TaskScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the scope the calling task runs in, if any.
    pub fn current() -> Option<TaskScope> {
        CURRENT.try_with(|ambient| ambient.scope.clone()).ok()
    }

    /// Spawns a task registered with this scope.
    ///
    /// The task itself runs with this scope as its ambient scope, so anything
    /// it spawns through [`crate::task::spawn`] is registered here too.
    ///
    /// # Panics
    ///
    /// Panics when called outside a runtime, like `tokio::spawn`.
    pub fn spawn<F>(&self, future: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let ambient = Ambient {
            scope: self.clone(),
            tracked: true,
        };
        self.tracker.spawn(CURRENT.scope(ambient, future))
    }

    /// Spawns a fire-and-forget task whose failure is logged and dropped.
    pub fn spawn_detached<F, E>(&self, future: F)
    where
        F: Future<Output = std::result::Result<(), E>> + Send + 'static,
        E: fmt::Display + Send + 'static,
    {
        // The handle is dropped on purpose; `drain` still waits for the task.
        let _ = self.spawn(async move {
            if let Err(err) = future.await {
                tracing::warn!(error = %err, "detached task failed");
            }
        });
    }

    /// Runs `future` with this scope as its ambient scope.
    ///
    /// `future` is not registered with the scope, so it may drain it.
    pub async fn enter<F>(&self, future: F) -> F::Output
    where
        F: Future,
    {
        let ambient = Ambient {
            scope: self.clone(),
            tracked: self.owns_current_task(),
        };
        CURRENT.scope(ambient, future).await
    }

    /// Number of registered tasks that have not finished yet.
    pub fn len(&self) -> usize {
        self.tracker.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracker.is_empty()
    }

    /// Waits until every task registered with this scope has finished,
    /// including tasks spawned while draining.
    ///
    /// Returns without suspending when nothing is pending. The scope can be
    /// reused afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SelfDrain`] when called from one of this scope's own
    /// tasks, which could never finish while it waits on itself.
    pub async fn drain(&self) -> Result<()> {
        if self.owns_current_task() {
            tracing::error!("task scope drained from one of its own tasks");
            return Err(Error::SelfDrain);
        }

        self.wait_all().await;
        Ok(())
    }

    pub(crate) async fn wait_all(&self) {
        self.tracker.close();

        let pending = self.tracker.len();
        if pending > 0 {
            tracing::debug!(pending, "draining task scope");
            self.tracker.wait().await;
            tracing::debug!("task scope drained");
        }

        self.tracker.reopen();
    }

    fn owns_current_task(&self) -> bool {
        CURRENT
            .try_with(|ambient| ambient.tracked && Arc::ptr_eq(&ambient.scope.id, &self.id))
            .unwrap_or(false)
    }
}
