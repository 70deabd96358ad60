//! Synchronization primitives.
//!
//! Async-aware `tokio::sync` types, re-exported so downstream crates share one
//! set of primitives with the bridge. All of them are `Send + Sync` and safe
//! to hold across await points.

pub use tokio::sync::{mpsc, oneshot, watch, Barrier, Mutex, MutexGuard, Notify, RwLock, Semaphore};
