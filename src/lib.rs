//! Workspace facade crate.
//!
//! Re-exports the library crates so host applications can depend on
//! `evalsys-workspace` alone instead of wiring `core-async` and
//! `core-runtime` individually. The `evalsys` binary lives in `cli/`.

pub use core_async;
pub use core_runtime;

pub use core_async::{bridge, pool::WorkerPool, scope::TaskScope};
pub use core_runtime::{RuntimeConfig, RuntimeContext};
