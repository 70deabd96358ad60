//! Process signal handling.
//!
//! Re-exports `tokio::signal` so a root future can race its work against an
//! interrupt without depending on Tokio directly.

pub use tokio::signal::ctrl_c;
