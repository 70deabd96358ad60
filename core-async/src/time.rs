//! Time-related abstractions.
//!
//! Re-exports `tokio::time` so callers that need a deadline can race a
//! background handle against a timer. The bridge itself provides no timeouts.
//!
//! # Examples
//!
//! ```rust
//! use core_async::time::{sleep, timeout, Duration};
//!
//! async fn example() {
//!     let result = timeout(Duration::from_millis(50), sleep(Duration::from_secs(1))).await;
//!     assert!(result.is_err());
//! }
//! ```

pub use tokio::time::{error::Elapsed, interval, sleep, sleep_until, timeout, Interval, Sleep, Timeout};

pub use std::time::{Duration, Instant};
