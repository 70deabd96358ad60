//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for evalsys:
//! - Configuration management
//! - Logging and tracing infrastructure
//! - The application context that owns the worker pool
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that the CLI and any embedding
//! host depend on. It establishes how the background worker pool is sized and
//! constructed (exactly once, by [`RuntimeContext`]), and the logging
//! conventions used throughout the system.

pub mod config;
pub mod context;
pub mod error;
pub mod logging;

pub use config::{RuntimeConfig, RuntimeConfigBuilder};
pub use context::RuntimeContext;
pub use error::{Error, Result};
