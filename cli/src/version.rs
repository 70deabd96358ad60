//! Package version, derived from the latest git tag at build time.

/// Version reported by `evalsys --version`.
pub const VERSION: &str = env!("EVALSYS_VERSION");
