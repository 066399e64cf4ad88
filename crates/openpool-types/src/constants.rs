//! System-wide constants for the OpenPool settlement engine.

/// Default maximum re-entrant nesting depth for lock sessions.
///
/// Deep enough for any realistic router/hook composition; the limit
/// exists to turn runaway recursion into a clean error instead of a
/// stack overflow.
pub const DEFAULT_MAX_LOCK_DEPTH: usize = 128;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "OpenPool";
