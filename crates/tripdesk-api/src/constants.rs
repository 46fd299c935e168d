//! API constants
//!
//! Route prefixes and server-level limits shared by route setup and tests.

/// Back office routes live under this prefix.
pub const ADMIN_API_PREFIX: &str = "/api/admin";

/// Default cap on in-flight requests, overridable with `HTTP_CONCURRENCY_LIMIT`.
pub const DEFAULT_HTTP_CONCURRENCY_LIMIT: usize = 1_000;

/// Admin requests carry no upload bodies.
pub const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;

/// Upper bound for each dependency probe in the readiness check.
pub const HEALTH_CHECK_TIMEOUT_SECS: u64 = 5;
