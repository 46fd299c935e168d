//! Logging setup.

mod init;

pub use init::{init_telemetry, shutdown_telemetry};
