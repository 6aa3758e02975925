//! Logging setup.
//!
//! The engine only speaks the `log` facade; binaries pick the backend through
//! [`init_logging`], which wires up `env_logger`.

mod init;

pub use init::{init_logging, LoggingConfig, DEFAULT_FILTER};
