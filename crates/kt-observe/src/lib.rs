//! Logging bootstrap shared by the launcher binaries.
//!
//! Everything goes through `tracing`; this crate only decides where events end up
//! (stderr text, stderr JSON or journald) and how timestamps look.
mod config;
mod error;
mod format;
mod init;
mod level;
mod timestamp;

pub use config::LoggerConfig;
pub use error::{LoggerError, LoggerResult};
pub use format::LoggerFormat;
pub use init::init_logger;
pub use level::LoggerLevel;
pub use timestamp::{LoggerTimeZone, init_local_offset};
