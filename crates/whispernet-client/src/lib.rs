//! WhisperNet terminal client
//!
//! Connects the pure [`whispernet_app`] runtime to real I/O:
//!
//! - [`config`]: CLI arguments and validated server URLs
//! - [`transport`]: WebSocket push channel and HTTP sends
//! - [`TerminalDriver`]: line-based terminal input and plain-text rendering

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod config;
pub mod driver;
pub mod input;
pub mod render;
pub mod transport;

pub use config::{Args, Config, ConfigError};
pub use driver::{DriverError, TerminalDriver};
