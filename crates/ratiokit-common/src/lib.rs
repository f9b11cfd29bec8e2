//! # RatioKit Common
//!
//! Shared plumbing for the RatioKit crates:
//!
//! - [`config`]: serde-backed configuration for the polyfill and logging
//! - [`logging`]: `tracing-subscriber` initialisation driven by [`LogConfig`]
//! - [`CommonError`]: the error type for everything in this crate

pub mod config;
pub mod logging;

use thiserror::Error;

pub use config::{LogConfig, ObserveOptions, PolyfillConfig, RatioKitConfig, DEFAULT_ATTRIBUTE};
pub use logging::{init_logging, LOG_ENV_VAR};

/// Errors that can occur while loading configuration or setting up logging.
#[derive(Error, Debug)]
pub enum CommonError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, CommonError>;
