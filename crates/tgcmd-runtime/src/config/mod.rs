//! Configuration module for the tgcmd runtime.
//!
//! Layered TOML and environment configuration for command handlers and
//! logging.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile, load_config, load_config_from_file};
pub use schema::{
    HandlerConfig, LogFormat, LogLevel, LogOutput, LogRotation, LoggingConfig, SpanEventConfig,
    TgcmdConfig,
};
pub use validation::validate_config;
