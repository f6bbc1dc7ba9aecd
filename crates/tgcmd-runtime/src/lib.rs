//! tgcmd Runtime - configuration, logging and update handling.
//!
//! This crate provides:
//! - Layered configuration (`TgcmdConfig`, `ConfigLoader`)
//! - Logging setup (`LoggingBuilder`)
//! - The runtime that owns the handler registry and dispatches raw updates
//!   (`TgcmdRuntime`)
//!
//! ```ignore
//! use tgcmd_runtime::TgcmdRuntime;
//!
//! let runtime = TgcmdRuntime::builder().build()?;
//! runtime.init_logging()?;
//!
//! let handler = runtime.create_handler(bot);
//! handler.command("start", || async { "Hello!".to_string() });
//!
//! runtime.handle_update_json(&handler, &payload).await?;
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod runtime;

pub use config::{
    ConfigError, ConfigLoader, ConfigResult, HandlerConfig, LoggingConfig, TgcmdConfig,
};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::{LoggingBuilder, SpanEvents};
pub use runtime::{RuntimeBuilder, RuntimeStats, TgcmdRuntime};

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

/// Logging macros for applications built on tgcmd.
pub mod prelude {
    pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};
}
