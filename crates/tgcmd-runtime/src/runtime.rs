//! The tgcmd runtime.
//!
//! [`TgcmdRuntime`] owns the configuration and the [`HandlerRegistry`], builds
//! command handlers from the configured settings and turns raw updates into
//! dispatches. Receiving updates (long polling, webhooks) is left to the
//! caller.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tgcmd_runtime::TgcmdRuntime;
//!
//! let runtime = TgcmdRuntime::builder()
//!     .config_file("config/tgcmd.toml")
//!     .build()?;
//! runtime.init_logging()?;
//!
//! let handler = runtime.create_handler(bot);
//! handler.command("ping", || async { "pong".to_string() });
//!
//! for payload in updates {
//!     runtime.handle_update_json(&handler, &payload).await?;
//! }
//! runtime.shutdown();
//! ```

use std::path::Path;
use std::sync::Arc;

use tracing::{Instrument, debug, info, info_span};

use tgcmd_core::{BoxedBot, DispatchSource, Update};
use tgcmd_framework::{DispatchOutcome, HandlerRegistry, TelegramHandler};

use crate::config::{ConfigLoader, TgcmdConfig, validate_config};
use crate::error::{RuntimeError, RuntimeResult};
use crate::logging::LoggingBuilder;

/// Counters describing the registered handlers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuntimeStats {
    /// Number of registered handlers.
    pub handler_count: usize,
    /// Number of commands across all handlers.
    pub command_count: usize,
}

/// Owns configuration and the handler registry.
pub struct TgcmdRuntime {
    config: TgcmdConfig,
    registry: Arc<HandlerRegistry>,
}

impl TgcmdRuntime {
    /// Creates a runtime with the default configuration.
    pub fn new() -> Self {
        Self {
            config: TgcmdConfig::default(),
            registry: Arc::new(HandlerRegistry::new()),
        }
    }

    /// Creates a runtime builder that loads configuration from files and
    /// the environment.
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Creates a runtime from an already loaded configuration.
    pub fn from_config(config: TgcmdConfig) -> RuntimeResult<Self> {
        validate_config(&config)?;

        info!(
            log_level = %config.logging.level,
            message_prefix = %config.handler.message_prefix,
            bot_username = config.handler.bot_username.as_deref().unwrap_or_default(),
            "Runtime initialized from configuration"
        );

        Ok(Self {
            config,
            registry: Arc::new(HandlerRegistry::new()),
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &TgcmdConfig {
        &self.config
    }

    /// Returns the registry of handlers created by this runtime.
    pub fn registry(&self) -> &Arc<HandlerRegistry> {
        &self.registry
    }

    /// Installs the global logging subscriber from `logging` configuration.
    pub fn init_logging(&self) -> RuntimeResult<()> {
        LoggingBuilder::from_config(&self.config.logging)
            .try_init()
            .map_err(|e| RuntimeError::Logging(e.to_string()))
    }

    /// Creates a command handler for `bot` with the configured prefix and
    /// username, and registers it.
    pub fn create_handler(&self, bot: BoxedBot) -> Arc<TelegramHandler> {
        let settings = &self.config.handler;
        let mut builder =
            TelegramHandler::builder(bot).message_prefix(settings.message_prefix.clone());
        if let Some(username) = &settings.bot_username {
            builder = builder.bot_username(username.clone());
        }
        builder.build(&self.registry)
    }

    /// Dispatches one update through `handler`.
    ///
    /// Updates without a message, edited message or callback query, and
    /// messages without an author, are rejected.
    pub async fn handle_update(
        &self,
        handler: &Arc<TelegramHandler>,
        update: Update,
    ) -> RuntimeResult<DispatchOutcome> {
        let span = info_span!("update", update_id = update.update_id);
        let source = DispatchSource::from_update(update)?;

        let outcome = handler.dispatch(source).instrument(span.clone()).await;
        debug!(parent: &span, outcome = ?outcome, "Update handled");
        Ok(outcome)
    }

    /// Parses a raw Bot API update and dispatches it through `handler`.
    pub async fn handle_update_json(
        &self,
        handler: &Arc<TelegramHandler>,
        json: &str,
    ) -> RuntimeResult<DispatchOutcome> {
        let update = Update::parse(json)?;
        self.handle_update(handler, update).await
    }

    /// Returns counters for the registered handlers.
    pub fn stats(&self) -> RuntimeStats {
        let handlers = self.registry.instances();
        RuntimeStats {
            handler_count: handlers.len(),
            command_count: handlers.iter().map(|h| h.engine().commands().len()).sum(),
        }
    }

    /// Logs a summary of every registered handler.
    pub fn shutdown(&self) -> RuntimeStats {
        for handler in self.registry.instances() {
            let commands: Vec<_> = handler
                .engine()
                .commands()
                .iter()
                .map(|c| c.name().to_string())
                .collect();
            info!(
                bot = %handler.bot().id(),
                username = handler.bot_username().unwrap_or_default(),
                commands = ?commands,
                "Handler stopped"
            );
        }

        let stats = self.stats();
        info!(
            handler_count = stats.handler_count,
            command_count = stats.command_count,
            "Runtime shut down"
        );
        stats
    }
}

impl Default for TgcmdRuntime {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for creating a [`TgcmdRuntime`] with loaded configuration.
pub struct RuntimeBuilder {
    config_loader: ConfigLoader,
}

impl RuntimeBuilder {
    /// Creates a new runtime builder.
    pub fn new() -> Self {
        Self {
            config_loader: ConfigLoader::new(),
        }
    }

    /// Sets a specific configuration file to load.
    pub fn config_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.file(path);
        self
    }

    /// Sets the configuration profile (e.g., "development", "production").
    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.config_loader = self.config_loader.profile(profile);
        self
    }

    /// Adds a search path for configuration files.
    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.search_path(path);
        self
    }

    /// Disables loading environment variables.
    pub fn without_env(mut self) -> Self {
        self.config_loader = self.config_loader.without_env();
        self
    }

    /// Merges additional configuration programmatically.
    pub fn merge(mut self, config: TgcmdConfig) -> Self {
        self.config_loader = self.config_loader.merge(config);
        self
    }

    /// Loads the configuration and builds the runtime.
    pub fn build(self) -> RuntimeResult<TgcmdRuntime> {
        let config = self.config_loader.load()?;
        TgcmdRuntime::from_config(config)
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
