//! The Telegram command handler.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use tgcmd_core::{BoxedBot, DispatchSource};

use crate::actor::TelegramActor;
use crate::command::{CommandLine, ExecutableCommand};
use crate::engine::{CommandEngine, DispatchOutcome};
use crate::exception::DefaultExceptionHandler;
use crate::handler::Handler;
use crate::registry::HandlerRegistry;
use crate::resolver::TelegramSenderResolver;

/// Owns the outbound transport and the command engine for one bot.
///
/// Every handler is appended to the [`HandlerRegistry`] it was built with
/// and stays there for the registry's lifetime.
pub struct TelegramHandler {
    bot: BoxedBot,
    message_prefix: String,
    bot_username: Option<String>,
    engine: Arc<CommandEngine>,
}

impl TelegramHandler {
    /// Creates a handler with default settings and registers it.
    pub fn new(bot: BoxedBot, registry: &HandlerRegistry) -> Arc<Self> {
        Self::builder(bot).build(registry)
    }

    /// Starts building a handler.
    pub fn builder(bot: BoxedBot) -> TelegramHandlerBuilder {
        TelegramHandlerBuilder {
            bot,
            message_prefix: String::new(),
            bot_username: None,
        }
    }

    /// Returns the outbound transport.
    pub fn bot(&self) -> &BoxedBot {
        &self.bot
    }

    /// Returns the text prepended to every reply.
    pub fn message_prefix(&self) -> &str {
        &self.message_prefix
    }

    /// Returns the bot's username, used to filter `/cmd@botname` mentions.
    pub fn bot_username(&self) -> Option<&str> {
        self.bot_username.as_deref()
    }

    /// Returns the command engine.
    pub fn engine(&self) -> &Arc<CommandEngine> {
        &self.engine
    }

    /// Registers a command on this handler's engine.
    pub fn command<F, T>(&self, command: impl Into<ExecutableCommand>, handler: F) -> &Self
    where
        F: Handler<T>,
        T: 'static,
    {
        self.engine.register_command(command, handler);
        self
    }

    /// Dispatches one inbound event.
    ///
    /// Events without a command, and commands addressed to a different bot,
    /// are ignored.
    pub async fn dispatch(self: &Arc<Self>, source: DispatchSource) -> DispatchOutcome {
        let Some(line) = source
            .execution_text()
            .and_then(|text| CommandLine::parse(text, source.kind()))
        else {
            debug!(source_id = %source.source_id(), "No command in event");
            return DispatchOutcome::Ignored;
        };

        if !line.is_addressed_to(self.bot_username()) {
            debug!(
                source_id = %source.source_id(),
                mention = line.mention().unwrap_or_default(),
                "Command addressed to another bot"
            );
            return DispatchOutcome::Ignored;
        }

        let actor = TelegramActor::wrap(Arc::clone(self), source);
        self.engine.execute(actor, line).await
    }
}

impl fmt::Debug for TelegramHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramHandler")
            .field("bot", &self.bot.id())
            .field("message_prefix", &self.message_prefix)
            .field("bot_username", &self.bot_username)
            .field("engine", &self.engine)
            .finish()
    }
}

/// Builder for [`TelegramHandler`].
pub struct TelegramHandlerBuilder {
    bot: BoxedBot,
    message_prefix: String,
    bot_username: Option<String>,
}

impl TelegramHandlerBuilder {
    /// Sets the text prepended to every reply.
    pub fn message_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.message_prefix = prefix.into();
        self
    }

    /// Sets the bot's username. A leading `@` is stripped.
    pub fn bot_username(mut self, username: impl Into<String>) -> Self {
        let username = username.into();
        self.bot_username = Some(username.trim_start_matches('@').to_string());
        self
    }

    /// Builds the handler and appends it to `registry`.
    ///
    /// The engine starts with the default exception handler, the bot
    /// registered as a [`BoxedBot`] dependency, and the Telegram sender
    /// resolver.
    pub fn build(self, registry: &HandlerRegistry) -> Arc<TelegramHandler> {
        let engine = Arc::new(CommandEngine::new());
        engine.set_exception_handler(DefaultExceptionHandler);
        engine.register_dependency(Arc::clone(&self.bot));
        engine.register_sender_resolver(TelegramSenderResolver);

        let handler = Arc::new(TelegramHandler {
            bot: self.bot,
            message_prefix: self.message_prefix,
            bot_username: self.bot_username,
            engine,
        });
        registry.register(Arc::clone(&handler));

        info!(
            bot = %handler.bot.id(),
            username = handler.bot_username().unwrap_or_default(),
            handler_count = registry.len(),
            "Command handler registered"
        );
        handler
    }
}
