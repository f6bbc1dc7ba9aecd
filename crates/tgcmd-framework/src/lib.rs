//! # tgcmd Framework
//!
//! Command dispatch for Telegram bots.
//!
//! This layer provides:
//! - A generic [`CommandEngine`] with dependencies, sender resolvers and an
//!   exception policy
//! - Axum-style handler functions whose parameters are extracted from the
//!   invocation ([`FromInvocation`])
//! - The Telegram integration: [`TelegramActor`], [`TelegramSenderResolver`]
//!   and the [`TelegramHandler`] that owns a bot and its engine
//! - An explicit [`HandlerRegistry`] of live handlers
//!
//! ```rust,ignore
//! let registry = HandlerRegistry::new();
//! let handler = TelegramHandler::builder(bot)
//!     .message_prefix("[bot] ")
//!     .build(&registry);
//!
//! handler.command("echo", |args: Args| async move { args.rest() });
//! handler.dispatch(DispatchSource::from_update(update)?).await;
//! ```

pub mod actor;
pub mod command;
pub mod engine;
pub mod error;
pub mod exception;
pub mod extractor;
pub mod handler;
pub mod registry;
pub mod resolver;
pub mod telegram;

#[cfg(test)]
pub(crate) mod testing;

pub use actor::{BoxedActor, CommandActor, TelegramActor, derive_unique_id};
pub use command::{CommandLine, ExecutableCommand, Invocation};
pub use engine::{CommandEngine, DispatchOutcome};
pub use error::{CommandError, CommandResult, ExtractError, ExtractResult};
pub use exception::{DefaultExceptionHandler, ExceptionHandler};
pub use extractor::{Args, Dependency, FromInvocation, Sender};
pub use handler::{BoxedCommand, HandleResponse, Handler, into_command};
pub use registry::HandlerRegistry;
pub use resolver::{SenderResolver, TelegramSenderResolver};
pub use telegram::{TelegramHandler, TelegramHandlerBuilder};
