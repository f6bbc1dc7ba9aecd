//! # tgcmd
//!
//! Typed command handling for Telegram bots.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────┐     ┌────────────────┐     ┌───────────────┐     ┌───────────────┐
//! │ Update  │────▶│ DispatchSource │────▶│ TelegramActor │────▶│ CommandEngine │──▶ handler fn
//! └─────────┘     └────────────────┘     └───────────────┘     └───────────────┘
//!                                               │ reply                 │ failures
//!                                               ▼                       ▼
//!                                          Bot::execute         ExceptionHandler
//! ```
//!
//! - **Core**: identifiers, the inbound Bot API model, dispatch sources and
//!   the outbound [`Bot`](core::Bot) trait
//! - **Framework**: command actors, sender resolution, the command engine
//!   and the Telegram command handler
//! - **Runtime**: configuration, logging and update handling
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tgcmd::prelude::*;
//!
//! async fn greet(Sender(user): Sender<User>) -> String {
//!     format!("Hello, {}!", user.full_name())
//! }
//!
//! async fn add(args: Args) -> CommandResult<String> {
//!     let a: i64 = args.parse(0)?;
//!     let b: i64 = args.parse(1)?;
//!     Ok((a + b).to_string())
//! }
//!
//! let runtime = TgcmdRuntime::builder().build()?;
//! runtime.init_logging()?;
//!
//! let handler = runtime.create_handler(my_bot);
//! handler.command("greet", greet).command("add", add);
//!
//! runtime.handle_update_json(&handler, &payload).await?;
//! ```
//!
//! ## Features
//!
//! - `toml-config`: load `tgcmd.toml` configuration files (default)
//! - `json-log`: enable the JSON log format

pub use tgcmd_core as core;
pub use tgcmd_framework as framework;
pub use tgcmd_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use tgcmd::prelude::*;
/// ```
pub mod prelude {
    // Runtime
    pub use tgcmd_runtime::{TgcmdConfig, TgcmdRuntime};

    // Inbound model and transport
    pub use tgcmd_core::{
        Bot, BoxedBot, CallbackSource, DispatchSource, Identifier, MessageSource, SendMessage,
        Update, User,
    };

    // Commands and handlers
    pub use tgcmd_framework::{
        Args, BoxedActor, CommandActor, CommandError, CommandResult, Dependency,
        DispatchOutcome, ExecutableCommand, HandlerRegistry, Sender, TelegramActor,
        TelegramHandler,
    };

    // Logging
    pub use tgcmd_runtime::prelude::*;
}
