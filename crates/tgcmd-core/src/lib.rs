//! # tgcmd Core
//!
//! The leaf layer of tgcmd: the types every other crate builds on.
//!
//! - **Identifiers**: numeric-or-textual identities ([`Identifier`])
//! - **Inbound model**: the Bot API types dispatch sources are built from
//!   ([`Update`], [`Message`], [`CallbackQuery`], [`User`])
//! - **Dispatch sources**: one read surface over every inbound event kind
//!   ([`DispatchSource`], [`MessageSource`], [`CallbackSource`])
//! - **Transport**: the outbound [`Bot`] handle and its [`SendMessage`] descriptor
//! - **Memoization**: the thread-safe compute-once cell ([`Memoized`])
//!
//! ## Data Flow
//!
//! ```text
//! ┌──────────┐     ┌────────────────┐     ┌──────────────┐
//! │  Update  │────▶│ DispatchSource │────▶│ command actor│──▶ Bot::execute
//! └──────────┘     └────────────────┘     └──────────────┘
//! ```

pub mod bot;
pub mod dispatch;
pub mod error;
pub mod identifier;
pub mod memo;
pub mod model;

pub use bot::{Bot, BoxedBot, SendMessage, downcast_bot};
pub use dispatch::{CallbackSource, DispatchSource, MessageSource, SourceKind, SourceVariant};
pub use error::{
    ApiError, ApiResult, IdentifierError, IdentifierResult, SourceCastError, SourceError,
    SourceResult,
};
pub use identifier::{Identifier, IdentifierKind};
pub use memo::Memoized;
pub use model::{CallbackQuery, Chat, Message, Update, User};
