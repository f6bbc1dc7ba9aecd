//! Command actors.
//!
//! A command actor is "the caller" from the engine's point of view: it has a
//! display name, a stable unique id, and can be replied to. The engine only
//! ever sees [`BoxedActor`]; [`TelegramActor`] is the concrete actor built for
//! each inbound Telegram event.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use tgcmd_core::{DispatchSource, Memoized, SendMessage, User};

use crate::error::{CommandError, CommandResult};
use crate::telegram::TelegramHandler;

/// The caller of a command, as seen by the engine.
#[async_trait]
pub trait CommandActor: Any + Send + Sync {
    /// Returns the actor's display name.
    fn name(&self) -> &str;

    /// Returns a stable identity for this actor.
    fn unique_id(&self) -> Uuid;

    /// Sends a message back to the actor.
    async fn reply(&self, message: &str) -> CommandResult<()>;

    /// Sends an error message back to the actor.
    async fn error(&self, message: &str) -> CommandResult<()>;

    /// Returns self as `Any` for downcasting by reference.
    fn as_any(&self) -> &dyn Any;

    /// Returns self as an `Arc<dyn Any>` for downcasting by ownership.
    ///
    /// Implementors should simply return `self`.
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

/// A boxed CommandActor trait object.
pub type BoxedActor = Arc<dyn CommandActor>;

/// Derives the unique id of a Telegram user.
///
/// The high 64 bits are zero and the low 64 bits are the user id, so distinct
/// users never collide.
pub fn derive_unique_id(user: &User) -> Uuid {
    Uuid::from_u64_pair(0, user.id as u64)
}

/// The actor for one inbound Telegram event.
///
/// One instance exists per dispatched event and is dropped when the command
/// completes.
pub struct TelegramActor {
    handler: Arc<TelegramHandler>,
    source: DispatchSource,
    unique_id: Memoized<Uuid>,
}

impl TelegramActor {
    /// Wraps a dispatch source for execution under `handler`.
    pub fn wrap(handler: Arc<TelegramHandler>, source: DispatchSource) -> Arc<Self> {
        Self::wrap_with(handler, source, derive_unique_id)
    }

    pub(crate) fn wrap_with(
        handler: Arc<TelegramHandler>,
        source: DispatchSource,
        derive: fn(&User) -> Uuid,
    ) -> Arc<Self> {
        let author = source.author().clone();
        Arc::new(Self {
            handler,
            source,
            unique_id: Memoized::new(move || derive(&author)),
        })
    }

    /// Returns the Telegram user id.
    pub fn id(&self) -> i64 {
        self.user().id
    }

    /// Returns the user who triggered the event.
    pub fn user(&self) -> &User {
        self.source.author()
    }

    /// Returns the dispatch source that triggered the command.
    pub fn dispatch_source(&self) -> &DispatchSource {
        &self.source
    }

    /// Returns the handler this actor executes under.
    pub fn command_handler(&self) -> &Arc<TelegramHandler> {
        &self.handler
    }
}

#[async_trait]
impl CommandActor for TelegramActor {
    fn name(&self) -> &str {
        &self.user().first_name
    }

    fn unique_id(&self) -> Uuid {
        *self.unique_id.get()
    }

    async fn reply(&self, message: &str) -> CommandResult<()> {
        let chat_id = self
            .source
            .chat_id()
            .cloned()
            .ok_or_else(|| CommandError::DetachedSource {
                source_id: self.source.source_id().clone(),
            })?;

        debug!(chat_id = %chat_id, actor = %self.id(), "Sending reply");
        let text = format!("{}{}", self.handler.message_prefix(), message);
        self.handler
            .bot()
            .execute(SendMessage::new(chat_id, text))
            .await?;
        Ok(())
    }

    async fn error(&self, message: &str) -> CommandResult<()> {
        self.reply(message).await
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

impl fmt::Debug for TelegramActor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramActor")
            .field("user_id", &self.id())
            .field("source", &self.source)
            .field("unique_id", &self.unique_id)
            .finish_non_exhaustive()
    }
}
