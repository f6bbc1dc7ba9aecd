//! Dispatch sources.
//!
//! A [`DispatchSource`] is the normalized view of one inbound event. Whatever
//! the event kind, it exposes the same read surface:
//!
//! - [`text`](DispatchSource::text) - raw text, if any
//! - [`execution_text`](DispatchSource::execution_text) - the text commands are parsed from
//! - [`author`](DispatchSource::author) - the user who triggered the event
//! - [`chat_id`](DispatchSource::chat_id) - the originating chat, if known
//! - [`source_id`](DispatchSource::source_id) - the event's own id
//!
//! All of these are computed once when the source is built, so repeated
//! access is cheap and free of side effects.
//!
//! # Variant Access
//!
//! Handlers that need variant-specific fields narrow the source explicitly:
//!
//! ```rust,ignore
//! use tgcmd_core::{CallbackSource, DispatchSource};
//!
//! fn answer(source: &DispatchSource) {
//!     match source.downcast::<CallbackSource>() {
//!         Ok(callback) => println!("callback {}", callback.query().id),
//!         Err(e) => println!("{e}"),
//!     }
//! }
//! ```

use std::fmt;

use crate::error::{SourceCastError, SourceError, SourceResult};
use crate::identifier::Identifier;
use crate::model::{CallbackQuery, Message, Update, User};

/// The kind of event a dispatch source was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// A chat message.
    Message,
    /// An inline keyboard callback query.
    Callback,
}

impl SourceKind {
    /// Returns the kind name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::Callback => "callback",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Message Source
// ============================================================================

/// Dispatch source built from a chat message.
#[derive(Debug, Clone)]
pub struct MessageSource {
    message: Message,
    author: User,
    /// Message text, falling back to the media caption.
    text: Option<String>,
    chat_id: Identifier,
    source_id: Identifier,
}

impl MessageSource {
    /// Builds a source from a message.
    ///
    /// Fails with [`SourceError::MissingAuthor`] when the message has no
    /// sender, as is the case for channel posts.
    pub fn new(message: Message) -> SourceResult<Self> {
        let author = message.from.clone().ok_or(SourceError::MissingAuthor {
            kind: SourceKind::Message,
        })?;
        let text = message.text.clone().or_else(|| message.caption.clone());

        Ok(Self {
            author,
            text,
            chat_id: Identifier::numeric(message.chat.id),
            source_id: Identifier::numeric(message.message_id),
            message,
        })
    }

    /// Returns the underlying message.
    pub fn message(&self) -> &Message {
        &self.message
    }
}

impl TryFrom<Message> for MessageSource {
    type Error = SourceError;

    fn try_from(message: Message) -> SourceResult<Self> {
        Self::new(message)
    }
}

// ============================================================================
// Callback Source
// ============================================================================

/// Dispatch source built from a callback query.
#[derive(Debug, Clone)]
pub struct CallbackSource {
    query: CallbackQuery,
    /// Present only when the query references the message carrying the button.
    chat_id: Option<Identifier>,
    source_id: Identifier,
}

impl CallbackSource {
    /// Builds a source from a callback query.
    pub fn new(query: CallbackQuery) -> Self {
        Self {
            chat_id: query
                .message
                .as_ref()
                .map(|message| Identifier::numeric(message.chat.id)),
            source_id: Identifier::text(query.id.as_str()),
            query,
        }
    }

    /// Returns the underlying callback query.
    pub fn query(&self) -> &CallbackQuery {
        &self.query
    }
}

impl From<CallbackQuery> for CallbackSource {
    fn from(query: CallbackQuery) -> Self {
        Self::new(query)
    }
}

// ============================================================================
// Dispatch Source
// ============================================================================

/// A normalized inbound event.
#[derive(Debug, Clone)]
pub enum DispatchSource {
    /// Built from a chat message.
    Message(MessageSource),
    /// Built from a callback query.
    Callback(CallbackSource),
}

impl DispatchSource {
    /// Builds a message-originated source.
    pub fn from_message(message: Message) -> SourceResult<Self> {
        MessageSource::new(message).map(Self::Message)
    }

    /// Builds a callback-originated source.
    pub fn from_callback(query: CallbackQuery) -> Self {
        Self::Callback(CallbackSource::new(query))
    }

    /// Builds a source from an update.
    ///
    /// `message` is preferred over `edited_message`, which is preferred over
    /// `callback_query`.
    pub fn from_update(update: Update) -> SourceResult<Self> {
        let Update {
            update_id,
            message,
            edited_message,
            callback_query,
        } = update;

        if let Some(message) = message.or(edited_message) {
            return Self::from_message(message);
        }
        callback_query
            .map(Self::from_callback)
            .ok_or(SourceError::UnsupportedUpdate { update_id })
    }

    /// Returns which kind of event this source was built from.
    pub fn kind(&self) -> SourceKind {
        match self {
            Self::Message(_) => SourceKind::Message,
            Self::Callback(_) => SourceKind::Callback,
        }
    }

    /// Returns the raw text: message text or caption, or the callback payload.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Message(source) => source.text.as_deref(),
            Self::Callback(source) => source.query.data.as_deref(),
        }
    }

    /// Returns the text commands are parsed from.
    pub fn execution_text(&self) -> Option<&str> {
        self.text()
    }

    /// Returns the user who triggered this event.
    pub fn author(&self) -> &User {
        match self {
            Self::Message(source) => &source.author,
            Self::Callback(source) => &source.query.from,
        }
    }

    /// Returns the originating chat.
    ///
    /// Always present for messages. Absent for callback queries that are not
    /// attached to a message.
    pub fn chat_id(&self) -> Option<&Identifier> {
        match self {
            Self::Message(source) => Some(&source.chat_id),
            Self::Callback(source) => source.chat_id.as_ref(),
        }
    }

    /// Returns the event's own id: a numeric message id or a textual query id.
    pub fn source_id(&self) -> &Identifier {
        match self {
            Self::Message(source) => &source.source_id,
            Self::Callback(source) => &source.source_id,
        }
    }

    /// Narrows this source to a specific variant.
    pub fn downcast<V: SourceVariant>(&self) -> Result<&V, SourceCastError> {
        V::from_source(self).ok_or(SourceCastError {
            expected: V::KIND,
            actual: self.kind(),
        })
    }

    /// Narrows this source to a message source.
    pub fn as_message(&self) -> Result<&MessageSource, SourceCastError> {
        self.downcast()
    }

    /// Narrows this source to a callback source.
    pub fn as_callback(&self) -> Result<&CallbackSource, SourceCastError> {
        self.downcast()
    }
}

impl From<MessageSource> for DispatchSource {
    fn from(source: MessageSource) -> Self {
        Self::Message(source)
    }
}

impl From<CallbackSource> for DispatchSource {
    fn from(source: CallbackSource) -> Self {
        Self::Callback(source)
    }
}

impl TryFrom<Update> for DispatchSource {
    type Error = SourceError;

    fn try_from(update: Update) -> SourceResult<Self> {
        Self::from_update(update)
    }
}

/// A concrete dispatch source variant.
pub trait SourceVariant: Clone + Send + Sync + 'static {
    /// The kind this variant corresponds to.
    const KIND: SourceKind;

    /// Returns the variant if `source` holds it.
    fn from_source(source: &DispatchSource) -> Option<&Self>;
}

impl SourceVariant for MessageSource {
    const KIND: SourceKind = SourceKind::Message;

    fn from_source(source: &DispatchSource) -> Option<&Self> {
        match source {
            DispatchSource::Message(message) => Some(message),
            DispatchSource::Callback(_) => None,
        }
    }
}

impl SourceVariant for CallbackSource {
    const KIND: SourceKind = SourceKind::Callback;

    fn from_source(source: &DispatchSource) -> Option<&Self> {
        match source {
            DispatchSource::Callback(callback) => Some(callback),
            DispatchSource::Message(_) => None,
        }
    }
}
