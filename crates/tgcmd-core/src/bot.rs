//! Bot trait and related types.
//!
//! This module defines the `Bot` trait, the outbound transport handle that
//! delivers requests to the Telegram Bot API. Network I/O lives in the
//! implementations; this crate only builds the request descriptors.

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiResult;
use crate::identifier::Identifier;

/// Descriptor for the Bot API `sendMessage` method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessage {
    /// Target chat: a numeric chat id or a `@channel` username.
    pub chat_id: Identifier,
    /// Text of the message to be sent.
    pub text: String,
}

impl SendMessage {
    /// The Bot API method name.
    pub const METHOD: &'static str = "sendMessage";

    /// Creates a new descriptor.
    pub fn new(chat_id: impl Into<Identifier>, text: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            text: text.into(),
        }
    }
}

/// The outbound transport handle.
///
/// # API Design
///
/// - `call_api`: Raw API call with method name and JSON parameters
/// - `execute`: Sends a [`SendMessage`] descriptor through `call_api`
///
/// Concrete implementations decide how requests reach Telegram (HTTP long
/// polling client, webhook responder, test double).
#[async_trait]
pub trait Bot: Send + Sync + 'static {
    /// Returns the bot's unique identifier.
    fn id(&self) -> &str;

    /// Calls a raw Bot API method with the given parameters.
    ///
    /// # Returns
    ///
    /// The `result` field of the API response.
    async fn call_api(&self, method: &str, params: Value) -> ApiResult<Value>;

    /// Sends a message.
    ///
    /// Transport failures are returned unchanged; nothing is retried here.
    async fn execute(&self, request: SendMessage) -> ApiResult<Value> {
        let params = serde_json::to_value(&request)?;
        self.call_api(SendMessage::METHOD, params).await
    }

    /// Returns self as an `Arc<dyn Any>` for safe downcasting.
    ///
    /// Implementors should simply return `self`.
    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

/// A boxed Bot trait object.
pub type BoxedBot = Arc<dyn Bot>;

/// Attempts to downcast a BoxedBot to a specific concrete type.
pub fn downcast_bot<T: Bot>(bot: BoxedBot) -> Option<Arc<T>> {
    Arc::downcast::<T>(bot.as_any()).ok()
}
