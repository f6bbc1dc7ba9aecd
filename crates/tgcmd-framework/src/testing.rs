//! Test doubles and fixtures.

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};

use tgcmd_core::{
    ApiError, ApiResult, Bot, CallbackQuery, Chat, DispatchSource, Message, SendMessage, User,
};

use crate::registry::HandlerRegistry;
use crate::telegram::TelegramHandler;

/// A bot that records every `sendMessage` call instead of sending it.
#[derive(Debug, Default)]
pub(crate) struct RecordingBot {
    sent: Mutex<Vec<SendMessage>>,
    failing: bool,
}

impl RecordingBot {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A bot whose every call fails with a transport error.
    pub(crate) fn failing() -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::default(),
            failing: true,
        })
    }

    pub(crate) fn sent(&self) -> Vec<SendMessage> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl Bot for RecordingBot {
    fn id(&self) -> &str {
        "test-bot"
    }

    async fn call_api(&self, method: &str, params: Value) -> ApiResult<Value> {
        if self.failing {
            return Err(ApiError::Transport("connection refused".to_string()));
        }
        if method != SendMessage::METHOD {
            return Err(ApiError::Other(format!("unsupported method: {method}")));
        }

        let request: SendMessage = serde_json::from_value(params)?;
        let mut sent = self.sent.lock();
        sent.push(request);
        Ok(json!({ "message_id": sent.len() }))
    }

    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

pub(crate) fn user() -> User {
    User {
        id: 42,
        is_bot: false,
        first_name: "Ada".to_string(),
        last_name: Some("Lovelace".to_string()),
        username: Some("ada".to_string()),
        language_code: Some("en".to_string()),
    }
}

fn message(text: &str) -> Message {
    Message {
        message_id: 7,
        from: Some(user()),
        chat: Chat {
            id: -100,
            kind: "group".to_string(),
            title: Some("lab".to_string()),
            username: None,
        },
        date: 1_700_000_000,
        text: Some(text.to_string()),
        caption: None,
    }
}

/// A message from user 42 in chat -100.
pub(crate) fn message_source(text: &str) -> DispatchSource {
    match DispatchSource::from_message(message(text)) {
        Ok(source) => source,
        Err(e) => panic!("fixture message has an author: {e}"),
    }
}

/// A callback query `cb-1` from user 42, attached to a message in chat -100
/// when `attached` is set.
pub(crate) fn callback_source(data: &str, attached: bool) -> DispatchSource {
    DispatchSource::from_callback(CallbackQuery {
        id: "cb-1".to_string(),
        from: user(),
        message: attached.then(|| message("menu")),
        inline_message_id: (!attached).then(|| "inline-1".to_string()),
        chat_instance: "ci-1".to_string(),
        data: Some(data.to_string()),
    })
}

/// A handler with reply prefix `"[bot] "`, registered in a fresh registry.
pub(crate) fn handler(bot: Arc<RecordingBot>) -> Arc<TelegramHandler> {
    TelegramHandler::builder(bot)
        .message_prefix("[bot] ")
        .build(&HandlerRegistry::new())
}
