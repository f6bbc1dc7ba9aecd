//! The registry of live command handlers.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::telegram::TelegramHandler;

/// Every [`TelegramHandler`] built against this registry, in creation order.
///
/// Construct one per application and pass it to whatever needs to enumerate
/// handlers. Handlers are never removed.
#[derive(Debug, Default)]
pub struct HandlerRegistry {
    handlers: RwLock<Vec<Arc<TelegramHandler>>>,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn register(&self, handler: Arc<TelegramHandler>) {
        self.handlers.write().push(handler);
    }

    /// Returns a snapshot of the registered handlers.
    ///
    /// Handlers registered after the call are not included.
    pub fn instances(&self) -> Vec<Arc<TelegramHandler>> {
        self.handlers.read().clone()
    }

    /// Returns the number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.read().len()
    }

    /// Returns `true` if no handler has been registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.read().is_empty()
    }
}
