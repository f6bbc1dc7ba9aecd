//! Failure reporting policy.
//!
//! Every error raised while executing a command, from parameter extraction
//! to transport failures, is handed to the engine's [`ExceptionHandler`]. Nothing
//! is retried.

use async_trait::async_trait;
use tracing::{debug, error, warn};

use crate::actor::BoxedActor;
use crate::command::ExecutableCommand;
use crate::error::CommandError;

/// Policy for reporting command failures.
#[async_trait]
pub trait ExceptionHandler: Send + Sync {
    /// Handles a failure raised while executing `command` for `actor`.
    ///
    /// `command` is `None` when no registered command matched.
    async fn handle(
        &self,
        actor: &BoxedActor,
        command: Option<&ExecutableCommand>,
        error: &CommandError,
    );
}

/// The default policy: log the failure and tell the actor what went wrong.
///
/// Transport failures and detached sources are only logged, since answering
/// the actor would fail the same way.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultExceptionHandler;

#[async_trait]
impl ExceptionHandler for DefaultExceptionHandler {
    async fn handle(
        &self,
        actor: &BoxedActor,
        command: Option<&ExecutableCommand>,
        error: &CommandError,
    ) {
        let command = command.map(ExecutableCommand::name).unwrap_or("<none>");
        let message = match error {
            CommandError::Extract(e) => {
                debug!(command, error = %e, "Invalid command usage");
                format!("Invalid usage: {e}")
            }
            CommandError::UnknownCommand(name) => {
                debug!(command = %name, "Unknown command");
                format!("Unknown command: /{name}")
            }
            CommandError::Handler(msg) => {
                warn!(command, error = %msg, "Command failed");
                msg.clone()
            }
            CommandError::DetachedSource { .. } => {
                warn!(command, error = %error, "Command failed on a detached source");
                return;
            }
            CommandError::Api(e) => {
                error!(command, error = %e, "Transport failure while executing command");
                return;
            }
        };

        if let Err(e) = actor.error(&message).await {
            warn!(command, error = %e, "Failed to report command failure");
        }
    }
}
