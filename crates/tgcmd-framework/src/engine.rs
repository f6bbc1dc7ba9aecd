//! The generic command engine.
//!
//! [`CommandEngine`] knows nothing about Telegram. It holds four tables:
//!
//! - dependencies, keyed by type, for [`Dependency<T>`](crate::extractor::Dependency)
//! - sender resolvers, consulted in registration order
//! - the exception handler that receives every failure
//! - the command table, keyed by lower-cased command name
//!
//! Platform integrations such as
//! [`TelegramHandler`](crate::telegram::TelegramHandler) populate these
//! tables and hand it actors to execute.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{Instrument, debug, info_span, warn};

use crate::actor::BoxedActor;
use crate::command::{CommandLine, ExecutableCommand, Invocation};
use crate::error::{CommandError, ExtractError, ExtractResult};
use crate::exception::{DefaultExceptionHandler, ExceptionHandler};
use crate::handler::{BoxedCommand, Handler, into_command};
use crate::resolver::SenderResolver;

/// The result of dispatching one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A command ran to completion.
    Executed,
    /// A command was found but failed, or no command matched.
    Failed,
    /// The event did not hold a command for this bot.
    Ignored,
}

#[derive(Clone)]
struct RegisteredCommand {
    command: ExecutableCommand,
    handler: BoxedCommand,
}

/// Executes commands on behalf of actors.
pub struct CommandEngine {
    dependencies: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
    resolvers: RwLock<Vec<Arc<dyn SenderResolver>>>,
    exception_handler: RwLock<Arc<dyn ExceptionHandler>>,
    commands: RwLock<HashMap<String, RegisteredCommand>>,
}

impl CommandEngine {
    /// Creates an engine with no commands and the default exception handler.
    pub fn new() -> Self {
        Self {
            dependencies: RwLock::new(HashMap::new()),
            resolvers: RwLock::new(Vec::new()),
            exception_handler: RwLock::new(Arc::new(DefaultExceptionHandler)),
            commands: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a dependency, replacing any previous value of the same type.
    pub fn register_dependency<T: Send + Sync + 'static>(&self, value: T) {
        self.dependencies
            .write()
            .insert(TypeId::of::<T>(), Arc::new(value));
    }

    /// Returns a clone of the registered dependency of type `T`.
    pub fn dependency<T: Clone + Send + Sync + 'static>(&self) -> Option<T> {
        self.dependencies
            .read()
            .get(&TypeId::of::<T>())
            .and_then(|value| value.downcast_ref::<T>())
            .cloned()
    }

    /// Appends a sender resolver.
    pub fn register_sender_resolver(&self, resolver: impl SenderResolver + 'static) {
        self.resolvers.write().push(Arc::new(resolver));
    }

    /// Replaces the exception handler.
    pub fn set_exception_handler(&self, handler: impl ExceptionHandler + 'static) {
        *self.exception_handler.write() = Arc::new(handler);
    }

    /// Registers a command handler, replacing any command of the same name.
    pub fn register_command<F, T>(&self, command: impl Into<ExecutableCommand>, handler: F)
    where
        F: Handler<T>,
        T: 'static,
    {
        let command = command.into();
        let name = command.name().to_string();
        let registered = RegisteredCommand {
            command,
            handler: into_command(handler),
        };
        if self.commands.write().insert(name.clone(), registered).is_some() {
            warn!(command = %name, "Replaced existing command");
        } else {
            debug!(command = %name, "Registered command");
        }
    }

    /// Returns all registered commands, sorted by name.
    pub fn commands(&self) -> Vec<ExecutableCommand> {
        let mut commands: Vec<_> = self
            .commands
            .read()
            .values()
            .map(|registered| registered.command.clone())
            .collect();
        commands.sort_by(|a, b| a.name().cmp(b.name()));
        commands
    }

    /// Resolves the sender of `command` as a value of type `T`.
    ///
    /// The first resolver that claims `T` as a custom type produces the value.
    /// Otherwise the actor itself is offered: as a [`BoxedActor`] directly, then
    /// in whatever concrete form each resolver falls back to. If none of these
    /// is a `T`, resolution fails.
    pub fn resolve_sender<T: Any + Send>(
        &self,
        actor: &BoxedActor,
        command: &ExecutableCommand,
    ) -> ExtractResult<T> {
        let type_id = TypeId::of::<T>();
        let mismatch = || ExtractError::SenderTypeMismatch {
            expected: type_name::<T>(),
        };
        let resolvers = self.resolvers.read().clone();

        if let Some(resolver) = resolvers.iter().find(|r| r.is_custom_type(type_id)) {
            let value = resolver.resolve(type_id, actor, command)?;
            return value.downcast::<T>().map(|value| *value).map_err(|_| mismatch());
        }

        let boxed: Box<dyn Any + Send> = Box::new(Arc::clone(actor));
        if let Ok(actor) = boxed.downcast::<T>() {
            return Ok(*actor);
        }

        for resolver in &resolvers {
            if let Ok(value) = resolver.resolve(type_id, actor, command)
                && let Ok(value) = value.downcast::<T>()
            {
                return Ok(*value);
            }
        }

        Err(mismatch())
    }

    /// Executes the command named by `line` for `actor`.
    ///
    /// Failures, including unknown commands, are passed to the exception
    /// handler before returning [`DispatchOutcome::Failed`].
    pub async fn execute(self: &Arc<Self>, actor: BoxedActor, line: CommandLine) -> DispatchOutcome {
        let registered = self.commands.read().get(line.name()).cloned();
        let Some(RegisteredCommand { command, handler }) = registered else {
            let error = CommandError::UnknownCommand(line.name().to_string());
            self.report(&actor, None, &error).await;
            return DispatchOutcome::Failed;
        };

        let span = info_span!(
            "command",
            command = %command.name(),
            actor = %actor.name(),
            unique_id = %actor.unique_id(),
        );
        let invocation = Arc::new(Invocation::new(
            Arc::clone(&actor),
            command.clone(),
            line,
            Arc::clone(self),
        ));

        match handler(invocation).instrument(span.clone()).await {
            Ok(()) => {
                debug!(parent: &span, "Command completed");
                DispatchOutcome::Executed
            }
            Err(error) => {
                self.report(&actor, Some(&command), &error)
                    .instrument(span)
                    .await;
                DispatchOutcome::Failed
            }
        }
    }

    async fn report(
        &self,
        actor: &BoxedActor,
        command: Option<&ExecutableCommand>,
        error: &CommandError,
    ) {
        let handler = Arc::clone(&*self.exception_handler.read());
        handler.handle(actor, command, error).await;
    }
}

impl Default for CommandEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CommandEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandEngine")
            .field("dependencies", &self.dependencies.read().len())
            .field("resolvers", &self.resolvers.read().len())
            .field("commands", &self.commands())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use parking_lot::Mutex;
    use tgcmd_core::{SendMessage, SourceKind, User};

    use crate::actor::TelegramActor;
    use crate::error::CommandResult;
    use crate::extractor::{Args, Dependency, Sender};
    use crate::resolver::TelegramSenderResolver;
    use crate::testing::{RecordingBot, handler, message_source};

    fn actor(bot: Arc<RecordingBot>, text: &str) -> BoxedActor {
        TelegramActor::wrap(handler(bot), message_source(text))
    }

    fn line(text: &str) -> CommandLine {
        CommandLine::parse(text, SourceKind::Message).unwrap()
    }

    #[test]
    fn test_dependencies_replace_by_type() {
        let engine = CommandEngine::new();
        assert_eq!(engine.dependency::<String>(), None);

        engine.register_dependency("a".to_string());
        engine.register_dependency("b".to_string());
        engine.register_dependency(3u8);

        assert_eq!(engine.dependency::<String>().as_deref(), Some("b"));
        assert_eq!(engine.dependency::<u8>(), Some(3));
    }

    #[test]
    fn test_commands_sorted() {
        let engine = CommandEngine::new();
        engine.register_command("zeta", || async {});
        engine.register_command(ExecutableCommand::new("Alpha").description("first"), || async {});

        let names: Vec<_> = engine.commands().iter().map(|c| c.name().to_string()).collect();
        assert_eq!(names, ["alpha", "zeta"]);
        assert_eq!(engine.commands()[0].about(), Some("first"));
    }

    #[test]
    fn test_resolve_sender_without_resolvers() {
        let engine = CommandEngine::new();
        let actor = actor(RecordingBot::new(), "/x");
        let command = ExecutableCommand::new("x");

        let boxed = engine.resolve_sender::<BoxedActor>(&actor, &command).unwrap();
        assert!(Arc::ptr_eq(&boxed, &actor));
        assert!(matches!(
            engine.resolve_sender::<User>(&actor, &command),
            Err(ExtractError::SenderTypeMismatch { .. })
        ));
        assert!(matches!(
            engine.resolve_sender::<Arc<TelegramActor>>(&actor, &command),
            Err(ExtractError::SenderTypeMismatch { .. })
        ));
    }

    #[test]
    fn test_resolve_sender_with_resolver() {
        let engine = CommandEngine::new();
        engine.register_sender_resolver(TelegramSenderResolver);
        let actor = actor(RecordingBot::new(), "/x");
        let command = ExecutableCommand::new("x");

        assert_eq!(engine.resolve_sender::<User>(&actor, &command).unwrap().id, 42);
        let concrete = engine
            .resolve_sender::<Arc<TelegramActor>>(&actor, &command)
            .unwrap();
        assert_eq!(concrete.id(), 42);
        assert!(engine.resolve_sender::<BoxedActor>(&actor, &command).is_ok());
    }

    #[tokio::test]
    async fn test_execute_runs_handler() {
        async fn add(args: Args, Dependency(base): Dependency<i64>) -> CommandResult<String> {
            let n: i64 = args.parse(0)?;
            Ok(format!("{}", base + n))
        }

        let bot = RecordingBot::new();
        let engine = Arc::new(CommandEngine::new());
        engine.register_dependency(40i64);
        engine.register_command("add", add);

        let outcome = engine.execute(actor(bot.clone(), "/add 2"), line("/add 2")).await;
        assert_eq!(outcome, DispatchOutcome::Executed);
        assert_eq!(bot.sent(), vec![SendMessage::new(-100i64, "[bot] 42")]);

        let outcome = engine.execute(actor(bot.clone(), "/add"), line("/add")).await;
        assert_eq!(outcome, DispatchOutcome::Failed);
        assert_eq!(
            bot.sent().last().map(|m| m.text.as_str()),
            Some("[bot] Invalid usage: missing argument #0")
        );
    }

    #[tokio::test]
    async fn test_extraction_failure_skips_handler() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);

        async fn whoami(Sender(user): Sender<User>) -> String {
            CALLS.fetch_add(1, Ordering::SeqCst);
            user.first_name
        }

        let engine = Arc::new(CommandEngine::new());
        engine.register_command("whoami", whoami);

        let bot = RecordingBot::new();
        let outcome = engine.execute(actor(bot.clone(), "/whoami"), line("/whoami")).await;

        assert_eq!(outcome, DispatchOutcome::Failed);
        assert_eq!(CALLS.load(Ordering::SeqCst), 0);
        assert_eq!(bot.sent().len(), 1);
        assert!(bot.sent()[0].text.starts_with("[bot] Invalid usage: sender type mismatch"));
    }

    #[derive(Default)]
    struct CollectingHandler {
        seen: Mutex<Vec<(Option<String>, String)>>,
    }

    #[async_trait]
    impl ExceptionHandler for Arc<CollectingHandler> {
        async fn handle(
            &self,
            _actor: &BoxedActor,
            command: Option<&ExecutableCommand>,
            error: &CommandError,
        ) {
            self.seen.lock().push((
                command.map(|c| c.name().to_string()),
                error.to_string(),
            ));
        }
    }

    #[tokio::test]
    async fn test_custom_exception_handler() {
        let collected = Arc::new(CollectingHandler::default());
        let engine = Arc::new(CommandEngine::new());
        engine.set_exception_handler(Arc::clone(&collected));
        engine.register_command("fail", || async { Err::<(), _>("boom") });

        let bot = RecordingBot::new();
        let failed = engine.execute(actor(bot.clone(), "/fail"), line("/fail")).await;
        let unknown = engine.execute(actor(bot.clone(), "/nope"), line("/nope")).await;

        assert_eq!(failed, DispatchOutcome::Failed);
        assert_eq!(unknown, DispatchOutcome::Failed);
        assert!(bot.sent().is_empty());
        assert_eq!(
            *collected.seen.lock(),
            vec![
                (Some("fail".to_string()), "boom".to_string()),
                (None, "unknown command: nope".to_string()),
            ]
        );
    }
}
