//! Handler parameter extraction.
//!
//! Every handler parameter implements [`FromInvocation`]. The built-in
//! extractors are:
//!
//! - [`Sender<T>`] - the caller, resolved through the engine's sender resolvers
//! - [`Dependency<T>`] - a value registered with the engine
//! - [`Args`] - the positional arguments of the command line
//! - [`BoxedActor`], [`ExecutableCommand`], [`CommandLine`]
//! - `Option<T>` - any extractor, with failure turned into `None`
//!
//! [`User`], [`DispatchSource`], its variants and `Arc<TelegramActor>` can
//! also be taken directly, which is shorthand for `Sender<T>`.

use std::any::{Any, type_name};
use std::ops::Deref;
use std::str::FromStr;
use std::sync::Arc;

use tgcmd_core::{CallbackSource, DispatchSource, MessageSource, User};

use crate::actor::{BoxedActor, TelegramActor};
use crate::command::{CommandLine, ExecutableCommand, Invocation};
use crate::error::{ExtractError, ExtractResult};

/// Extracts a value from the current invocation.
pub trait FromInvocation: Sized {
    /// Performs the extraction.
    fn from_invocation(invocation: &Invocation) -> ExtractResult<Self>;
}

impl<T: FromInvocation> FromInvocation for Option<T> {
    fn from_invocation(invocation: &Invocation) -> ExtractResult<Self> {
        Ok(T::from_invocation(invocation).ok())
    }
}

impl FromInvocation for BoxedActor {
    fn from_invocation(invocation: &Invocation) -> ExtractResult<Self> {
        Ok(Arc::clone(invocation.actor()))
    }
}

impl FromInvocation for ExecutableCommand {
    fn from_invocation(invocation: &Invocation) -> ExtractResult<Self> {
        Ok(invocation.command().clone())
    }
}

impl FromInvocation for CommandLine {
    fn from_invocation(invocation: &Invocation) -> ExtractResult<Self> {
        Ok(invocation.line().clone())
    }
}

/// The caller of the command, in the requested form.
///
/// ```rust,ignore
/// async fn handler(Sender(user): Sender<User>) { ... }
/// async fn handler(Sender(actor): Sender<Arc<TelegramActor>>) { ... }
/// ```
#[derive(Debug, Clone)]
pub struct Sender<T>(pub T);

impl<T> Deref for Sender<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: Any + Send> FromInvocation for Sender<T> {
    fn from_invocation(invocation: &Invocation) -> ExtractResult<Self> {
        invocation
            .engine()
            .resolve_sender::<T>(invocation.actor(), invocation.command())
            .map(Sender)
    }
}

macro_rules! impl_sender_shorthand {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromInvocation for $ty {
                fn from_invocation(invocation: &Invocation) -> ExtractResult<Self> {
                    Sender::<$ty>::from_invocation(invocation).map(|Sender(value)| value)
                }
            }
        )*
    };
}

impl_sender_shorthand!(
    User,
    DispatchSource,
    MessageSource,
    CallbackSource,
    Arc<TelegramActor>,
);

/// A value registered with
/// [`CommandEngine::register_dependency`](crate::engine::CommandEngine::register_dependency).
#[derive(Debug, Clone)]
pub struct Dependency<T>(pub T);

impl<T> Deref for Dependency<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: Clone + Send + Sync + 'static> FromInvocation for Dependency<T> {
    fn from_invocation(invocation: &Invocation) -> ExtractResult<Self> {
        invocation
            .engine()
            .dependency::<T>()
            .map(Dependency)
            .ok_or(ExtractError::MissingDependency {
                type_name: type_name::<T>(),
            })
    }
}

/// The positional arguments of the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args(pub Vec<String>);

impl Args {
    /// Returns the argument at `index`.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    /// Parses the argument at `index`.
    pub fn parse<T>(&self, index: usize) -> ExtractResult<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let raw = self
            .get(index)
            .ok_or(ExtractError::MissingArgument { index })?;
        raw.parse().map_err(|e: T::Err| ExtractError::InvalidArgument {
            index,
            value: raw.to_string(),
            reason: e.to_string(),
        })
    }

    /// Joins all arguments with single spaces.
    pub fn rest(&self) -> String {
        self.0.join(" ")
    }

    /// Returns the number of arguments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no arguments were given.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromInvocation for Args {
    fn from_invocation(invocation: &Invocation) -> ExtractResult<Self> {
        Ok(Args(invocation.line().args().to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tgcmd_core::{BoxedBot, SourceKind};

    use crate::testing::{RecordingBot, callback_source, handler, message_source};

    fn invocation(source: DispatchSource) -> Invocation {
        let handler = handler(RecordingBot::new());
        let kind = source.kind();
        let line = CommandLine::parse(source.execution_text().unwrap(), kind).unwrap();
        let command = ExecutableCommand::new(line.name());
        let actor: BoxedActor = TelegramActor::wrap(Arc::clone(&handler), source);
        Invocation::new(actor, command, line, Arc::clone(handler.engine()))
    }

    #[test]
    fn test_args() {
        let inv = invocation(message_source("/add 2 x"));
        let args = Args::from_invocation(&inv).unwrap();

        assert_eq!(args.len(), 2);
        assert_eq!(args.get(0), Some("2"));
        assert_eq!(args.rest(), "2 x");
        assert_eq!(args.parse::<u32>(0).unwrap(), 2);
        assert!(matches!(
            args.parse::<u32>(1),
            Err(ExtractError::InvalidArgument { index: 1, .. })
        ));
        assert!(matches!(
            args.parse::<u32>(2),
            Err(ExtractError::MissingArgument { index: 2 })
        ));
    }

    #[test]
    fn test_sender_shorthands() {
        let inv = invocation(message_source("/whoami"));

        assert_eq!(User::from_invocation(&inv).unwrap().id, 42);
        assert_eq!(
            DispatchSource::from_invocation(&inv).unwrap().kind(),
            SourceKind::Message
        );
        assert!(MessageSource::from_invocation(&inv).is_ok());
        assert!(matches!(
            CallbackSource::from_invocation(&inv),
            Err(ExtractError::SourceCast(_))
        ));
        assert_eq!(Arc::<TelegramActor>::from_invocation(&inv).unwrap().id(), 42);
        assert!(Option::<CallbackSource>::from_invocation(&inv).unwrap().is_none());
    }

    #[test]
    fn test_unresolvable_sender() {
        let inv = invocation(callback_source("press 1", true));
        assert!(matches!(
            Sender::<String>::from_invocation(&inv),
            Err(ExtractError::SenderTypeMismatch { .. })
        ));
    }

    #[test]
    fn test_dependencies() {
        let inv = invocation(message_source("/ping"));

        let Dependency(bot) = Dependency::<BoxedBot>::from_invocation(&inv).unwrap();
        assert_eq!(bot.id(), "test-bot");
        assert!(matches!(
            Dependency::<u64>::from_invocation(&inv),
            Err(ExtractError::MissingDependency { .. })
        ));

        inv.engine().register_dependency(7u64);
        assert_eq!(*Dependency::<u64>::from_invocation(&inv).unwrap(), 7);
    }
}
