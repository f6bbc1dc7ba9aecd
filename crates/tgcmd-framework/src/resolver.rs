//! Sender resolution.
//!
//! When a handler parameter asks for "the sender" in some specific form, the
//! engine consults its registered [`SenderResolver`]s. A resolver first says
//! whether it recognizes the requested type ([`is_custom_type`]) and then
//! produces the value ([`resolve`]).
//!
//! [`is_custom_type`]: SenderResolver::is_custom_type
//! [`resolve`]: SenderResolver::resolve

use std::any::{Any, TypeId, type_name};
use std::sync::Arc;

use tgcmd_core::{CallbackSource, DispatchSource, MessageSource, SourceVariant, User};

use crate::actor::{BoxedActor, TelegramActor};
use crate::command::ExecutableCommand;
use crate::error::{ExtractError, ExtractResult};

/// Strategy for producing typed sender values from an actor.
pub trait SenderResolver: Send + Sync {
    /// Returns `true` if this resolver recognizes the requested type.
    fn is_custom_type(&self, type_id: TypeId) -> bool;

    /// Produces a value of the requested type from the current actor.
    ///
    /// The returned box must hold a value whose type matches `type_id`, or
    /// the actor itself when the type is not one of the resolver's custom
    /// types.
    fn resolve(
        &self,
        type_id: TypeId,
        actor: &BoxedActor,
        command: &ExecutableCommand,
    ) -> ExtractResult<Box<dyn Any + Send>>;
}

/// Resolves Telegram senders.
///
/// | requested type                       | resolved value                       |
/// |--------------------------------------|--------------------------------------|
/// | [`User`]                             | the event's author                   |
/// | [`DispatchSource`]                   | the event's dispatch source          |
/// | [`MessageSource`] / [`CallbackSource`] | that variant, if the source holds it |
/// | anything else                        | the `Arc<TelegramActor>` itself      |
///
/// The last row is the fallback: unrecognized types degrade to the full actor
/// rather than failing, and the engine decides whether the actor fits.
#[derive(Debug, Clone, Copy, Default)]
pub struct TelegramSenderResolver;

impl TelegramSenderResolver {
    fn variant<V: SourceVariant>(actor: &TelegramActor) -> ExtractResult<Box<dyn Any + Send>> {
        let variant = actor.dispatch_source().downcast::<V>()?;
        Ok(Box::new(variant.clone()))
    }
}

impl SenderResolver for TelegramSenderResolver {
    fn is_custom_type(&self, type_id: TypeId) -> bool {
        type_id == TypeId::of::<User>()
            || type_id == TypeId::of::<DispatchSource>()
            || type_id == TypeId::of::<MessageSource>()
            || type_id == TypeId::of::<CallbackSource>()
    }

    fn resolve(
        &self,
        type_id: TypeId,
        actor: &BoxedActor,
        _command: &ExecutableCommand,
    ) -> ExtractResult<Box<dyn Any + Send>> {
        let actor = Arc::clone(actor)
            .into_any()
            .downcast::<TelegramActor>()
            .map_err(|_| ExtractError::ActorTypeMismatch {
                expected: type_name::<TelegramActor>(),
            })?;

        if type_id == TypeId::of::<User>() {
            return Ok(Box::new(actor.user().clone()));
        }
        if type_id == TypeId::of::<DispatchSource>() {
            return Ok(Box::new(actor.dispatch_source().clone()));
        }
        if type_id == TypeId::of::<MessageSource>() {
            return Self::variant::<MessageSource>(&actor);
        }
        if type_id == TypeId::of::<CallbackSource>() {
            return Self::variant::<CallbackSource>(&actor);
        }
        Ok(Box::new(actor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use uuid::Uuid;

    use tgcmd_core::SourceKind;

    use crate::actor::CommandActor;
    use crate::error::CommandResult;
    use crate::testing::{RecordingBot, callback_source, handler, message_source};

    fn command() -> ExecutableCommand {
        ExecutableCommand::new("test")
    }

    fn telegram_actor(source: DispatchSource) -> (Arc<TelegramActor>, BoxedActor) {
        let actor = TelegramActor::wrap(handler(RecordingBot::new()), source);
        let boxed: BoxedActor = actor.clone();
        (actor, boxed)
    }

    struct ConsoleActor;

    #[async_trait]
    impl CommandActor for ConsoleActor {
        fn name(&self) -> &str {
            "console"
        }

        fn unique_id(&self) -> Uuid {
            Uuid::nil()
        }

        async fn reply(&self, _message: &str) -> CommandResult<()> {
            Ok(())
        }

        async fn error(&self, _message: &str) -> CommandResult<()> {
            Ok(())
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
            self
        }
    }

    #[test]
    fn test_custom_types() {
        let resolver = TelegramSenderResolver;
        assert!(resolver.is_custom_type(TypeId::of::<User>()));
        assert!(resolver.is_custom_type(TypeId::of::<DispatchSource>()));
        assert!(resolver.is_custom_type(TypeId::of::<MessageSource>()));
        assert!(resolver.is_custom_type(TypeId::of::<CallbackSource>()));
        assert!(!resolver.is_custom_type(TypeId::of::<String>()));
        assert!(!resolver.is_custom_type(TypeId::of::<Arc<TelegramActor>>()));
        assert!(!resolver.is_custom_type(TypeId::of::<BoxedActor>()));
    }

    #[test]
    fn test_resolve_author() {
        let (actor, boxed) = telegram_actor(message_source("/start"));
        let value = TelegramSenderResolver
            .resolve(TypeId::of::<User>(), &boxed, &command())
            .unwrap();
        assert_eq!(*value.downcast::<User>().unwrap(), *actor.user());
    }

    #[test]
    fn test_resolve_dispatch_source() {
        let (actor, boxed) = telegram_actor(callback_source("press:1", false));
        let value = TelegramSenderResolver
            .resolve(TypeId::of::<DispatchSource>(), &boxed, &command())
            .unwrap();
        let source = value.downcast::<DispatchSource>().unwrap();
        assert_eq!(source.source_id(), actor.dispatch_source().source_id());
        assert_eq!(source.text(), Some("press:1"));
    }

    #[test]
    fn test_resolve_variant() {
        let (_, boxed) = telegram_actor(callback_source("press:1", false));
        let value = TelegramSenderResolver
            .resolve(TypeId::of::<CallbackSource>(), &boxed, &command())
            .unwrap();
        assert_eq!(value.downcast::<CallbackSource>().unwrap().query().id, "cb-1");

        let err = TelegramSenderResolver
            .resolve(TypeId::of::<MessageSource>(), &boxed, &command())
            .unwrap_err();
        assert!(matches!(
            err,
            ExtractError::SourceCast(e) if e.expected == SourceKind::Message
        ));
    }

    #[test]
    fn test_resolve_falls_back_to_actor() {
        let (actor, boxed) = telegram_actor(message_source("/start"));
        let value = TelegramSenderResolver
            .resolve(TypeId::of::<String>(), &boxed, &command())
            .unwrap();
        let resolved = value.downcast::<Arc<TelegramActor>>().unwrap();
        assert!(Arc::ptr_eq(&resolved, &actor));
    }

    #[test]
    fn test_rejects_foreign_actor() {
        let boxed: BoxedActor = Arc::new(ConsoleActor);
        let err = TelegramSenderResolver
            .resolve(TypeId::of::<User>(), &boxed, &command())
            .unwrap_err();
        assert!(matches!(err, ExtractError::ActorTypeMismatch { .. }));
    }
}
