//! Handler functions.
//!
//! Any `async fn` whose parameters implement
//! [`FromInvocation`](crate::extractor::FromInvocation) and whose return type
//! implements [`HandleResponse`] is a [`Handler`]:
//!
//! ```rust,ignore
//! async fn echo(args: Args) -> String {
//!     args.rest()
//! }
//!
//! async fn whoami(Sender(user): Sender<User>) -> String {
//!     format!("You are {}", user.full_name())
//! }
//!
//! async fn strict(args: Args) -> CommandResult<String> {
//!     let n: u32 = args.parse(0)?;
//!     Ok(format!("{}", n * 2))
//! }
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::command::Invocation;
use crate::error::{CommandError, CommandResult};
use crate::extractor::FromInvocation;

/// Turns a handler's return value into the command's outcome.
#[async_trait]
pub trait HandleResponse: Send {
    /// Consumes the value, replying to the actor where appropriate.
    async fn into_response(self, invocation: &Invocation) -> CommandResult<()>;
}

#[async_trait]
impl HandleResponse for () {
    async fn into_response(self, _invocation: &Invocation) -> CommandResult<()> {
        Ok(())
    }
}

/// A `String` is sent back to the actor.
#[async_trait]
impl HandleResponse for String {
    async fn into_response(self, invocation: &Invocation) -> CommandResult<()> {
        invocation.actor().reply(&self).await
    }
}

#[async_trait]
impl<T: HandleResponse> HandleResponse for Option<T> {
    async fn into_response(self, invocation: &Invocation) -> CommandResult<()> {
        match self {
            Some(t) => t.into_response(invocation).await,
            None => Ok(()),
        }
    }
}

/// `Err` values become command failures and reach the exception handler.
#[async_trait]
impl<T, E> HandleResponse for Result<T, E>
where
    T: HandleResponse,
    E: Into<CommandError> + Send,
{
    async fn into_response(self, invocation: &Invocation) -> CommandResult<()> {
        match self {
            Ok(t) => t.into_response(invocation).await,
            Err(e) => Err(e.into()),
        }
    }
}

/// An async command handler.
///
/// Implemented for async functions taking up to 8 [`FromInvocation`]
/// parameters. Extraction stops at the first parameter that fails and the
/// error is returned without calling the function.
#[async_trait]
pub trait Handler<T>: Clone + Send + Sync + 'static {
    /// Runs the handler for one invocation.
    async fn call(self, invocation: Arc<Invocation>) -> CommandResult<()>;
}

/// A type-erased handler stored in the engine's command table.
pub type BoxedCommand =
    Arc<dyn Fn(Arc<Invocation>) -> BoxFuture<'static, CommandResult<()>> + Send + Sync>;

/// Erases a handler function into a [`BoxedCommand`].
pub fn into_command<F, T>(f: F) -> BoxedCommand
where
    F: Handler<T>,
    T: 'static,
{
    Arc::new(move |invocation| f.clone().call(invocation))
}

macro_rules! impl_handler {
    (
        $($ty:ident),*
    ) => {
        #[allow(non_snake_case)]
        #[async_trait]
        impl<F, Fut, Res, $($ty,)*> Handler<($($ty,)*)> for F
        where
            F: FnOnce($($ty,)*) -> Fut + Clone + Send + Sync + 'static,
            Fut: Future<Output = Res> + Send + 'static,
            Res: HandleResponse + 'static,
            $( $ty: FromInvocation + Send + 'static, )*
        {
            async fn call(self, invocation: Arc<Invocation>) -> CommandResult<()> {
                $(
                    let $ty = $ty::from_invocation(&invocation)?;
                )*

                let res = (self)($($ty,)*).await;
                res.into_response(&invocation).await
            }
        }
    };
}

impl_handler!();
impl_handler!(T1);
impl_handler!(T1, T2);
impl_handler!(T1, T2, T3);
impl_handler!(T1, T2, T3, T4);
impl_handler!(T1, T2, T3, T4, T5);
impl_handler!(T1, T2, T3, T4, T5, T6);
impl_handler!(T1, T2, T3, T4, T5, T6, T7);
impl_handler!(T1, T2, T3, T4, T5, T6, T7, T8);
