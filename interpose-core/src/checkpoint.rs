//! # Checkpoint Protocol
//!
//! A [`Checkpoint`] observes a single intercepted call. For every call, each
//! registered [`CheckpointFactory`] is asked for a fresh checkpoint; the
//! checkpoints then see, in order:
//!
//! 1. [`enter`](Checkpoint::enter) before the original runs, then
//! 2. exactly one of [`exit`](Checkpoint::exit) (normal return) or
//!    [`exception`](Checkpoint::exception) (failure).
//!
//! Errors returned from any of these are isolated by the registry: they are
//! reported through diagnostics and never change the call's outcome.

use crate::{
    callable::Callable,
    error::{BoxError, CallError},
    value::{Kwargs, Value},
};

/// A call-scoped lifecycle observer.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `Checkpoint`",
    label = "missing `Checkpoint` implementation",
    note = "Checkpoints must implement `enter`, `exit` and `exception`."
)]
pub trait Checkpoint: Send + 'static {
    /// Called before the original callable, with the bound arguments.
    ///
    /// The arguments are borrowed immutably: what is forwarded to the
    /// original cannot be changed from here.
    fn enter(&mut self, args: &[Value], kwargs: &Kwargs) -> Result<(), BoxError>;

    /// Called after the original returned normally.
    fn exit(&mut self, result: &Value) -> Result<(), BoxError>;

    /// Called after the original failed.
    fn exception(&mut self, error: &CallError) -> Result<(), BoxError>;
}

impl<C: Checkpoint + ?Sized> Checkpoint for Box<C> {
    fn enter(&mut self, args: &[Value], kwargs: &Kwargs) -> Result<(), BoxError> {
        (**self).enter(args, kwargs)
    }

    fn exit(&mut self, result: &Value) -> Result<(), BoxError> {
        (**self).exit(result)
    }

    fn exception(&mut self, error: &CallError) -> Result<(), BoxError> {
        (**self).exception(error)
    }
}

/// Produces a checkpoint for a call to `target`, or `None` to opt out.
///
/// Implemented for closures
/// `Fn(&dyn Callable) -> Result<Option<Box<dyn Checkpoint>>, BoxError>`; for
/// infallible factories returning a concrete checkpoint type, see
/// [`factory_fn`].
pub trait CheckpointFactory: Send + Sync + 'static {
    /// Create the checkpoint for one call.
    fn create(&self, target: &dyn Callable) -> Result<Option<Box<dyn Checkpoint>>, BoxError>;
}

impl<F> CheckpointFactory for F
where
    F: Fn(&dyn Callable) -> Result<Option<Box<dyn Checkpoint>>, BoxError> + Send + Sync + 'static,
{
    fn create(&self, target: &dyn Callable) -> Result<Option<Box<dyn Checkpoint>>, BoxError> {
        (self)(target)
    }
}

/// A [`CheckpointFactory`] built from an infallible closure.
///
/// Created by [`factory_fn`].
#[derive(Clone)]
pub struct FactoryFn<F> {
    f: F,
}

/// Adapt `Fn(&dyn Callable) -> Option<C>` into a [`CheckpointFactory`].
///
/// ```rust,ignore
/// hook.add_checkpoint_factory(factory_fn(|target| {
///     (target.name() != "__init__").then(|| Recorder::new(target.name()))
/// }));
/// ```
pub fn factory_fn<F, C>(f: F) -> FactoryFn<F>
where
    F: Fn(&dyn Callable) -> Option<C> + Send + Sync + 'static,
    C: Checkpoint,
{
    FactoryFn { f }
}

impl<F, C> CheckpointFactory for FactoryFn<F>
where
    F: Fn(&dyn Callable) -> Option<C> + Send + Sync + 'static,
    C: Checkpoint,
{
    fn create(&self, target: &dyn Callable) -> Result<Option<Box<dyn Checkpoint>>, BoxError> {
        Ok((self.f)(target).map(|c| Box::new(c) as Box<dyn Checkpoint>))
    }
}
