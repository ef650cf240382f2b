//! Hook registry: checkpoint factories and isolated lifecycle dispatch.
//!
//! The registry owns an ordered list of [`CheckpointFactory`]s. For every
//! intercepted call it instantiates one checkpoint per factory and dispatches
//! the lifecycle callbacks to them in registration order. Each factory and
//! each callback runs in isolation: an error or a panic is reported to the
//! [`DiagnosticSink`] and the remaining checkpoints carry on.
//!
//! The lifecycle is enforced by type state: [`instantiate`] yields
//! `Checkpoints<Created>`, [`dispatch_enter`] turns it into
//! `Checkpoints<Entered>`, and [`dispatch_exit`] / [`dispatch_exception`]
//! consume it, so no checkpoint can see both terminal callbacks.
//!
//! [`instantiate`]: HookRegistry::instantiate
//! [`dispatch_enter`]: HookRegistry::dispatch_enter
//! [`dispatch_exit`]: HookRegistry::dispatch_exit
//! [`dispatch_exception`]: HookRegistry::dispatch_exception

use crate::diagnostics::{Diagnostic, DiagnosticSink, Stage, TracingSink};
use interpose_core::{
    BoxError, CallError, Callable, Checkpoint, CheckpointError, CheckpointFactory, HookId, Kwargs,
    Value,
};
use std::{
    any::Any,
    fmt,
    marker::PhantomData,
    panic::{self, AssertUnwindSafe},
    sync::{
        Arc, PoisonError, RwLock,
        atomic::{AtomicU64, Ordering},
    },
};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Type state: checkpoints created, `enter` not yet dispatched.
#[derive(Debug)]
pub enum Created {}

/// Type state: `enter` dispatched, awaiting `exit` or `exception`.
#[derive(Debug)]
pub enum Entered {}

/// The checkpoints instantiated for one call.
pub struct Checkpoints<S> {
    callable: String,
    entries: Vec<(usize, Box<dyn Checkpoint>)>,
    _state: PhantomData<S>,
}

impl<S> Checkpoints<S> {
    /// Number of live checkpoints (factories that did not opt out or fail).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no checkpoint is live.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Name of the intercepted callable.
    pub fn callable(&self) -> &str {
        &self.callable
    }

    fn advance<T>(self) -> Checkpoints<T> {
        Checkpoints {
            callable: self.callable,
            entries: self.entries,
            _state: PhantomData,
        }
    }
}

impl<S> fmt::Debug for Checkpoints<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Checkpoints")
            .field("callable", &self.callable)
            .field(
                "factories",
                &self.entries.iter().map(|(i, _)| *i).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// An ordered, append-only list of checkpoint factories.
///
/// Shared by `Arc` between a [`Hook`](crate::Hook) and every wrapper it
/// synthesizes, so factories added after wrapping apply to later calls.
pub struct HookRegistry {
    id: HookId,
    factories: RwLock<Vec<Arc<dyn CheckpointFactory>>>,
    sink: Arc<dyn DiagnosticSink>,
}

impl HookRegistry {
    /// Create an empty registry reporting to [`TracingSink`].
    pub fn new() -> Self {
        Self::with_sink(Arc::new(TracingSink))
    }

    /// Create an empty registry reporting to `sink`.
    pub fn with_sink(sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            id: HookId(NEXT_ID.fetch_add(1, Ordering::Relaxed)),
            factories: RwLock::new(Vec::new()),
            sink,
        }
    }

    /// This registry's identity, as reported by its wrappers'
    /// [`Callable::hooked_by`].
    pub fn id(&self) -> HookId {
        self.id
    }

    /// Append a factory. No deduplication; registration order is dispatch
    /// order.
    pub fn add_checkpoint_factory(&self, factory: impl CheckpointFactory) {
        self.add_shared_factory(Arc::new(factory));
    }

    /// Append an already shared factory.
    pub fn add_shared_factory(&self, factory: Arc<dyn CheckpointFactory>) {
        let mut factories = self.factories.write().unwrap_or_else(PoisonError::into_inner);
        factories.push(factory);
        tracing::debug!(
            registry = self.id.0,
            index = factories.len() - 1,
            "checkpoint factory registered"
        );
    }

    /// Number of registered factories.
    pub fn len(&self) -> usize {
        self.factories.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether no factory is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run every factory for a call to `target`.
    ///
    /// Factories returning `None` are skipped silently; failing factories are
    /// reported and skipped.
    pub fn instantiate(&self, target: &dyn Callable) -> Checkpoints<Created> {
        // Snapshot so factories run without holding the lock.
        let factories: Vec<_> = self
            .factories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        let mut entries = Vec::with_capacity(factories.len());
        for (index, factory) in factories.iter().enumerate() {
            match isolate(|| factory.create(target)) {
                Ok(Some(checkpoint)) => entries.push((index, checkpoint)),
                Ok(None) => {}
                Err(error) => self.report(target.name(), Stage::Instantiate, index, error),
            }
        }

        Checkpoints {
            callable: target.name().to_string(),
            entries,
            _state: PhantomData,
        }
    }

    /// Dispatch `enter` to every checkpoint.
    pub fn dispatch_enter(
        &self,
        mut checkpoints: Checkpoints<Created>,
        args: &[Value],
        kwargs: &Kwargs,
    ) -> Checkpoints<Entered> {
        self.dispatch(&mut checkpoints, Stage::Enter, |cp| cp.enter(args, kwargs));
        checkpoints.advance()
    }

    /// Dispatch `exit` to every checkpoint.
    pub fn dispatch_exit(&self, mut checkpoints: Checkpoints<Entered>, result: &Value) {
        self.dispatch(&mut checkpoints, Stage::Exit, |cp| cp.exit(result));
    }

    /// Dispatch `exception` to every checkpoint.
    pub fn dispatch_exception(&self, mut checkpoints: Checkpoints<Entered>, error: &CallError) {
        self.dispatch(&mut checkpoints, Stage::Exception, |cp| cp.exception(error));
    }

    fn dispatch<S>(
        &self,
        checkpoints: &mut Checkpoints<S>,
        stage: Stage,
        mut callback: impl FnMut(&mut dyn Checkpoint) -> Result<(), BoxError>,
    ) {
        let Checkpoints {
            callable, entries, ..
        } = checkpoints;
        for (index, checkpoint) in entries.iter_mut() {
            if let Err(error) = isolate(|| callback(checkpoint.as_mut())) {
                self.report(callable, stage, *index, error);
            }
        }
    }

    fn report(&self, callable: &str, stage: Stage, checkpoint: usize, error: CheckpointError) {
        self.sink.report(&Diagnostic {
            callable: callable.to_string(),
            stage,
            checkpoint,
            error,
        });
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookRegistry")
            .field("id", &self.id)
            .field("factories", &self.len())
            .finish_non_exhaustive()
    }
}

fn isolate<T>(f: impl FnOnce() -> Result<T, BoxError>) -> Result<T, CheckpointError> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(error)) => Err(CheckpointError::Failed(error)),
        Err(payload) => Err(CheckpointError::Panic(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
