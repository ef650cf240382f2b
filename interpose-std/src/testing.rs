//! Test doubles for checkpoints and diagnostics.
//!
//! [`RecordingCheckpoint`] appends every lifecycle event to a shared
//! [`CallLog`]; [`FailingCheckpoint`] errors or panics at chosen stages;
//! [`CollectingSink`] keeps every reported [`Diagnostic`].

use crate::diagnostics::{Diagnostic, DiagnosticSink, Stage};
use interpose_core::{
    BoxError, CallError, Checkpoint, CheckpointError, CheckpointFactory, Kwargs, Value,
    factory_fn,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// One lifecycle event seen by a [`RecordingCheckpoint`].
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// `enter` with the bound arguments.
    Enter {
        /// Recording checkpoint id.
        checkpoint: usize,
        /// Positional arguments as seen by the checkpoint.
        args: Vec<Value>,
        /// Keyword arguments as seen by the checkpoint.
        kwargs: Kwargs,
    },
    /// `exit` with the result.
    Exit {
        /// Recording checkpoint id.
        checkpoint: usize,
        /// The original's return value.
        result: Value,
    },
    /// `exception` with the rendered error.
    Exception {
        /// Recording checkpoint id.
        checkpoint: usize,
        /// `to_string()` of the original's error.
        error: String,
    },
}

impl Event {
    /// An `Enter` event.
    pub fn enter(checkpoint: usize, args: Vec<Value>, kwargs: Kwargs) -> Self {
        Event::Enter {
            checkpoint,
            args,
            kwargs,
        }
    }

    /// An `Exit` event.
    pub fn exit(checkpoint: usize, result: Value) -> Self {
        Event::Exit { checkpoint, result }
    }

    /// An `Exception` event.
    pub fn exception(checkpoint: usize, error: impl Into<String>) -> Self {
        Event::Exception {
            checkpoint,
            error: error.into(),
        }
    }

    /// The id of the checkpoint that recorded this event.
    pub fn checkpoint(&self) -> usize {
        match self {
            Event::Enter { checkpoint, .. }
            | Event::Exit { checkpoint, .. }
            | Event::Exception { checkpoint, .. } => *checkpoint,
        }
    }
}

/// A shared, ordered log of `(callable name, event)` pairs.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    entries: Arc<Mutex<Vec<(String, Event)>>>,
}

impl CallLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<(String, Event)>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push(&self, target: &str, event: Event) {
        self.lock().push((target.to_string(), event));
    }

    /// Every event, in order.
    pub fn events(&self) -> Vec<Event> {
        self.lock().iter().map(|(_, e)| e.clone()).collect()
    }

    /// Every `(callable name, event)` pair, in order.
    pub fn entries(&self) -> Vec<(String, Event)> {
        self.lock().clone()
    }

    /// Names of the callables entered, in order.
    pub fn entered(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter(|(_, e)| matches!(e, Event::Enter { .. }))
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop every recorded event.
    pub fn clear(&self) {
        self.lock().clear();
    }
}

/// Records every lifecycle event into a [`CallLog`].
#[derive(Debug, Clone)]
pub struct RecordingCheckpoint {
    id: usize,
    target: String,
    log: CallLog,
}

impl RecordingCheckpoint {
    /// A checkpoint for `target` recording as `id` into `log`.
    pub fn new(id: usize, target: impl Into<String>, log: CallLog) -> Self {
        Self {
            id,
            target: target.into(),
            log,
        }
    }

    /// A factory creating a recording checkpoint for every call.
    pub fn factory(id: usize, log: CallLog) -> impl CheckpointFactory {
        factory_fn(move |target| Some(Self::new(id, target.name(), log.clone())))
    }
}

impl Checkpoint for RecordingCheckpoint {
    fn enter(&mut self, args: &[Value], kwargs: &Kwargs) -> Result<(), BoxError> {
        self.log
            .push(&self.target, Event::enter(self.id, args.to_vec(), kwargs.clone()));
        Ok(())
    }

    fn exit(&mut self, result: &Value) -> Result<(), BoxError> {
        self.log.push(&self.target, Event::exit(self.id, result.clone()));
        Ok(())
    }

    fn exception(&mut self, error: &CallError) -> Result<(), BoxError> {
        self.log
            .push(&self.target, Event::exception(self.id, error.to_string()));
        Ok(())
    }
}

/// How a [`FailingCheckpoint`] fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// Return an error.
    Error,
    /// Panic.
    Panic,
}

/// Fails at selected lifecycle stages.
#[derive(Debug, Clone)]
pub struct FailingCheckpoint {
    failure: Failure,
    stages: Vec<Stage>,
}

impl FailingCheckpoint {
    /// Return an error from every callback.
    pub fn new() -> Self {
        Self {
            failure: Failure::Error,
            stages: vec![Stage::Enter, Stage::Exit, Stage::Exception],
        }
    }

    /// Panic from every callback.
    pub fn panicking() -> Self {
        Self {
            failure: Failure::Panic,
            ..Self::new()
        }
    }

    /// Only fail at `stages`.
    pub fn at(mut self, stages: &[Stage]) -> Self {
        self.stages = stages.to_vec();
        self
    }

    /// A factory creating `self` for every call.
    pub fn into_factory(self) -> impl CheckpointFactory {
        factory_fn(move |_| Some(self.clone()))
    }

    /// A factory for [`FailingCheckpoint::new`].
    pub fn factory() -> impl CheckpointFactory {
        Self::new().into_factory()
    }

    fn fail(&self, stage: Stage) -> Result<(), BoxError> {
        if !self.stages.contains(&stage) {
            return Ok(());
        }
        match self.failure {
            Failure::Error => Err(format!("{stage} failed").into()),
            Failure::Panic => panic!("{stage} panicked"),
        }
    }
}

impl Default for FailingCheckpoint {
    fn default() -> Self {
        Self::new()
    }
}

impl Checkpoint for FailingCheckpoint {
    fn enter(&mut self, _args: &[Value], _kwargs: &Kwargs) -> Result<(), BoxError> {
        self.fail(Stage::Enter)
    }

    fn exit(&mut self, _result: &Value) -> Result<(), BoxError> {
        self.fail(Stage::Exit)
    }

    fn exception(&mut self, _error: &CallError) -> Result<(), BoxError> {
        self.fail(Stage::Exception)
    }
}

/// Keeps every reported [`Diagnostic`].
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    diagnostics: Arc<Mutex<Vec<Diagnostic>>>,
}

impl CollectingSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// The diagnostics collected so far.
    pub fn diagnostics(&self) -> MutexGuard<'_, Vec<Diagnostic>> {
        self.diagnostics.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of collected diagnostics.
    pub fn len(&self) -> usize {
        self.diagnostics().len()
    }

    /// Whether nothing was reported.
    pub fn is_empty(&self) -> bool {
        self.diagnostics().is_empty()
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, diagnostic: &Diagnostic) {
        self.diagnostics().push(Diagnostic {
            callable: diagnostic.callable.clone(),
            stage: diagnostic.stage,
            checkpoint: diagnostic.checkpoint,
            error: match &diagnostic.error {
                CheckpointError::Failed(error) => CheckpointError::Failed(error.to_string().into()),
                CheckpointError::Panic(message) => CheckpointError::Panic(message.clone()),
            },
        });
    }
}
