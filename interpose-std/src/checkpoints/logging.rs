//! Logging checkpoint for call observation.

use interpose_core::{BoxError, CallError, Checkpoint, CheckpointFactory, Kwargs, Value, factory_fn};
use std::time::{Duration, Instant};

/// Logs entry and return at `debug`, failures at `warn`.
#[derive(Debug, Clone)]
pub struct LoggingCheckpoint {
    callable: String,
    started: Option<Instant>,
}

impl LoggingCheckpoint {
    /// A checkpoint for a call to `callable`.
    pub fn new(callable: impl Into<String>) -> Self {
        Self {
            callable: callable.into(),
            started: None,
        }
    }

    fn elapsed(&self) -> Duration {
        self.started.map(|t| t.elapsed()).unwrap_or_default()
    }
}

impl Checkpoint for LoggingCheckpoint {
    fn enter(&mut self, args: &[Value], kwargs: &Kwargs) -> Result<(), BoxError> {
        tracing::debug!(callable = %self.callable, ?args, ?kwargs, "call entered");
        self.started = Some(Instant::now());
        Ok(())
    }

    fn exit(&mut self, result: &Value) -> Result<(), BoxError> {
        tracing::debug!(
            callable = %self.callable,
            elapsed = ?self.elapsed(),
            %result,
            "call returned"
        );
        Ok(())
    }

    fn exception(&mut self, error: &CallError) -> Result<(), BoxError> {
        tracing::warn!(
            callable = %self.callable,
            elapsed = ?self.elapsed(),
            %error,
            "call failed"
        );
        Ok(())
    }
}

/// A factory attaching a [`LoggingCheckpoint`] to every call.
pub fn logging_factory() -> impl CheckpointFactory {
    factory_fn(|target| Some(LoggingCheckpoint::new(target.name())))
}
