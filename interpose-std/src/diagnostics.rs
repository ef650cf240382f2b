//! Non-fatal diagnostics channel.
//!
//! Checkpoint failures never reach the caller of an intercepted function.
//! The registry reports them to a [`DiagnosticSink`] instead; the default
//! [`TracingSink`] logs them with `tracing`.

use interpose_core::CheckpointError;
use std::fmt;

/// The lifecycle stage at which a checkpoint failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// The factory failed while creating the checkpoint.
    Instantiate,
    /// `enter` failed.
    Enter,
    /// `exit` failed.
    Exit,
    /// `exception` failed.
    Exception,
}

impl Stage {
    /// Lower-case stage name.
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Instantiate => "instantiate",
            Stage::Enter => "enter",
            Stage::Exit => "exit",
            Stage::Exception => "exception",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One isolated checkpoint failure.
#[derive(Debug)]
pub struct Diagnostic {
    /// Name of the intercepted callable.
    pub callable: String,
    /// Where in the lifecycle the failure happened.
    pub stage: Stage,
    /// Registration index of the factory that produced the checkpoint.
    pub checkpoint: usize,
    /// What went wrong.
    pub error: CheckpointError,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} checkpoint #{} error in `{}`: {}",
            self.stage, self.checkpoint, self.callable, self.error
        )
    }
}

/// Receives isolated checkpoint failures.
pub trait DiagnosticSink: Send + Sync + 'static {
    /// Report one failure.
    fn report(&self, diagnostic: &Diagnostic);
}

impl<F> DiagnosticSink for F
where
    F: Fn(&Diagnostic) + Send + Sync + 'static,
{
    fn report(&self, diagnostic: &Diagnostic) {
        (self)(diagnostic);
    }
}

/// Logs every diagnostic at `warn` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: &Diagnostic) {
        tracing::warn!(
            callable = %diagnostic.callable,
            stage = %diagnostic.stage,
            checkpoint = diagnostic.checkpoint,
            error = %diagnostic.error,
            "{} checkpoint error",
            diagnostic.stage
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_display() {
        let diagnostic = Diagnostic {
            callable: "run".to_string(),
            stage: Stage::Enter,
            checkpoint: 2,
            error: CheckpointError::Panic("boom".to_string()),
        };
        assert_eq!(
            diagnostic.to_string(),
            "enter checkpoint #2 error in `run`: checkpoint panicked: boom"
        );
    }

    #[test]
    fn test_tracing_sink_does_not_panic() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        TracingSink.report(&Diagnostic {
            callable: "run".to_string(),
            stage: Stage::Exit,
            checkpoint: 0,
            error: CheckpointError::Failed("nope".into()),
        });
    }
}
