//! Standard checkpoints.

mod logging;

pub use logging::{LoggingCheckpoint, logging_factory};
