//! Process-wide checkpoint factory registration via `inventory`.
//!
//! Factories submitted anywhere in the program with
//! [`submit_checkpoint!`](crate::submit_checkpoint) are picked up by
//! [`HookBuilder::with_registered_factories`](crate::HookBuilder::with_registered_factories),
//! in name order.

use interpose_core::CheckpointFactory;
use std::sync::Arc;

/// A factory submitted with [`submit_checkpoint!`](crate::submit_checkpoint).
pub struct CheckpointRegistration {
    /// Name used for ordering and logging.
    pub name: &'static str,
    /// Produces the factory.
    pub create: fn() -> Arc<dyn CheckpointFactory>,
}

impl CheckpointRegistration {
    /// Create a registration entry.
    pub const fn new(name: &'static str, create: fn() -> Arc<dyn CheckpointFactory>) -> Self {
        Self { name, create }
    }
}

inventory::collect!(CheckpointRegistration);

/// Every submitted factory, sorted by registration name.
pub fn registered_factories() -> Vec<Arc<dyn CheckpointFactory>> {
    let mut entries: Vec<&CheckpointRegistration> =
        inventory::iter::<CheckpointRegistration>.into_iter().collect();
    entries.sort_by_key(|entry| entry.name);

    entries
        .into_iter()
        .map(|entry| {
            tracing::debug!(name = entry.name, "registered checkpoint factory collected");
            (entry.create)()
        })
        .collect()
}

/// Registers a checkpoint factory for
/// [`HookBuilder::with_registered_factories`](crate::HookBuilder::with_registered_factories).
///
/// The expression must evaluate to a `CheckpointFactory`. It is evaluated
/// each time the registered factories are collected.
///
/// # Example
/// ```rust,ignore
/// submit_checkpoint!("logging", interpose::checkpoints::logging_factory());
/// ```
#[macro_export]
macro_rules! submit_checkpoint {
    ($name:expr, $factory:expr) => {
        $crate::inventory::submit! {
            $crate::registration::CheckpointRegistration::new(
                $name,
                || -> ::std::sync::Arc<dyn $crate::__private::CheckpointFactory> {
                    ::std::sync::Arc::new($factory)
                },
            )
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FailingCheckpoint;

    crate::submit_checkpoint!("zz-failing", FailingCheckpoint::factory());

    #[test]
    fn test_submitted_factory_is_collected() {
        assert!(!registered_factories().is_empty());
    }
}
