//! # interpose-std
//!
//! Standard implementations for the interpose function interception
//! framework.
//!
//! This crate provides:
//! - **Hook registry**: [`HookRegistry`] with isolated, type-state checked
//!   checkpoint dispatch
//! - **Wrappers**: [`Wrapper`], [`synthesize`]
//! - **Classes**: [`Class`], [`ClassBuilder`], [`Instance`] with C3
//!   resolution order
//! - **Front door**: [`Hook`], [`HookBuilder`], [`RehookPolicy`]
//! - **Diagnostics**: [`DiagnosticSink`], [`TracingSink`]
//! - **Standard checkpoints**: [`checkpoints::LoggingCheckpoint`]
//! - **Testing utilities**: [`testing`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core
pub use interpose_core;

pub mod checkpoints;
pub mod class;
pub mod diagnostics;
mod hook;
pub mod registry;
pub mod testing;
pub mod wrapper;

#[cfg(feature = "inventory")]
pub mod registration;

#[cfg(feature = "inventory")]
pub use inventory;

pub use class::{Class, ClassBuilder, Instance, Member};
pub use diagnostics::{Diagnostic, DiagnosticSink, Stage, TracingSink};
pub use hook::{Hook, HookBuilder, RehookPolicy};
pub use registry::{Checkpoints, Created, Entered, HookRegistry};
pub use wrapper::{Wrapper, synthesize};

#[doc(hidden)]
pub mod __private {
    pub use interpose_core::CheckpointFactory;
}
