//! # interpose-core
//!
//! Core types for the interpose function interception framework.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! code that only needs to describe callables or implement checkpoints,
//! without the registry and class machinery of `interpose-std`.
//!
//! # Building Blocks
//!
//! ## Signature Model ([`Signature`])
//!
//! An ordered list of [`Parameter`]s, each of one of five [`ParameterKind`]s,
//! plus a return annotation. From it the crate derives:
//!
//! - the plain and typed *declarations* (what callers see), with defaults and
//!   types handed over in placeholder-keyed side tables,
//! - the *forwarding call* (how a wrapper re-invokes the original),
//! - argument *binding* ([`Signature::bind`]) with defaults applied.
//!
//! ## Invocation Convention ([`Arguments`], [`Callable`])
//!
//! Every callable takes an ordered positional list plus a keyword mapping.
//! [`Function`] pairs a signature with a body; [`Method`] tags a callable with
//! its [`MethodKind`].
//!
//! ## Checkpoint Protocol ([`Checkpoint`], [`CheckpointFactory`])
//!
//! Call-scoped observers notified on `enter`, `exit` and `exception`.
//!
//! # Error Types
//!
//! - [`InterposeError`] - Top-level error type
//! - [`SignatureError`] - Invalid descriptors
//! - [`BindError`] - Arguments that do not fit
//! - [`CallError`] - What a call can surface to its caller

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod arguments;
mod callable;
mod checkpoint;
pub mod declaration;
mod error;
mod parameter;
mod signature;
mod value;

// Re-exports
pub use arguments::{Arguments, BoundArguments};
pub use callable::{Callable, Function, HookId, Method, MethodKind, MethodKinds};
pub use checkpoint::{Checkpoint, CheckpointFactory, FactoryFn, factory_fn};
pub use declaration::{Declaration, TypedDeclaration};
pub use error::{
    BindError, BoxError, CallError, CheckpointError, ClassError, InterposeError, SignatureError,
};
pub use parameter::{Parameter, ParameterKind};
pub use signature::{KindGroups, Signature};
pub use value::{Kwargs, TypeDescriptor, Value};

#[doc(hidden)]
pub mod __private {
    pub use serde_json;
}
