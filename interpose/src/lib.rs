//! # interpose - Signature-Preserving Function Interception
//!
//! `interpose` wraps callables so that every call notifies a set of
//! *checkpoints* (`enter`, then `exit` or `exception`) while the wrapper stays
//! indistinguishable from the original to its callers: same name, same
//! signature, same arguments forwarded, same result or error.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use interpose::prelude::*;
//! use serde_json::json;
//!
//! #[interpose::callable]
//! fn greet(name: String, #[keyword_only] #[default(false)] loud: bool) -> String {
//!     if loud { name.to_uppercase() } else { name }
//! }
//!
//! let hook = Hook::new();
//! hook.add_checkpoint_factory(logging_factory());
//!
//! let greet = hook.wrap_function(greet_callable()?);
//! assert_eq!(greet.call(args!["ada"; loud = true])?, json!("ADA"));
//! ```
//!
//! ## Classes
//!
//! [`Hook::hook`] produces a hooked copy of a [`Class`] and of every class
//! along its resolution order; plain, class-bound and static methods keep
//! their kind.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use interpose_core::{
    // Invocation
    Arguments,
    // Error types
    BindError,
    BoundArguments,
    BoxError,
    CallError,
    // Callables
    Callable,
    // Checkpoints
    Checkpoint,
    CheckpointError,
    CheckpointFactory,
    ClassError,
    // Signature model
    Declaration,
    FactoryFn,
    Function,
    HookId,
    InterposeError,
    KindGroups,
    Kwargs,
    Method,
    MethodKind,
    MethodKinds,
    Parameter,
    ParameterKind,
    Signature,
    SignatureError,
    TypeDescriptor,
    TypedDeclaration,
    Value,
    args,
    factory_fn,
};

pub use interpose_std::{
    // Classes
    Class,
    ClassBuilder,
    // Diagnostics
    Diagnostic,
    DiagnosticSink,
    // Front door
    Hook,
    HookBuilder,
    // Registry
    HookRegistry,
    Instance,
    Member,
    RehookPolicy,
    Stage,
    TracingSink,
    // Wrappers
    Wrapper,
    synthesize,
};

/// Placeholder namers and declaration markers.
pub mod declaration {
    pub use interpose_core::declaration::{KEYWORD_ONLY_MARKER, POSITIONAL_ONLY_MARKER, naming};
}

/// Registry type states.
pub mod registry {
    pub use interpose_std::registry::{Checkpoints, Created, Entered, HookRegistry};
}

/// Standard checkpoint implementations.
pub mod checkpoints {
    #![allow(clippy::wildcard_imports)]
    pub use interpose_std::checkpoints::*;
}

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use interpose_std::testing::*;
}

/// Prelude module - common imports for interpose.
///
/// # Usage
///
/// ```rust,ignore
/// use interpose::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Arguments, BoxError, CallError, Callable, Checkpoint, CheckpointFactory, Class, Function,
        Hook, Kwargs, Method, MethodKind, MethodKinds, Parameter, Signature, Value, args,
        checkpoints::logging_factory, factory_fn,
    };
}

#[cfg(feature = "macros")]
pub use interpose_macros::callable;

#[cfg(feature = "inventory")]
pub use interpose_std::{inventory, registration::CheckpointRegistration, submit_checkpoint};

#[doc(hidden)]
pub mod __private {
    pub use interpose_core::__private::serde_json;
}
