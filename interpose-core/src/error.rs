//! Error types for interpose.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`InterposeError`] - Top-level error type
//! - [`SignatureError`] - Invalid parameter descriptors
//! - [`BindError`] - Arguments that do not fit a signature
//! - [`CallError`] - Failures surfaced by invoking a callable
//! - [`CheckpointError`] - Isolated checkpoint failures (diagnostics only)
//! - [`ClassError`] - Invalid class descriptors

use crate::parameter::ParameterKind;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all interpose operations.
#[derive(Error, Debug)]
pub enum InterposeError {
    /// A signature could not be built.
    #[error("signature error: {0}")]
    Signature(#[from] SignatureError),

    /// A call failed.
    #[error("call error: {0}")]
    Call(#[from] CallError),

    /// A class could not be built.
    #[error("class error: {0}")]
    Class(#[from] ClassError),
}

/// Errors raised while constructing a [`Signature`](crate::Signature).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    /// A parameter kind name outside the five recognized kinds.
    #[error("unknown parameter kind: {0}")]
    UnknownKind(String),

    /// Two parameters share a name.
    #[error("duplicate parameter name: {0}")]
    DuplicateName(String),

    /// A parameter's kind comes before the kind of an earlier parameter.
    #[error("wrong parameter order: {kind} parameter `{name}` follows a {previous} parameter")]
    OutOfOrder {
        /// The offending parameter.
        name: String,
        /// Its kind.
        kind: ParameterKind,
        /// The kind of the parameter declared before it.
        previous: ParameterKind,
    },

    /// A second variadic parameter of the same kind.
    #[error("more than one {kind} parameter: `{name}`")]
    DuplicateVariadic {
        /// The offending parameter.
        name: String,
        /// Its kind.
        kind: ParameterKind,
    },

    /// A variadic parameter declared a default.
    #[error("variadic parameter `{0}` cannot have a default value")]
    VariadicDefault(String),

    /// A positional parameter without default follows one with a default.
    #[error("non-default argument `{0}` follows default argument")]
    NonDefaultAfterDefault(String),
}

/// Arguments that do not satisfy a signature.
///
/// Messages follow the usual calling-convention wording so a wrapper reports
/// exactly what the original would.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    /// More positional arguments than positional parameters.
    #[error("too many positional arguments")]
    TooManyPositional,

    /// A required parameter received no value.
    #[error("missing a required argument: '{0}'")]
    MissingArgument(String),

    /// A keyword matched no parameter and there is no variadic keyword.
    #[error("got an unexpected keyword argument '{0}'")]
    UnexpectedKeyword(String),

    /// A parameter received both a positional and a keyword value.
    #[error("multiple values for argument '{0}'")]
    MultipleValues(String),

    /// A positional-only parameter was passed by keyword.
    #[error("'{0}' parameter is positional only, but was passed as a keyword")]
    PositionalOnlyAsKeyword(String),
}

/// Failures surfaced to the caller of a callable.
#[derive(Error, Debug)]
pub enum CallError {
    /// The arguments did not bind.
    #[error(transparent)]
    Bind(#[from] BindError),

    /// The callable itself failed.
    #[error("{0}")]
    Raised(#[source] BoxError),

    /// A value could not be converted to or from its typed form.
    #[error("value conversion failed: {0}")]
    Conversion(#[from] serde_json::Error),

    /// No member with that name exists along the resolution order.
    #[error("no member named `{0}`")]
    NoSuchMember(String),

    /// The member exists but is a plain attribute.
    #[error("member `{0}` is not callable")]
    NotCallable(String),
}

impl CallError {
    /// Wraps an arbitrary error raised by a callable body.
    pub fn raised(err: impl Into<BoxError>) -> Self {
        CallError::Raised(err.into())
    }
}

/// A checkpoint factory or callback failed.
///
/// These never reach the caller of an intercepted function; they are only
/// visible through the diagnostics channel.
#[derive(Error, Debug)]
pub enum CheckpointError {
    /// The factory or callback returned an error.
    #[error("checkpoint failed: {0}")]
    Failed(#[source] BoxError),

    /// The factory or callback panicked.
    #[error("checkpoint panicked: {0}")]
    Panic(String),
}

/// Errors raised while building a class descriptor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassError {
    /// No consistent resolution order exists for the declared bases.
    #[error("cannot create a consistent resolution order for `{0}`")]
    InconsistentHierarchy(String),

    /// The same base was listed twice.
    #[error("duplicate base class `{base}` in `{class}`")]
    DuplicateBase {
        /// The class being built.
        class: String,
        /// The repeated base.
        base: String,
    },

    /// The same member name was declared twice on one class.
    #[error("duplicate member `{member}` in `{class}`")]
    DuplicateMember {
        /// The class being built.
        class: String,
        /// The repeated member name.
        member: String,
    },
}

impl From<BoxError> for CheckpointError {
    fn from(err: BoxError) -> Self {
        CheckpointError::Failed(err)
    }
}

impl From<BoxError> for CallError {
    fn from(err: BoxError) -> Self {
        CallError::Raised(err)
    }
}
