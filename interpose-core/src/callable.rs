//! Callables and methods.
//!
//! [`Callable`] is the introspectable descriptor every original function and
//! every synthesized wrapper implements. [`Function`] is the ordinary
//! implementation: a [`Signature`] plus a body that receives the bound
//! arguments. [`Method`] tags a callable with its [`MethodKind`].

use crate::{
    arguments::{Arguments, BoundArguments},
    error::CallError,
    signature::Signature,
    value::Value,
};
use bitflags::bitflags;
use std::{fmt, sync::Arc};

/// Identifies the hook registry that synthesized a wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId(pub u64);

/// An invocable with an introspectable signature.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `Callable`",
    label = "missing `Callable` implementation",
    note = "Callables must expose a name, a signature and a `call` method."
)]
pub trait Callable: Send + Sync + 'static {
    /// The callable's name.
    fn name(&self) -> &str;

    /// The declared signature.
    fn signature(&self) -> &Arc<Signature>;

    /// Invoke with caller-supplied arguments.
    ///
    /// Implementations bind `arguments` against [`signature`](Self::signature)
    /// and report binding failures as [`CallError::Bind`].
    fn call(&self, arguments: Arguments) -> Result<Value, CallError>;

    /// The registry whose wrapper this is, if this callable is a wrapper.
    fn hooked_by(&self) -> Option<HookId> {
        None
    }
}

type Body = dyn Fn(&BoundArguments<'_>) -> Result<Value, CallError> + Send + Sync;

/// A named body with a declared signature.
///
/// # Example
///
/// ```rust,ignore
/// let sig = Signature::new(vec![Parameter::positional_only("a")], None)?;
/// let double = Function::new("double", sig, |bound| {
///     let a: i64 = bound.extract("a")?;
///     Ok(json!(a * 2))
/// });
/// assert_eq!(double.call(args![21])?, json!(42));
/// ```
#[derive(Clone)]
pub struct Function {
    name: String,
    signature: Arc<Signature>,
    body: Arc<Body>,
}

impl Function {
    /// Create a function from its name, signature and body.
    pub fn new<F>(name: impl Into<String>, signature: Signature, body: F) -> Self
    where
        F: Fn(&BoundArguments<'_>) -> Result<Value, CallError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            signature: Arc::new(signature),
            body: Arc::new(body),
        }
    }
}

impl Callable for Function {
    fn name(&self) -> &str {
        &self.name
    }

    fn signature(&self) -> &Arc<Signature> {
        &self.signature
    }

    fn call(&self, arguments: Arguments) -> Result<Value, CallError> {
        let bound = self.signature.bind(arguments)?;
        (self.body)(&bound)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("signature", &self.signature.to_string())
            .finish_non_exhaustive()
    }
}

/// How a method receives its receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
    /// Receives the instance when accessed through an instance.
    Plain,
    /// Receives the class, however it is accessed.
    ClassBound,
    /// Receives nothing.
    Static,
}

bitflags! {
    /// A selection of [`MethodKind`]s.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MethodKinds: u8 {
        /// Plain methods.
        const PLAIN = 1;
        /// Class-bound methods.
        const CLASS_BOUND = 1 << 1;
        /// Static methods.
        const STATIC = 1 << 2;
    }
}

impl MethodKinds {
    /// Whether `kind` is selected.
    pub fn includes(self, kind: MethodKind) -> bool {
        self.contains(MethodKinds::from(kind))
    }
}

impl Default for MethodKinds {
    fn default() -> Self {
        MethodKinds::all()
    }
}

impl From<MethodKind> for MethodKinds {
    fn from(kind: MethodKind) -> Self {
        match kind {
            MethodKind::Plain => MethodKinds::PLAIN,
            MethodKind::ClassBound => MethodKinds::CLASS_BOUND,
            MethodKind::Static => MethodKinds::STATIC,
        }
    }
}

/// A callable tagged with its [`MethodKind`].
#[derive(Clone)]
pub struct Method {
    kind: MethodKind,
    callable: Arc<dyn Callable>,
}

impl Method {
    /// Tag `callable` with `kind`.
    pub fn new(kind: MethodKind, callable: Arc<dyn Callable>) -> Self {
        Self { kind, callable }
    }

    /// A plain method.
    pub fn plain(callable: impl Callable) -> Self {
        Self::new(MethodKind::Plain, Arc::new(callable))
    }

    /// A class-bound method.
    pub fn class_bound(callable: impl Callable) -> Self {
        Self::new(MethodKind::ClassBound, Arc::new(callable))
    }

    /// A static method.
    pub fn static_method(callable: impl Callable) -> Self {
        Self::new(MethodKind::Static, Arc::new(callable))
    }

    /// The method kind.
    pub fn kind(&self) -> MethodKind {
        self.kind
    }

    /// The underlying callable.
    pub fn callable(&self) -> &Arc<dyn Callable> {
        &self.callable
    }

    /// The underlying callable's name.
    pub fn name(&self) -> &str {
        self.callable.name()
    }

    /// The underlying callable's signature.
    pub fn signature(&self) -> &Arc<Signature> {
        self.callable.signature()
    }

    /// Invoke the method, prepending `receiver` when one is given.
    pub fn invoke(&self, receiver: Option<Value>, mut arguments: Arguments) -> Result<Value, CallError> {
        if let Some(receiver) = receiver {
            arguments.prepend(receiver);
        }
        self.callable.call(arguments)
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("kind", &self.kind)
            .field("name", &self.callable.name())
            .field("hooked_by", &self.callable.hooked_by())
            .finish()
    }
}
