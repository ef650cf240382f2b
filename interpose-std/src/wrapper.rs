//! Signature-preserving wrappers.
//!
//! A [`Wrapper`] declares exactly its original's signature, so binding
//! rejects the same argument lists the original would. A successful call
//! runs the registry's checkpoints around a forwarded call to the original.

use crate::registry::HookRegistry;
use interpose_core::{Arguments, CallError, Callable, HookId, Method, Signature, Value};
use std::{fmt, sync::Arc};

/// A callable that wraps another and dispatches checkpoints around it.
pub struct Wrapper {
    name: String,
    signature: Arc<Signature>,
    original: Arc<dyn Callable>,
    registry: Arc<HookRegistry>,
}

impl Wrapper {
    /// Wrap `original`, keeping its name.
    pub fn new(original: Arc<dyn Callable>, registry: Arc<HookRegistry>) -> Self {
        let name = original.name().to_string();
        Self::named(name, original, registry)
    }

    /// Wrap `original` under a different name.
    pub fn named(
        name: impl Into<String>,
        original: Arc<dyn Callable>,
        registry: Arc<HookRegistry>,
    ) -> Self {
        Self {
            name: name.into(),
            signature: Arc::clone(original.signature()),
            original,
            registry,
        }
    }

    /// The wrapped callable.
    pub fn original(&self) -> &Arc<dyn Callable> {
        &self.original
    }

    /// The registry dispatched on every call.
    pub fn registry(&self) -> &Arc<HookRegistry> {
        &self.registry
    }

    /// Identity of the registry dispatched on every call.
    pub fn registry_id(&self) -> HookId {
        self.registry.id()
    }
}

impl Callable for Wrapper {
    fn name(&self) -> &str {
        &self.name
    }

    fn signature(&self) -> &Arc<Signature> {
        &self.signature
    }

    fn call(&self, arguments: Arguments) -> Result<Value, CallError> {
        // Arguments that do not bind fail before any checkpoint exists.
        let bound = self.signature.bind(arguments)?;

        let checkpoints = self.registry.instantiate(self.original.as_ref());
        let checkpoints = self
            .registry
            .dispatch_enter(checkpoints, &bound.args(), &bound.kwargs());

        match self.original.call(bound.forward()) {
            Ok(result) => {
                self.registry.dispatch_exit(checkpoints, &result);
                Ok(result)
            }
            Err(error) => {
                self.registry.dispatch_exception(checkpoints, &error);
                Err(error)
            }
        }
    }

    fn hooked_by(&self) -> Option<HookId> {
        Some(self.registry.id())
    }
}

impl fmt::Debug for Wrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wrapper")
            .field("name", &self.name)
            .field("signature", &self.signature.to_string())
            .field("registry", &self.registry_id())
            .finish_non_exhaustive()
    }
}

/// Replace `method`'s callable with a wrapper, keeping its kind.
pub fn synthesize(method: &Method, registry: &Arc<HookRegistry>) -> Method {
    let wrapper = Wrapper::new(Arc::clone(method.callable()), Arc::clone(registry));
    Method::new(method.kind(), Arc::new(wrapper))
}
