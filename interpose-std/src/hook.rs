//! The `Hook` front door: configure once, then wrap callables and classes.

use crate::{
    class::{Class, Member},
    diagnostics::{DiagnosticSink, TracingSink},
    registry::HookRegistry,
    wrapper::{Wrapper, synthesize},
};
use interpose_core::{
    Callable, Checkpoint, CheckpointFactory, ClassError, Method, MethodKinds, factory_fn,
};
use std::{collections::HashMap, sync::Arc};

/// What [`Hook::hook`] does with methods this hook already wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RehookPolicy {
    /// Leave them untouched, so hooking twice equals hooking once.
    #[default]
    Skip,
    /// Wrap them again; every layer dispatches the registry.
    Layer,
}

/// Wraps callables and classes so that every call dispatches checkpoints.
///
/// # Example
///
/// ```rust,ignore
/// let hook = Hook::new();
/// let hooked = hook.hook(&widget)?;
/// hook.add_checkpoint(|target| Some(Recorder::new(target.name())));
/// hooked.instantiate(json!({})).call("show", args![])?;
/// ```
#[derive(Debug, Clone)]
pub struct Hook {
    registry: Arc<HookRegistry>,
    kinds: MethodKinds,
    rehook: RehookPolicy,
}

impl Hook {
    /// A hook with default configuration.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Configure a hook.
    pub fn builder() -> HookBuilder {
        HookBuilder::new()
    }

    /// The shared registry.
    pub fn registry(&self) -> &Arc<HookRegistry> {
        &self.registry
    }

    /// Method kinds [`hook`](Self::hook) wraps.
    pub fn kinds(&self) -> MethodKinds {
        self.kinds
    }

    /// Append a checkpoint factory. Applies to wrappers created before and
    /// after this call.
    pub fn add_checkpoint_factory(&self, factory: impl CheckpointFactory) {
        self.registry.add_checkpoint_factory(factory);
    }

    /// Append an infallible factory closure.
    pub fn add_checkpoint<F, C>(&self, f: F)
    where
        F: Fn(&dyn Callable) -> Option<C> + Send + Sync + 'static,
        C: Checkpoint,
    {
        self.registry.add_checkpoint_factory(factory_fn(f));
    }

    /// Wrap a single callable.
    pub fn wrap(&self, original: Arc<dyn Callable>) -> Arc<dyn Callable> {
        Arc::new(Wrapper::new(original, Arc::clone(&self.registry)))
    }

    /// Wrap a single callable, keeping the concrete wrapper type.
    pub fn wrap_function(&self, original: impl Callable) -> Wrapper {
        Wrapper::new(Arc::new(original), Arc::clone(&self.registry))
    }

    /// Produce a hooked copy of `class` and of every class along its
    /// resolution order.
    ///
    /// Each directly-declared method of a selected kind is replaced by a
    /// wrapper of the same kind; attributes are carried over. Ancestors
    /// shared through several bases are hooked once and shared in the
    /// result.
    pub fn hook(&self, class: &Arc<Class>) -> Result<Arc<Class>, ClassError> {
        let mut hooked: HashMap<*const Class, Arc<Class>> = HashMap::new();

        // Most-base first, so every base is rebuilt before its subclasses.
        let order = class.ancestors().iter().rev().chain(std::iter::once(class));
        for original in order {
            let mut builder = Class::builder(original.name());
            for base in original.bases() {
                let base = hooked
                    .get(&Arc::as_ptr(base))
                    .map_or_else(|| Arc::clone(base), Arc::clone);
                builder.base_mut(base);
            }
            for (name, member) in original.members() {
                builder.member_mut(name.clone(), self.hook_member(member));
            }

            let copy = builder.build()?;
            tracing::debug!(
                class = original.name(),
                registry = self.registry.id().0,
                "class hooked"
            );
            hooked.insert(Arc::as_ptr(original), copy);
        }

        hooked
            .remove(&Arc::as_ptr(class))
            .ok_or_else(|| ClassError::InconsistentHierarchy(class.name().to_string()))
    }

    fn hook_member(&self, member: &Member) -> Member {
        match member {
            Member::Method(method) if self.selects(method) => {
                Member::Method(synthesize(method, &self.registry))
            }
            other => other.clone(),
        }
    }

    fn selects(&self, method: &Method) -> bool {
        if !self.kinds.includes(method.kind()) {
            return false;
        }
        match self.rehook {
            RehookPolicy::Skip => method.callable().hooked_by() != Some(self.registry.id()),
            RehookPolicy::Layer => true,
        }
    }
}

impl Default for Hook {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`Hook`].
pub struct HookBuilder {
    sink: Arc<dyn DiagnosticSink>,
    kinds: MethodKinds,
    rehook: RehookPolicy,
    factories: Vec<Arc<dyn CheckpointFactory>>,
}

impl HookBuilder {
    /// Default configuration: [`TracingSink`], every method kind,
    /// [`RehookPolicy::Skip`].
    pub fn new() -> Self {
        Self {
            sink: Arc::new(TracingSink),
            kinds: MethodKinds::all(),
            rehook: RehookPolicy::default(),
            factories: Vec::new(),
        }
    }

    /// Report isolated checkpoint failures to `sink`.
    pub fn diagnostics(mut self, sink: impl DiagnosticSink) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    /// Only wrap methods of `kinds`.
    pub fn kinds(mut self, kinds: MethodKinds) -> Self {
        self.kinds = kinds;
        self
    }

    /// Set the re-hook policy.
    pub fn rehook(mut self, policy: RehookPolicy) -> Self {
        self.rehook = policy;
        self
    }

    /// Register a factory up front.
    pub fn factory(mut self, factory: impl CheckpointFactory) -> Self {
        self.factories.push(Arc::new(factory));
        self
    }

    /// Register every factory submitted with
    /// [`submit_checkpoint!`](crate::submit_checkpoint).
    #[cfg(feature = "inventory")]
    pub fn with_registered_factories(mut self) -> Self {
        self.factories.extend(crate::registration::registered_factories());
        self
    }

    /// Build the hook.
    pub fn build(self) -> Hook {
        let registry = HookRegistry::with_sink(self.sink);
        for factory in self.factories {
            registry.add_shared_factory(factory);
        }
        Hook {
            registry: Arc::new(registry),
            kinds: self.kinds,
            rehook: self.rehook,
        }
    }
}

impl Default for HookBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CallLog, RecordingCheckpoint};
    use interpose_core::{Function, MethodKind, Parameter, Signature, Value, args};
    use serde_json::json;

    fn echo(name: &str, parameters: Vec<Parameter>) -> Function {
        Function::new(name, Signature::new(parameters, None).unwrap(), |bound| {
            Ok(Value::Array(bound.arguments().values().cloned().collect()))
        })
    }

    fn diamond() -> Arc<Class> {
        let base = Class::builder("Base")
            .method(echo("describe", vec![Parameter::positional_only("self")]))
            .attribute("limit", 3)
            .build()
            .unwrap();
        let left = Class::builder("Left")
            .base(Arc::clone(&base))
            .class_method(echo("make", vec![Parameter::positional_only("cls")]))
            .build()
            .unwrap();
        let right = Class::builder("Right")
            .base(base)
            .static_method(echo("version", vec![]))
            .build()
            .unwrap();
        Class::builder("Bottom")
            .base(left)
            .base(right)
            .build()
            .unwrap()
    }

    fn is_hooked(class: &Class, name: &str, hook: &Hook) -> bool {
        class
            .method(name)
            .is_some_and(|m| m.callable().hooked_by() == Some(hook.registry().id()))
    }

    #[test]
    fn test_hook_wraps_every_kind_along_mro() {
        let hook = Hook::new();
        let log = CallLog::new();
        let hooked = hook.hook(&diamond()).unwrap();
        hook.add_checkpoint_factory(RecordingCheckpoint::factory(0, log.clone()));

        assert_eq!(hooked.mro_names(), vec!["Bottom", "Left", "Right", "Base"]);
        assert_eq!(hooked.method("make").unwrap().kind(), MethodKind::ClassBound);
        assert_eq!(hooked.method("version").unwrap().kind(), MethodKind::Static);

        let instance = hooked.instantiate(json!("me"));
        assert_eq!(instance.call("describe", args![]).unwrap(), json!(["me"]));
        assert_eq!(instance.call("make", args![]).unwrap(), json!(["Bottom"]));
        assert_eq!(hooked.call("version", args![]).unwrap(), json!([]));
        assert_eq!(instance.attribute("limit"), Some(&json!(3)));

        assert_eq!(log.entered(), vec!["describe", "make", "version"]);
    }

    #[test]
    fn test_shared_ancestor_hooked_once() {
        let hook = Hook::new();
        let hooked = hook.hook(&diamond()).unwrap();
        let left_base = &hooked.bases()[0].bases()[0];
        let right_base = &hooked.bases()[1].bases()[0];
        assert!(Arc::ptr_eq(left_base, right_base));
        assert!(is_hooked(left_base, "describe", &hook));
    }

    #[test]
    fn test_original_class_untouched() {
        let hook = Hook::new();
        let original = diamond();
        let _ = hook.hook(&original).unwrap();
        assert!(original.method("describe").unwrap().callable().hooked_by().is_none());
    }

    #[test]
    fn test_kind_selection() {
        let hook = Hook::builder().kinds(MethodKinds::STATIC).build();
        let hooked = hook.hook(&diamond()).unwrap();
        assert!(is_hooked(&hooked, "version", &hook));
        assert!(!is_hooked(&hooked, "make", &hook));
        assert!(!is_hooked(&hooked, "describe", &hook));
    }

    #[test]
    fn test_rehook_skip_is_idempotent() {
        let hook = Hook::new();
        let log = CallLog::new();
        hook.add_checkpoint_factory(RecordingCheckpoint::factory(0, log.clone()));
        let twice = hook.hook(&hook.hook(&diamond()).unwrap()).unwrap();

        twice.call("version", args![]).unwrap();
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_rehook_layer_composes() {
        let hook = Hook::builder().rehook(RehookPolicy::Layer).build();
        let log = CallLog::new();
        hook.add_checkpoint_factory(RecordingCheckpoint::factory(0, log.clone()));
        let twice = hook.hook(&hook.hook(&diamond()).unwrap()).unwrap();

        twice.call("version", args![]).unwrap();
        assert_eq!(log.len(), 4);
    }

    #[test]
    fn test_builder_factories_precede_later_ones() {
        let log = CallLog::new();
        let hook = Hook::builder()
            .factory(RecordingCheckpoint::factory(0, log.clone()))
            .build();
        hook.add_checkpoint_factory(RecordingCheckpoint::factory(1, log.clone()));

        let wrapped = hook.wrap(Arc::new(echo("f", vec![])));
        wrapped.call(args![]).unwrap();
        let ids: Vec<_> = log.events().iter().map(|e| e.checkpoint()).collect();
        assert_eq!(ids, vec![0, 1, 0, 1]);
    }
}
