//! Class descriptors.
//!
//! A [`Class`] is an immutable, builder-built descriptor: a name, an ordered
//! list of bases, and insertion-ordered members. Its resolution order is the
//! C3 linearization of its bases, computed once at [`ClassBuilder::build`].
//!
//! Classes are shared by `Arc`. Hooking never mutates a class; it produces a
//! new class tree (see [`Hook::hook`](crate::Hook::hook)).

mod builder;
mod mro;

pub use builder::ClassBuilder;

use indexmap::IndexMap;
use interpose_core::{Arguments, CallError, Method, MethodKind, Value};
use std::{fmt, iter, sync::Arc};

/// A directly-declared class member.
#[derive(Debug, Clone)]
pub enum Member {
    /// A plain, class-bound or static method.
    Method(Method),
    /// Any non-callable value.
    Attribute(Value),
}

impl Member {
    /// The method, if this member is one.
    pub fn as_method(&self) -> Option<&Method> {
        match self {
            Member::Method(method) => Some(method),
            Member::Attribute(_) => None,
        }
    }

    /// The attribute value, if this member is one.
    pub fn as_attribute(&self) -> Option<&Value> {
        match self {
            Member::Method(_) => None,
            Member::Attribute(value) => Some(value),
        }
    }
}

impl From<Method> for Member {
    fn from(method: Method) -> Self {
        Member::Method(method)
    }
}

/// An immutable class descriptor.
pub struct Class {
    name: String,
    bases: Vec<Arc<Class>>,
    members: IndexMap<String, Member>,
    // Resolution order without the class itself.
    ancestors: Vec<Arc<Class>>,
}

impl Class {
    /// Start building a class named `name`.
    pub fn builder(name: impl Into<String>) -> ClassBuilder {
        ClassBuilder::new(name)
    }

    /// The class name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared bases, in declaration order.
    pub fn bases(&self) -> &[Arc<Class>] {
        &self.bases
    }

    /// Directly-declared members, in declaration order.
    pub fn members(&self) -> &IndexMap<String, Member> {
        &self.members
    }

    /// A directly-declared member.
    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.get(name)
    }

    /// The resolution order without this class, most-derived first.
    pub fn ancestors(&self) -> &[Arc<Class>] {
        &self.ancestors
    }

    /// The resolution order, starting with this class.
    pub fn mro(&self) -> impl Iterator<Item = &Class> {
        iter::once(self).chain(self.ancestors.iter().map(|class| &**class))
    }

    /// Names along the resolution order.
    pub fn mro_names(&self) -> Vec<&str> {
        self.mro().map(Class::name).collect()
    }

    /// Resolve `name` along the resolution order.
    pub fn lookup(&self, name: &str) -> Option<&Member> {
        self.mro().find_map(|class| class.members.get(name))
    }

    /// Resolve `name` to a method along the resolution order.
    pub fn method(&self, name: &str) -> Option<&Method> {
        self.lookup(name).and_then(Member::as_method)
    }

    /// The value class-bound methods receive.
    pub fn receiver(&self) -> Value {
        Value::String(self.name.clone())
    }

    /// Call `name` through the class.
    ///
    /// Class-bound methods receive [`receiver`](Self::receiver); plain and
    /// static methods receive nothing.
    pub fn call(&self, name: &str, arguments: Arguments) -> Result<Value, CallError> {
        let method = self.resolve(name)?;
        let receiver = match method.kind() {
            MethodKind::ClassBound => Some(self.receiver()),
            MethodKind::Plain | MethodKind::Static => None,
        };
        method.invoke(receiver, arguments)
    }

    /// Create an instance carrying `state`.
    pub fn instantiate(self: &Arc<Self>, state: impl Into<Value>) -> Instance {
        Instance {
            class: Arc::clone(self),
            state: state.into(),
        }
    }

    fn resolve(&self, name: &str) -> Result<&Method, CallError> {
        match self.lookup(name) {
            Some(Member::Method(method)) => Ok(method),
            Some(Member::Attribute(_)) => Err(CallError::NotCallable(name.to_string())),
            None => Err(CallError::NoSuchMember(name.to_string())),
        }
    }

    fn linearization(self: &Arc<Self>) -> impl Iterator<Item = Arc<Class>> + '_ {
        iter::once(Arc::clone(self)).chain(self.ancestors.iter().cloned())
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.name)
            .field("mro", &self.mro_names())
            .field("members", &self.members.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// A class paired with per-instance state.
#[derive(Debug, Clone)]
pub struct Instance {
    class: Arc<Class>,
    state: Value,
}

impl Instance {
    /// The instance's class.
    pub fn class(&self) -> &Arc<Class> {
        &self.class
    }

    /// The instance state, passed as receiver to plain methods.
    pub fn state(&self) -> &Value {
        &self.state
    }

    /// Resolve an attribute along the class's resolution order.
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.class.lookup(name).and_then(Member::as_attribute)
    }

    /// Call `name` through the instance.
    ///
    /// Plain methods receive the state, class-bound methods the class
    /// receiver, static methods nothing.
    pub fn call(&self, name: &str, arguments: Arguments) -> Result<Value, CallError> {
        let method = self.class.resolve(name)?;
        let receiver = match method.kind() {
            MethodKind::Plain => Some(self.state.clone()),
            MethodKind::ClassBound => Some(self.class.receiver()),
            MethodKind::Static => None,
        };
        method.invoke(receiver, arguments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use interpose_core::{Function, Parameter, Signature, args};
    use serde_json::json;

    fn echo(name: &str, parameters: Vec<Parameter>) -> Function {
        let signature = Signature::new(parameters, None).unwrap();
        Function::new(name, signature, |bound| {
            Ok(Value::Array(bound.arguments().values().cloned().collect()))
        })
    }

    fn widget() -> Arc<Class> {
        Class::builder("Widget")
            .method(echo("show", vec![Parameter::positional_or_keyword("self")]))
            .class_method(echo("create", vec![Parameter::positional_or_keyword("cls")]))
            .static_method(echo("version", vec![]))
            .attribute("kind", "widget")
            .build()
            .unwrap()
    }

    #[test]
    fn test_receivers_by_access_path() {
        let class = widget();
        let instance = class.instantiate(json!({ "id": 7 }));

        assert_eq!(instance.call("show", args![]).unwrap(), json!([{ "id": 7 }]));
        assert_eq!(instance.call("create", args![]).unwrap(), json!(["Widget"]));
        assert_eq!(instance.call("version", args![]).unwrap(), json!([]));

        assert_eq!(class.call("show", args![1]).unwrap(), json!([1]));
        assert_eq!(class.call("create", args![]).unwrap(), json!(["Widget"]));
    }

    #[test]
    fn test_member_errors() {
        let class = widget();
        assert!(matches!(
            class.call("missing", args![]),
            Err(CallError::NoSuchMember(name)) if name == "missing"
        ));
        assert!(matches!(
            class.call("kind", args![]),
            Err(CallError::NotCallable(name)) if name == "kind"
        ));
        assert_eq!(class.instantiate(json!(null)).attribute("kind"), Some(&json!("widget")));
    }

    #[test]
    fn test_lookup_follows_resolution_order() {
        let base = widget();
        let derived = Class::builder("Button")
            .base(Arc::clone(&base))
            .static_method(echo("version", vec![Parameter::positional_or_keyword("v")]))
            .build()
            .unwrap();

        assert_eq!(derived.mro_names(), vec!["Button", "Widget"]);
        assert_eq!(derived.call("version", args![2]).unwrap(), json!([2]));
        assert_eq!(derived.call("create", args![]).unwrap(), json!(["Button"]));
        assert!(derived.member("show").is_none());
        assert!(derived.lookup("show").is_some());
    }
}
