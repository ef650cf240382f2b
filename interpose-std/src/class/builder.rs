use super::{Class, Member, mro};
use indexmap::IndexMap;
use interpose_core::{Callable, ClassError, Method, Value};
use std::sync::Arc;

/// Builder for [`Class`].
///
/// Methods are keyed by their callable's name. Declaration errors are
/// deferred to [`build`](Self::build).
///
/// # Example
///
/// ```rust,ignore
/// let base = Class::builder("Base").method(describe).build()?;
/// let derived = Class::builder("Derived")
///     .base(base)
///     .class_method(create)
///     .static_method(version)
///     .attribute("limit", 10)
///     .build()?;
/// ```
pub struct ClassBuilder {
    name: String,
    bases: Vec<Arc<Class>>,
    members: IndexMap<String, Member>,
    error: Option<ClassError>,
}

impl ClassBuilder {
    /// Start building a class named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bases: Vec::new(),
            members: IndexMap::new(),
            error: None,
        }
    }

    /// Append a base class.
    pub fn base(mut self, base: Arc<Class>) -> Self {
        self.base_mut(base);
        self
    }

    /// Append a base class (mutable version).
    pub fn base_mut(&mut self, base: Arc<Class>) {
        if self.bases.iter().any(|b| Arc::ptr_eq(b, &base)) {
            self.fail(ClassError::DuplicateBase {
                class: self.name.clone(),
                base: base.name().to_string(),
            });
            return;
        }
        self.bases.push(base);
    }

    /// Declare a plain method.
    pub fn method(self, callable: impl Callable) -> Self {
        self.method_of(Method::plain(callable))
    }

    /// Declare a class-bound method.
    pub fn class_method(self, callable: impl Callable) -> Self {
        self.method_of(Method::class_bound(callable))
    }

    /// Declare a static method.
    pub fn static_method(self, callable: impl Callable) -> Self {
        self.method_of(Method::static_method(callable))
    }

    /// Declare an attribute.
    pub fn attribute(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.member(name, Member::Attribute(value.into()))
    }

    /// Declare any member under `name`.
    pub fn member(mut self, name: impl Into<String>, member: Member) -> Self {
        self.member_mut(name, member);
        self
    }

    /// Declare any member under `name` (mutable version).
    pub fn member_mut(&mut self, name: impl Into<String>, member: Member) {
        let name = name.into();
        if self.members.contains_key(&name) {
            self.fail(ClassError::DuplicateMember {
                class: self.name.clone(),
                member: name,
            });
            return;
        }
        self.members.insert(name, member);
    }

    /// Linearize the bases and freeze the class.
    ///
    /// # Errors
    ///
    /// The first declaration error, or
    /// [`ClassError::InconsistentHierarchy`] when the bases admit no C3
    /// linearization.
    pub fn build(self) -> Result<Arc<Class>, ClassError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let ancestors = mro::linearize(&self.name, &self.bases)?;
        Ok(Arc::new(Class {
            name: self.name,
            bases: self.bases,
            members: self.members,
            ancestors,
        }))
    }

    fn method_of(self, method: Method) -> Self {
        let name = method.name().to_string();
        self.member(name, Member::Method(method))
    }

    fn fail(&mut self, error: ClassError) {
        self.error.get_or_insert(error);
    }
}
