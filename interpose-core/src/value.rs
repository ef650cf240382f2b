//! Dynamic values carried through the generic invocation convention.

use indexmap::IndexMap;
use std::{borrow::Cow, fmt};

/// A dynamically typed argument, default or result value.
pub type Value = serde_json::Value;

/// An insertion-ordered name → value mapping (keyword arguments, defaults).
pub type Kwargs = IndexMap<String, Value>;

/// Describes the declared type of a parameter or return value.
///
/// Descriptors are opaque to the interception machinery: they are carried
/// through the typed declaration side table and never interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    name: Cow<'static, str>,
}

impl TypeDescriptor {
    const ANY: &'static str = "Any";

    /// The descriptor used wherever no annotation was declared.
    pub const fn any() -> Self {
        Self {
            name: Cow::Borrowed(Self::ANY),
        }
    }

    /// A descriptor for the Rust type `T`.
    pub fn of<T: ?Sized>() -> Self {
        Self {
            name: Cow::Borrowed(std::any::type_name::<T>()),
        }
    }

    /// A descriptor with a free-form name, e.g. `"int"`.
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self { name: name.into() }
    }

    /// The type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this is the *any* descriptor.
    pub fn is_any(&self) -> bool {
        self.name == Self::ANY
    }
}

impl Default for TypeDescriptor {
    fn default() -> Self {
        Self::any()
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
