//! Declaration and forwarding artifacts of a [`Signature`].
//!
//! A wrapper's outer calling convention is described by a *declaration*;
//! the call it makes to the original is described by the *forwarding call*.
//! Keeping the two apart lets the wrapper re-bind arguments internally without
//! changing what callers see.
//!
//! Values never appear in the parts. Defaults and annotations are referenced
//! through generated placeholder names and handed over in side tables keyed
//! by those placeholders.

use crate::{
    parameter::{Parameter, ParameterKind},
    signature::{KindGroups, Signature},
    value::{TypeDescriptor, Value},
};
use indexmap::IndexMap;

/// Marker closing the positional-only group.
pub const POSITIONAL_ONLY_MARKER: &str = "/";

/// Marker opening a non-empty keyword-only group.
pub const KEYWORD_ONLY_MARKER: &str = "*";

/// Standard placeholder namers.
pub mod naming {
    /// Formal and actual names: the parameter name itself.
    pub fn identity(name: &str) -> String {
        name.to_string()
    }

    /// Default placeholders: `_default_{name}`.
    pub fn default_placeholder(name: &str) -> String {
        format!("_default_{name}")
    }

    /// Type placeholders: `_type_{name}`.
    pub fn type_placeholder(name: &str) -> String {
        format!("_type_{name}")
    }
}

/// A plain declaration: ordered parts plus the default side table.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    /// Declaration parts, e.g. `["a", "/", "b=_default_b", "**d"]`.
    pub parts: Vec<String>,
    /// Default placeholder → literal default value.
    pub defaults: IndexMap<String, Value>,
}

/// A typed declaration: parts plus the type and default side tables.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedDeclaration {
    /// Declaration parts, e.g. `["a: _type_a", "/", "b: _type_b=_default_b"]`.
    pub parts: Vec<String>,
    /// Type placeholder → type descriptor (*any* when unannotated).
    pub types: IndexMap<String, TypeDescriptor>,
    /// Default placeholder → literal default value.
    pub defaults: IndexMap<String, Value>,
}

/// Joins kind groups into declaration order, inserting the `/` and `*`
/// markers.
///
/// `/` follows a non-empty positional-only group. `*` precedes a non-empty
/// keyword-only group, after any `*args` entry.
pub(crate) fn join_groups(groups: KindGroups<String>) -> Vec<String> {
    let KindGroups {
        positional_only,
        positional_or_keyword,
        var_positional,
        keyword_only,
        var_keyword,
    } = groups;

    let mut parts = Vec::with_capacity(
        positional_only.len()
            + positional_or_keyword.len()
            + var_positional.len()
            + keyword_only.len()
            + var_keyword.len()
            + 2,
    );
    let has_positional_only = !positional_only.is_empty();
    parts.extend(positional_only);
    if has_positional_only {
        parts.push(POSITIONAL_ONLY_MARKER.to_string());
    }
    parts.extend(positional_or_keyword);
    parts.extend(var_positional);
    if !keyword_only.is_empty() {
        parts.push(KEYWORD_ONLY_MARKER.to_string());
    }
    parts.extend(keyword_only);
    parts.extend(var_keyword);
    parts
}

fn star_prefix(kind: ParameterKind) -> &'static str {
    match kind {
        ParameterKind::VariadicPositional => "*",
        ParameterKind::VariadicKeyword => "**",
        _ => "",
    }
}

impl Signature {
    /// Build the plain declaration.
    ///
    /// For `f(a, /, b=1, *, c=2, **d)` with the standard namers this yields
    /// `["a", "/", "b=_default_b", "*", "c=_default_c", "**d"]` and the
    /// defaults `{_default_b: 1, _default_c: 2}`.
    pub fn declaration(
        &self,
        formal: impl Fn(&str) -> String,
        default: impl Fn(&str) -> String,
    ) -> Declaration {
        let groups = self.traverse(|par| {
            declare(par, format!("{}{}", star_prefix(par.kind()), formal(par.name())), &default)
        });
        Declaration {
            parts: join_groups(groups),
            defaults: self.defaults(&default),
        }
    }

    /// Build the typed declaration: every formal name is paired with a type
    /// placeholder.
    pub fn declaration_with_types(
        &self,
        formal: impl Fn(&str) -> String,
        default: impl Fn(&str) -> String,
        type_name: impl Fn(&str) -> String,
    ) -> TypedDeclaration {
        let groups = self.traverse(|par| {
            let typed = format!(
                "{}{}: {}",
                star_prefix(par.kind()),
                formal(par.name()),
                type_name(par.name())
            );
            declare(par, typed, &default)
        });
        let types = self
            .traverse(|par| (type_name(par.name()), par.annotation_or_any()))
            .into_flat()
            .into_iter()
            .collect();
        TypedDeclaration {
            parts: join_groups(groups),
            types,
            defaults: self.defaults(&default),
        }
    }

    /// Build the forwarding call used to re-invoke the original.
    ///
    /// Positional-only parameters forward by position, positional-or-keyword
    /// and keyword-only parameters forward by keyword, and the variadics
    /// forward unpacked. For `f(a, /, b=1, *, c=2, **d)` this yields
    /// `["a", "b=b", "c=c", "**d"]` with identity namers.
    pub fn forwarding_call(
        &self,
        formal: impl Fn(&str) -> String,
        actual: impl Fn(&str) -> String,
    ) -> Vec<String> {
        self.traverse(|par| {
            let actual = actual(par.name());
            match par.kind() {
                ParameterKind::PositionalOnly => actual,
                ParameterKind::PositionalOrKeyword | ParameterKind::KeywordOnly => {
                    format!("{}={actual}", formal(par.name()))
                }
                ParameterKind::VariadicPositional => format!("*{actual}"),
                ParameterKind::VariadicKeyword => format!("**{actual}"),
            }
        })
        .into_flat()
    }

    /// [`declaration`](Self::declaration) with the standard namers.
    pub fn default_declaration(&self) -> Declaration {
        self.declaration(naming::identity, naming::default_placeholder)
    }

    /// [`declaration_with_types`](Self::declaration_with_types) with the
    /// standard namers.
    pub fn default_typed_declaration(&self) -> TypedDeclaration {
        self.declaration_with_types(
            naming::identity,
            naming::default_placeholder,
            naming::type_placeholder,
        )
    }

    /// [`forwarding_call`](Self::forwarding_call) with identity namers.
    pub fn default_forwarding_call(&self) -> Vec<String> {
        self.forwarding_call(naming::identity, naming::identity)
    }

    fn defaults(&self, default: impl Fn(&str) -> String) -> IndexMap<String, Value> {
        self.traverse(|par| par.default().map(|v| (default(par.name()), v.clone())))
            .into_flat()
            .into_iter()
            .flatten()
            .collect()
    }
}

fn declare(par: &Parameter, head: String, default: impl Fn(&str) -> String) -> String {
    if par.has_default() {
        format!("{head}={}", default(par.name()))
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn formal(name: &str) -> String {
        format!("_formal_{name}")
    }

    fn actual(name: &str) -> String {
        format!("_actual_{name}")
    }

    fn type_(name: &str) -> String {
        format!("_type_x_{name}")
    }

    fn default(name: &str) -> String {
        format!("_default_x_{name}")
    }

    // f1(_a: int, /, _b: str = "test", *, _c: float = .1, **_d: dict)
    fn f1() -> Signature {
        Signature::new(
            vec![
                Parameter::positional_only("_a").with_annotation(TypeDescriptor::named("int")),
                Parameter::positional_or_keyword("_b")
                    .with_default(json!("test"))
                    .with_annotation(TypeDescriptor::named("str")),
                Parameter::keyword_only("_c")
                    .with_default(json!(0.1))
                    .with_annotation(TypeDescriptor::named("float")),
                Parameter::var_keyword("_d").with_annotation(TypeDescriptor::named("dict")),
            ],
            None,
        )
        .unwrap()
    }

    // f2(_a: dict = None, /, _b: list = [], *_c: tuple, **_d: map)
    fn f2() -> Signature {
        Signature::new(
            vec![
                Parameter::positional_only("_a")
                    .with_default(json!(null))
                    .with_annotation(TypeDescriptor::named("dict")),
                Parameter::positional_or_keyword("_b")
                    .with_default(json!([]))
                    .with_annotation(TypeDescriptor::named("list")),
                Parameter::var_positional("_c").with_annotation(TypeDescriptor::named("tuple")),
                Parameter::var_keyword("_d").with_annotation(TypeDescriptor::named("map")),
            ],
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_declaration_f1() {
        let decl = f1().declaration(formal, default);
        assert_eq!(
            decl.parts,
            vec![
                formal("_a"),
                "/".to_string(),
                format!("{}={}", formal("_b"), default("_b")),
                "*".to_string(),
                format!("{}={}", formal("_c"), default("_c")),
                format!("**{}", formal("_d")),
            ]
        );
        let expected: IndexMap<String, Value> = [
            (default("_b"), json!("test")),
            (default("_c"), json!(0.1)),
        ]
        .into_iter()
        .collect();
        assert_eq!(decl.defaults, expected);
    }

    #[test]
    fn test_typed_declaration_f1() {
        let decl = f1().declaration_with_types(formal, default, type_);
        assert_eq!(
            decl.parts,
            vec![
                format!("{}: {}", formal("_a"), type_("_a")),
                "/".to_string(),
                format!("{}: {}={}", formal("_b"), type_("_b"), default("_b")),
                "*".to_string(),
                format!("{}: {}={}", formal("_c"), type_("_c"), default("_c")),
                format!("**{}: {}", formal("_d"), type_("_d")),
            ]
        );
        assert_eq!(decl.types[&type_("_a")], TypeDescriptor::named("int"));
        assert_eq!(decl.types[&type_("_d")], TypeDescriptor::named("dict"));
        assert_eq!(decl.types.len(), 4);
        assert_eq!(decl.defaults.len(), 2);
    }

    #[test]
    fn test_forwarding_call_f1() {
        assert_eq!(
            f1().forwarding_call(formal, actual),
            vec![
                actual("_a"),
                format!("{}={}", formal("_b"), actual("_b")),
                format!("{}={}", formal("_c"), actual("_c")),
                format!("**{}", actual("_d")),
            ]
        );
    }

    #[test]
    fn test_declaration_f2_has_no_keyword_marker() {
        let decl = f2().declaration(formal, default);
        assert_eq!(
            decl.parts,
            vec![
                format!("{}={}", formal("_a"), default("_a")),
                "/".to_string(),
                format!("{}={}", formal("_b"), default("_b")),
                format!("*{}", formal("_c")),
                format!("**{}", formal("_d")),
            ]
        );
        assert_eq!(decl.defaults[&default("_a")], json!(null));
        assert_eq!(decl.defaults[&default("_b")], json!([]));
    }

    #[test]
    fn test_forwarding_call_f2() {
        assert_eq!(
            f2().forwarding_call(formal, actual),
            vec![
                actual("_a"),
                format!("{}={}", formal("_b"), actual("_b")),
                format!("*{}", actual("_c")),
                format!("**{}", actual("_d")),
            ]
        );
    }

    #[test]
    fn test_keyword_only_after_var_positional() {
        let sig = Signature::new(
            vec![
                Parameter::var_positional("args"),
                Parameter::keyword_only("flag").with_default(json!(false)),
            ],
            None,
        )
        .unwrap();
        assert_eq!(
            sig.default_declaration().parts,
            vec!["*args".to_string(), "*".to_string(), "flag=_default_flag".to_string()]
        );
    }

    #[test]
    fn test_unannotated_parameters_map_to_any() {
        let sig = Signature::new(vec![Parameter::positional_or_keyword("x")], None).unwrap();
        let decl = sig.default_typed_declaration();
        assert_eq!(decl.parts, vec!["x: _type_x".to_string()]);
        assert!(decl.types["_type_x"].is_any());
        assert!(decl.defaults.is_empty());
    }

    #[test]
    fn test_defaults_never_rendered_into_parts() {
        let sig = Signature::new(
            vec![Parameter::positional_or_keyword("x").with_default(json!({"nested": [1, 2]}))],
            None,
        )
        .unwrap();
        let decl = sig.default_declaration();
        assert!(decl.parts.iter().all(|p| !p.contains("nested")));
        assert_eq!(decl.defaults["_default_x"], json!({"nested": [1, 2]}));
    }
}
