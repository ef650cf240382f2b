//! # Signature Model
//!
//! A [`Signature`] is the ordered, kind-partitioned description of a
//! callable's parameters. It is built once per callable, validated on
//! construction and immutable afterwards; wrappers share it by `Arc`.
//!
//! The textual artifacts (declarations and the forwarding call) live in
//! [`declaration`](crate::declaration); argument binding lives in
//! [`arguments`](crate::arguments).

use crate::{
    error::SignatureError,
    parameter::{Parameter, ParameterKind},
    value::TypeDescriptor,
};
use std::{collections::HashSet, fmt};

/// Per-kind groups of values derived from a signature's parameters.
///
/// Each group keeps declaration order; the groups themselves are always
/// visited in canonical kind order.
#[derive(Debug, Clone, PartialEq)]
pub struct KindGroups<T> {
    /// Positional-only entries.
    pub positional_only: Vec<T>,
    /// Positional-or-keyword entries.
    pub positional_or_keyword: Vec<T>,
    /// The variadic-positional entry (at most one).
    pub var_positional: Vec<T>,
    /// Keyword-only entries.
    pub keyword_only: Vec<T>,
    /// The variadic-keyword entry (at most one).
    pub var_keyword: Vec<T>,
}

impl<T> KindGroups<T> {
    fn new() -> Self {
        Self {
            positional_only: Vec::new(),
            positional_or_keyword: Vec::new(),
            var_positional: Vec::new(),
            keyword_only: Vec::new(),
            var_keyword: Vec::new(),
        }
    }

    /// The group for `kind`.
    pub fn group(&self, kind: ParameterKind) -> &[T] {
        match kind {
            ParameterKind::PositionalOnly => &self.positional_only,
            ParameterKind::PositionalOrKeyword => &self.positional_or_keyword,
            ParameterKind::VariadicPositional => &self.var_positional,
            ParameterKind::KeywordOnly => &self.keyword_only,
            ParameterKind::VariadicKeyword => &self.var_keyword,
        }
    }

    fn group_mut(&mut self, kind: ParameterKind) -> &mut Vec<T> {
        match kind {
            ParameterKind::PositionalOnly => &mut self.positional_only,
            ParameterKind::PositionalOrKeyword => &mut self.positional_or_keyword,
            ParameterKind::VariadicPositional => &mut self.var_positional,
            ParameterKind::KeywordOnly => &mut self.keyword_only,
            ParameterKind::VariadicKeyword => &mut self.var_keyword,
        }
    }

    /// Concatenate the groups in canonical order.
    pub fn into_flat(self) -> Vec<T> {
        let mut out = self.positional_only;
        out.extend(self.positional_or_keyword);
        out.extend(self.var_positional);
        out.extend(self.keyword_only);
        out.extend(self.var_keyword);
        out
    }
}

/// The declared parameters and return annotation of a callable.
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    parameters: Vec<Parameter>,
    return_annotation: Option<TypeDescriptor>,
}

impl Signature {
    /// Build a signature, checking the parameter-list invariants.
    pub fn new(
        parameters: Vec<Parameter>,
        return_annotation: Option<TypeDescriptor>,
    ) -> Result<Self, SignatureError> {
        validate(&parameters)?;
        Ok(Self {
            parameters,
            return_annotation,
        })
    }

    /// A signature without parameters.
    pub fn empty() -> Self {
        Self {
            parameters: Vec::new(),
            return_annotation: None,
        }
    }

    /// Parameters in declaration order.
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Look up a parameter by name.
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name() == name)
    }

    /// The declared return annotation, if any.
    pub fn declared_return_annotation(&self) -> Option<&TypeDescriptor> {
        self.return_annotation.as_ref()
    }

    /// The return annotation, or *any* when none was declared.
    pub fn return_annotation(&self) -> TypeDescriptor {
        self.return_annotation.clone().unwrap_or_default()
    }

    /// The variadic-positional parameter, if declared.
    pub fn var_positional(&self) -> Option<&Parameter> {
        self.first_of(ParameterKind::VariadicPositional)
    }

    /// The variadic-keyword parameter, if declared.
    pub fn var_keyword(&self) -> Option<&Parameter> {
        self.first_of(ParameterKind::VariadicKeyword)
    }

    fn first_of(&self, kind: ParameterKind) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.kind() == kind)
    }

    /// Apply `f` to every parameter and collect the results per kind group.
    pub fn traverse<T>(&self, mut f: impl FnMut(&Parameter) -> T) -> KindGroups<T> {
        let mut groups = KindGroups::new();
        for par in &self.parameters {
            groups.group_mut(par.kind()).push(f(par));
        }
        groups
    }

    /// The parameters partitioned by kind.
    pub fn partition(&self) -> KindGroups<&Parameter> {
        let mut groups = KindGroups::new();
        for par in &self.parameters {
            groups.group_mut(par.kind()).push(par);
        }
        groups
    }
}

fn validate(parameters: &[Parameter]) -> Result<(), SignatureError> {
    let mut seen = HashSet::new();
    let mut previous: Option<ParameterKind> = None;
    let mut positional_default = false;

    for par in parameters {
        if !seen.insert(par.name()) {
            return Err(SignatureError::DuplicateName(par.name().to_string()));
        }

        let kind = par.kind();
        if let Some(prev) = previous {
            if kind < prev {
                return Err(SignatureError::OutOfOrder {
                    name: par.name().to_string(),
                    kind,
                    previous: prev,
                });
            }
            if kind == prev && kind.is_variadic() {
                return Err(SignatureError::DuplicateVariadic {
                    name: par.name().to_string(),
                    kind,
                });
            }
        }

        if kind.is_variadic() && par.has_default() {
            return Err(SignatureError::VariadicDefault(par.name().to_string()));
        }

        if kind.accepts_positional() {
            if par.has_default() {
                positional_default = true;
            } else if positional_default {
                return Err(SignatureError::NonDefaultAfterDefault(
                    par.name().to_string(),
                ));
            }
        }

        previous = Some(kind);
    }
    Ok(())
}

impl fmt::Display for Signature {
    /// Renders the signature for humans, e.g.
    /// `(a: i64, /, b=1, *, c: f64 = 0.5, **d)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let groups = self.traverse(|par| {
            let prefix = match par.kind() {
                ParameterKind::VariadicPositional => "*",
                ParameterKind::VariadicKeyword => "**",
                _ => "",
            };
            let mut out = format!("{prefix}{}", par.name());
            if let Some(annotation) = par.annotation() {
                out.push_str(&format!(": {annotation}"));
            }
            match (par.default(), par.annotation()) {
                (Some(default), Some(_)) => out.push_str(&format!(" = {default}")),
                (Some(default), None) => out.push_str(&format!("={default}")),
                (None, _) => {}
            }
            out
        });
        let has_var_positional = !groups.var_positional.is_empty();
        let mut parts = crate::declaration::join_groups(groups);
        // `*rest` already opens the keyword-only group in source form.
        if has_var_positional {
            parts.retain(|part| part != crate::declaration::KEYWORD_ONLY_MARKER);
        }
        write!(f, "({})", parts.join(", "))?;
        if let Some(ret) = &self.return_annotation {
            write!(f, " -> {ret}")?;
        }
        Ok(())
    }
}
