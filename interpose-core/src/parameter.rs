//! Parameter descriptors.

use crate::{
    error::SignatureError,
    value::{TypeDescriptor, Value},
};
use std::{fmt, str::FromStr};

/// How an argument may be supplied for a parameter.
///
/// The variants are declared in canonical order: a signature lists its
/// parameters grouped by kind, in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ParameterKind {
    /// Only by position.
    PositionalOnly,
    /// By position or by keyword.
    PositionalOrKeyword,
    /// Collects surplus positional arguments (`*args`).
    VariadicPositional,
    /// Only by keyword.
    KeywordOnly,
    /// Collects surplus keyword arguments (`**kwargs`).
    VariadicKeyword,
}

impl ParameterKind {
    /// All kinds in canonical order.
    pub const ALL: [ParameterKind; 5] = [
        ParameterKind::PositionalOnly,
        ParameterKind::PositionalOrKeyword,
        ParameterKind::VariadicPositional,
        ParameterKind::KeywordOnly,
        ParameterKind::VariadicKeyword,
    ];

    /// Whether this kind collects surplus arguments.
    pub fn is_variadic(self) -> bool {
        matches!(
            self,
            ParameterKind::VariadicPositional | ParameterKind::VariadicKeyword
        )
    }

    /// Whether a value for this kind can be supplied by position.
    pub fn accepts_positional(self) -> bool {
        matches!(
            self,
            ParameterKind::PositionalOnly | ParameterKind::PositionalOrKeyword
        )
    }

    /// Whether a value for this kind can be supplied by keyword.
    pub fn accepts_keyword(self) -> bool {
        matches!(
            self,
            ParameterKind::PositionalOrKeyword | ParameterKind::KeywordOnly
        )
    }

    /// The conventional upper-case name, e.g. `POSITIONAL_ONLY`.
    pub fn as_str(self) -> &'static str {
        match self {
            ParameterKind::PositionalOnly => "POSITIONAL_ONLY",
            ParameterKind::PositionalOrKeyword => "POSITIONAL_OR_KEYWORD",
            ParameterKind::VariadicPositional => "VAR_POSITIONAL",
            ParameterKind::KeywordOnly => "KEYWORD_ONLY",
            ParameterKind::VariadicKeyword => "VAR_KEYWORD",
        }
    }
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParameterKind {
    type Err = SignatureError;

    /// Accepts the conventional names in any case, with `VARIADIC_` as an
    /// alias of `VAR_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        match normalized.as_str() {
            "POSITIONAL_ONLY" => Ok(ParameterKind::PositionalOnly),
            "POSITIONAL_OR_KEYWORD" => Ok(ParameterKind::PositionalOrKeyword),
            "VAR_POSITIONAL" | "VARIADIC_POSITIONAL" => Ok(ParameterKind::VariadicPositional),
            "KEYWORD_ONLY" => Ok(ParameterKind::KeywordOnly),
            "VAR_KEYWORD" | "VARIADIC_KEYWORD" => Ok(ParameterKind::VariadicKeyword),
            _ => Err(SignatureError::UnknownKind(s.to_string())),
        }
    }
}

/// A single declared parameter.
///
/// # Example
///
/// ```rust,ignore
/// let b = Parameter::positional_or_keyword("b")
///     .with_default(json!(1))
///     .with_annotation(TypeDescriptor::of::<i64>());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: String,
    kind: ParameterKind,
    default: Option<Value>,
    annotation: Option<TypeDescriptor>,
}

impl Parameter {
    /// Create a parameter of the given kind with no default and no annotation.
    pub fn new(name: impl Into<String>, kind: ParameterKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default: None,
            annotation: None,
        }
    }

    /// Create a parameter from a textual kind name.
    ///
    /// Fails with [`SignatureError::UnknownKind`] for anything but the five
    /// recognized kinds.
    pub fn with_kind_name(name: impl Into<String>, kind: &str) -> Result<Self, SignatureError> {
        Ok(Self::new(name, kind.parse()?))
    }

    /// A positional-only parameter.
    pub fn positional_only(name: impl Into<String>) -> Self {
        Self::new(name, ParameterKind::PositionalOnly)
    }

    /// A positional-or-keyword parameter.
    pub fn positional_or_keyword(name: impl Into<String>) -> Self {
        Self::new(name, ParameterKind::PositionalOrKeyword)
    }

    /// A variadic-positional parameter.
    pub fn var_positional(name: impl Into<String>) -> Self {
        Self::new(name, ParameterKind::VariadicPositional)
    }

    /// A keyword-only parameter.
    pub fn keyword_only(name: impl Into<String>) -> Self {
        Self::new(name, ParameterKind::KeywordOnly)
    }

    /// A variadic-keyword parameter.
    pub fn var_keyword(name: impl Into<String>) -> Self {
        Self::new(name, ParameterKind::VariadicKeyword)
    }

    /// Set the default value.
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Set the type annotation.
    pub fn with_annotation(mut self, annotation: TypeDescriptor) -> Self {
        self.annotation = Some(annotation);
        self
    }

    /// The parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The parameter kind.
    pub fn kind(&self) -> ParameterKind {
        self.kind
    }

    /// The declared default, if any.
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Whether a default is declared.
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// The declared annotation, if any.
    pub fn annotation(&self) -> Option<&TypeDescriptor> {
        self.annotation.as_ref()
    }

    /// The annotation, or *any* when none was declared.
    pub fn annotation_or_any(&self) -> TypeDescriptor {
        self.annotation.clone().unwrap_or_default()
    }
}
