//! Parameter parsing and compile-time signature checks.

use proc_macro2::TokenStream;
use syn::{Attribute, FnArg, GenericArgument, Pat, PatType, PathArguments, ReturnType, Type};

/// Parameter-kind attributes recognised on function arguments.
const KIND_ATTRS: [&str; 4] = ["positional_only", "keyword_only", "var_positional", "var_keyword"];

/// Mirrors `interpose::ParameterKind`; variant order is the canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Kind {
    PositionalOnly,
    PositionalOrKeyword,
    VarPositional,
    KeywordOnly,
    VarKeyword,
}

impl Kind {
    fn from_attr(name: &str) -> Option<Self> {
        match name {
            "positional_only" => Some(Kind::PositionalOnly),
            "keyword_only" => Some(Kind::KeywordOnly),
            "var_positional" => Some(Kind::VarPositional),
            "var_keyword" => Some(Kind::VarKeyword),
            _ => None,
        }
    }

    pub(crate) fn constructor(self) -> &'static str {
        match self {
            Kind::PositionalOnly => "positional_only",
            Kind::PositionalOrKeyword => "positional_or_keyword",
            Kind::VarPositional => "var_positional",
            Kind::KeywordOnly => "keyword_only",
            Kind::VarKeyword => "var_keyword",
        }
    }

    pub(crate) fn is_variadic(self) -> bool {
        matches!(self, Kind::VarPositional | Kind::VarKeyword)
    }

    fn is_positional(self) -> bool {
        matches!(self, Kind::PositionalOnly | Kind::PositionalOrKeyword)
    }
}

/// One parsed function argument.
pub(crate) struct ParamInfo {
    pub name: String,
    pub ty: Type,
    pub kind: Kind,
    pub default_expr: Option<TokenStream>,
    pub span_source: PatType,
}

/// Parse a typed argument, reading its kind and `#[default(expr)]`.
pub(crate) fn parse_param(pat_type: &PatType) -> syn::Result<ParamInfo> {
    let Pat::Ident(pat_ident) = &*pat_type.pat else {
        return Err(syn::Error::new_spanned(
            &pat_type.pat,
            "#[callable] parameters must be plain identifiers",
        ));
    };

    let mut kind = None;
    let mut default_expr = None;
    for attr in &pat_type.attrs {
        if attr.path().is_ident("default") {
            default_expr = Some(attr.parse_args::<TokenStream>()?);
            continue;
        }
        let Some(found) = attr.path().get_ident().and_then(|i| Kind::from_attr(&i.to_string()))
        else {
            continue;
        };
        if kind.replace(found).is_some() {
            return Err(syn::Error::new_spanned(
                attr,
                "a parameter takes at most one kind attribute",
            ));
        }
    }

    Ok(ParamInfo {
        name: pat_ident.ident.to_string(),
        ty: (*pat_type.ty).clone(),
        kind: kind.unwrap_or(Kind::PositionalOrKeyword),
        default_expr,
        span_source: pat_type.clone(),
    })
}

/// Check the same ordering rules `Signature::new` enforces, at compile time.
pub(crate) fn validate_params(params: &[ParamInfo]) -> syn::Result<()> {
    let mut previous: Option<Kind> = None;
    let mut seen_default = false;

    for param in params {
        if let Some(prev) = previous {
            if param.kind < prev {
                return Err(syn::Error::new_spanned(
                    &param.span_source,
                    format!(
                        "`{}` is declared after a parameter of a later kind",
                        param.name
                    ),
                ));
            }
            if param.kind == prev && param.kind.is_variadic() {
                return Err(syn::Error::new_spanned(
                    &param.span_source,
                    "only one variadic parameter of each kind is allowed",
                ));
            }
        }
        if param.kind.is_variadic() && param.default_expr.is_some() {
            return Err(syn::Error::new_spanned(
                &param.span_source,
                "variadic parameters cannot have a default",
            ));
        }
        if param.kind.is_positional() {
            if param.default_expr.is_some() {
                seen_default = true;
            } else if seen_default {
                return Err(syn::Error::new_spanned(
                    &param.span_source,
                    format!(
                        "non-default parameter `{}` follows a parameter with a default",
                        param.name
                    ),
                ));
            }
        }
        previous = Some(param.kind);
    }
    Ok(())
}

/// Whether `attr` is consumed by `#[callable]` and must be stripped.
pub(crate) fn is_param_attr(attr: &Attribute) -> bool {
    attr.path().is_ident("default") || KIND_ATTRS.iter().any(|name| attr.path().is_ident(name))
}

/// Strip `#[callable]` parameter attributes, keeping the rest.
pub(crate) fn clean_arg(arg: &FnArg) -> FnArg {
    match arg {
        FnArg::Typed(pat_type) => {
            let mut cleaned = pat_type.clone();
            cleaned.attrs.retain(|attr| !is_param_attr(attr));
            FnArg::Typed(cleaned)
        }
        FnArg::Receiver(_) => arg.clone(),
    }
}

/// Checks if a return type is `Result<T, E>`.
pub(crate) fn is_result_type(return_type: &ReturnType) -> bool {
    if let ReturnType::Type(_, ty) = return_type
        && let Type::Path(type_path) = ty.as_ref()
        && let Some(segment) = type_path.path.segments.last()
    {
        return segment.ident == "Result";
    }
    false
}

/// The type a call produces on success: `T` for `Result<T, E>`, the
/// declared type otherwise, `None` for an omitted or explicit `()`
/// (including `Result<(), E>`).
pub(crate) fn success_type(return_type: &ReturnType) -> Option<&Type> {
    let ReturnType::Type(_, ty) = return_type else {
        return None;
    };
    let success = if is_result_type(return_type)
        && let Type::Path(type_path) = ty.as_ref()
        && let Some(segment) = type_path.path.segments.last()
        && let PathArguments::AngleBracketed(args) = &segment.arguments
        && let Some(GenericArgument::Type(inner)) = args.args.first()
    {
        inner
    } else {
        ty.as_ref()
    };
    match success {
        Type::Tuple(tuple) if tuple.elems.is_empty() => None,
        _ => Some(success),
    }
}
