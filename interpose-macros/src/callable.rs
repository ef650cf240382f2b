//! `#[callable]` code generation.
//!
//! This module contains:
//! - `#[callable]` - Attribute macro deriving a `Function` descriptor from a
//!   plain Rust function

use crate::params::{ParamInfo, clean_arg, parse_param, success_type, validate_params};
use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{
    Expr, FnArg, Ident, ItemFn, Lit, LitStr, Signature, Token, UnOp, parse::Parse,
    parse_macro_input,
};

/// Arguments for the `#[callable]` macro.
pub(crate) struct CallableArgs {
    pub name: Option<String>,
}

impl Parse for CallableArgs {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        let mut name = None;

        while !input.is_empty() {
            let ident: Ident = input.parse()?;
            input.parse::<Token![=]>()?;

            match ident.to_string().as_str() {
                "name" => {
                    let lit: LitStr = input.parse()?;
                    name = Some(lit.value());
                }
                other => {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("unknown attribute: {}", other),
                    ));
                }
            }

            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(CallableArgs { name })
    }
}

/// Implementation of the `#[callable]` macro.
pub fn callable_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as CallableArgs);
    let input = parse_macro_input!(item as ItemFn);

    match generate(&args, &input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn validate_signature(sig: &Signature) -> syn::Result<()> {
    if let Some(asyncness) = &sig.asyncness {
        return Err(syn::Error::new_spanned(
            asyncness,
            "#[callable] functions must be synchronous",
        ));
    }
    if let Some(unsafety) = &sig.unsafety {
        return Err(syn::Error::new_spanned(
            unsafety,
            "#[callable] cannot be applied to unsafe functions",
        ));
    }
    if !sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &sig.generics,
            "#[callable] does not support generic parameters",
        ));
    }
    Ok(())
}

fn generate(args: &CallableArgs, input: &ItemFn) -> syn::Result<proc_macro2::TokenStream> {
    validate_signature(&input.sig)?;

    let params = input
        .sig
        .inputs
        .iter()
        .map(|arg| match arg {
            FnArg::Typed(pat_type) => parse_param(pat_type),
            FnArg::Receiver(receiver) => Err(syn::Error::new_spanned(
                receiver,
                "#[callable] functions cannot take `self`; declare the receiver as a parameter",
            )),
        })
        .collect::<syn::Result<Vec<_>>>()?;
    validate_params(&params)?;

    let fn_name = &input.sig.ident;
    let fn_vis = &input.vis;
    let callable_name = args.name.clone().unwrap_or_else(|| fn_name.to_string());
    let factory_name = format_ident!("{}_callable", fn_name);

    let parameters = params.iter().map(parameter_descriptor);
    let extractions = params.iter().map(|param| {
        let ident = format_ident!("{}", param.name);
        let name = &param.name;
        let ty = &param.ty;
        quote! {
            let #ident: #ty = __bound.extract(#name)?;
        }
    });
    let call_args = params.iter().map(|param| format_ident!("{}", param.name));

    let return_annotation = match success_type(&input.sig.output) {
        Some(ty) => quote! {
            ::core::option::Option::Some(::interpose::TypeDescriptor::of::<#ty>())
        },
        None => quote! { ::core::option::Option::None },
    };

    // `?` converts the function's error type into `CallError`.
    let invoke = if crate::params::is_result_type(&input.sig.output) {
        quote! { let __value = #fn_name(#(#call_args),*)?; }
    } else {
        quote! { let __value = #fn_name(#(#call_args),*); }
    };

    let cleaned_inputs = input.sig.inputs.iter().map(clean_arg);
    let attrs = &input.attrs;
    let output = &input.sig.output;
    let block = &input.block;

    Ok(quote! {
        #(#attrs)*
        #fn_vis fn #fn_name(#(#cleaned_inputs),*) #output #block

        #[doc = concat!("Describes `", stringify!(#fn_name), "` as an interpose `Function`.")]
        #fn_vis fn #factory_name() -> ::core::result::Result<::interpose::Function, ::interpose::InterposeError> {
            let __signature = ::interpose::Signature::new(
                ::std::vec![#(#parameters),*],
                #return_annotation,
            )?;
            ::core::result::Result::Ok(::interpose::Function::new(
                #callable_name,
                __signature,
                |__bound: &::interpose::BoundArguments<'_>| {
                    #(#extractions)*
                    #invoke
                    ::interpose::__private::serde_json::to_value(__value)
                        .map_err(::interpose::CallError::from)
                },
            ))
        }
    })
}

fn parameter_descriptor(param: &ParamInfo) -> proc_macro2::TokenStream {
    let name = &param.name;
    let ty = &param.ty;
    let constructor = format_ident!("{}", param.kind.constructor());

    let annotation = if param.kind.is_variadic() {
        quote! {}
    } else {
        quote! { .with_annotation(::interpose::TypeDescriptor::of::<#ty>()) }
    };
    let default = param.default_expr.as_ref().map(|expr| {
        // Numeric literals take their type from the annotation; anything else
        // converts, so `#[default("x")] name: String` works.
        let value = if syn::parse2::<Expr>(expr.clone()).is_ok_and(|e| is_numeric_literal(&e)) {
            quote! { #expr }
        } else {
            quote! { ::core::convert::Into::into(#expr) }
        };
        quote! {
            .with_default({
                let __default: #ty = #value;
                ::interpose::__private::serde_json::to_value(&__default)
                    .map_err(::interpose::CallError::from)?
            })
        }
    });

    quote! {
        ::interpose::Parameter::#constructor(#name) #annotation #default
    }
}

fn is_numeric_literal(expr: &Expr) -> bool {
    match expr {
        Expr::Lit(lit) => matches!(lit.lit, Lit::Int(_) | Lit::Float(_)),
        Expr::Unary(unary) => matches!(unary.op, UnOp::Neg(_)) && is_numeric_literal(&unary.expr),
        Expr::Paren(paren) => is_numeric_literal(&paren.expr),
        _ => false,
    }
}
