//! Procedural macros for interpose.

use proc_macro::TokenStream;

mod callable;
mod params;

/// Describes a plain Rust function as an introspectable `Function`.
///
/// The function itself is kept as written (minus the parameter attributes
/// below). Next to it, the macro generates `<name>_callable()`, which builds
/// a `Function` whose `Signature` mirrors the Rust parameters and whose body
/// extracts each argument with `serde` before calling the original.
///
/// # Parameter Attributes
///
/// - `#[positional_only]`, `#[keyword_only]` - parameter kind (default:
///   positional-or-keyword)
/// - `#[var_positional]` - collects extra positional arguments; the type must
///   deserialize from an array, e.g. `Vec<T>`
/// - `#[var_keyword]` - collects extra keyword arguments; the type must
///   deserialize from an object, e.g. `Kwargs`
/// - `#[default(expr)]` - default value, serialized when the descriptor is
///   built
///
/// Kinds must appear in canonical order; violations are compile errors.
/// A `Result<T, E>` return requires `CallError: From<E>`.
///
/// # Example
///
/// ```rust,ignore
/// #[interpose::callable]
/// fn scale(
///     #[positional_only] value: f64,
///     #[default(2.0)] factor: f64,
///     #[keyword_only]
///     #[default(false)]
///     round: bool,
/// ) -> f64 {
///     let scaled = value * factor;
///     if round { scaled.round() } else { scaled }
/// }
///
/// let scale = scale_callable()?;
/// assert_eq!(scale.call(args![1.5; round = true])?, json!(3.0));
/// ```
#[proc_macro_attribute]
pub fn callable(attr: TokenStream, item: TokenStream) -> TokenStream {
    callable::callable_impl(attr, item)
}
