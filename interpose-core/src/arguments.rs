//! The generic invocation convention and argument binding.
//!
//! Every callable is invoked with [`Arguments`]: an ordered positional list
//! plus an insertion-ordered keyword mapping. [`Signature::bind`] maps them
//! onto the declared parameters, applying defaults, and reports exactly the
//! binding errors the calling convention defines.

use crate::{
    error::{BindError, CallError},
    parameter::ParameterKind,
    signature::Signature,
    value::{Kwargs, Value},
};
use serde::de::DeserializeOwned;

/// Caller-supplied arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    positional: Vec<Value>,
    keywords: Kwargs,
}

impl Arguments {
    /// Empty arguments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arguments from a positional list and a keyword mapping.
    pub fn from_parts(positional: Vec<Value>, keywords: Kwargs) -> Self {
        Self {
            positional,
            keywords,
        }
    }

    /// Append a positional argument.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.push(value);
        self
    }

    /// Add a keyword argument.
    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Append a positional argument (mutable version).
    pub fn push(&mut self, value: impl Into<Value>) {
        self.positional.push(value.into());
    }

    /// Add a keyword argument (mutable version).
    ///
    /// A repeated name replaces the earlier value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.keywords.insert(name.into(), value.into());
    }

    /// Insert a receiver in front of the positional arguments.
    pub fn prepend(&mut self, receiver: Value) {
        self.positional.insert(0, receiver);
    }

    /// The positional arguments.
    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    /// The keyword arguments.
    pub fn keywords(&self) -> &Kwargs {
        &self.keywords
    }

    /// Split into positional list and keyword mapping.
    pub fn into_parts(self) -> (Vec<Value>, Kwargs) {
        (self.positional, self.keywords)
    }
}

/// Build [`Arguments`] inline.
///
/// Positional values come first, keyword values follow a `;`.
///
/// ```rust,ignore
/// let args = args![0, 1.5, "x"; d = 3, e = 4];
/// let none = args![];
/// let only_keywords = args![; flag = true];
/// ```
#[macro_export]
macro_rules! args {
    ($($value:expr),* $(,)? $(; $($name:ident = $kw:expr),* $(,)?)?) => {{
        #[allow(unused_mut)]
        let mut __args = $crate::Arguments::new();
        $( __args.push($value); )*
        $($( __args.insert(stringify!($name), $kw); )*)?
        __args
    }};
}

/// Arguments bound to the parameters of a [`Signature`], defaults applied.
///
/// Values are stored by parameter name in declaration order. A
/// variadic-positional parameter holds an array, a variadic-keyword
/// parameter an object.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundArguments<'s> {
    signature: &'s Signature,
    arguments: Kwargs,
}

impl<'s> BoundArguments<'s> {
    /// The signature these arguments are bound to.
    pub fn signature(&self) -> &'s Signature {
        self.signature
    }

    /// Parameter name → bound value, in declaration order.
    pub fn arguments(&self) -> &Kwargs {
        &self.arguments
    }

    /// The bound value of a parameter.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.arguments.get(name)
    }

    /// Deserialize the bound value of a parameter into `T`.
    pub fn extract<T: DeserializeOwned>(&self, name: &str) -> Result<T, CallError> {
        let value = self
            .arguments
            .get(name)
            .ok_or_else(|| BindError::MissingArgument(name.to_string()))?;
        Ok(serde_json::from_value(value.clone())?)
    }

    /// The values passed positionally: positional-only and
    /// positional-or-keyword values followed by the expanded `*args`.
    pub fn args(&self) -> Vec<Value> {
        let mut out = Vec::new();
        for par in self.signature.parameters() {
            let Some(value) = self.arguments.get(par.name()) else {
                break;
            };
            match par.kind() {
                ParameterKind::PositionalOnly | ParameterKind::PositionalOrKeyword => {
                    out.push(value.clone());
                }
                ParameterKind::VariadicPositional => extend_array(&mut out, value),
                ParameterKind::KeywordOnly | ParameterKind::VariadicKeyword => break,
            }
        }
        out
    }

    /// The values passed by keyword: keyword-only values followed by the
    /// expanded `**kwargs`.
    pub fn kwargs(&self) -> Kwargs {
        let mut out = Kwargs::new();
        for par in self.signature.parameters() {
            let Some(value) = self.arguments.get(par.name()) else {
                continue;
            };
            match par.kind() {
                ParameterKind::KeywordOnly => {
                    out.insert(par.name().to_string(), value.clone());
                }
                ParameterKind::VariadicKeyword => extend_object(&mut out, value),
                _ => {}
            }
        }
        out
    }

    /// Arguments that re-invoke the original callable with these values.
    ///
    /// Follows the forwarding call: positional-only values by position,
    /// positional-or-keyword and keyword-only values by keyword, variadics
    /// unpacked. When `*args` is non-empty, positional-or-keyword values are
    /// forwarded by position instead, since passing them by keyword would
    /// collide with the unpacked `*args`.
    pub fn forward(&self) -> Arguments {
        let spills_positional = self
            .signature
            .var_positional()
            .and_then(|par| self.arguments.get(par.name()))
            .is_some_and(|v| v.as_array().is_some_and(|a| !a.is_empty()));

        let mut out = Arguments::new();
        for par in self.signature.parameters() {
            let Some(value) = self.arguments.get(par.name()) else {
                continue;
            };
            match par.kind() {
                ParameterKind::PositionalOnly => out.positional.push(value.clone()),
                ParameterKind::PositionalOrKeyword if spills_positional => {
                    out.positional.push(value.clone());
                }
                ParameterKind::PositionalOrKeyword | ParameterKind::KeywordOnly => {
                    out.keywords.insert(par.name().to_string(), value.clone());
                }
                ParameterKind::VariadicPositional => extend_array(&mut out.positional, value),
                ParameterKind::VariadicKeyword => extend_object(&mut out.keywords, value),
            }
        }
        out
    }

    /// Consume into the name → value mapping.
    pub fn into_arguments(self) -> Kwargs {
        self.arguments
    }
}

fn extend_array(out: &mut Vec<Value>, value: &Value) {
    match value {
        Value::Array(items) => out.extend(items.iter().cloned()),
        other => out.push(other.clone()),
    }
}

fn extend_object(out: &mut Kwargs, value: &Value) {
    if let Value::Object(map) = value {
        out.extend(map.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
}

impl Signature {
    /// Bind `arguments` to this signature and apply defaults.
    ///
    /// Unfilled variadic parameters become `[]` / `{}`.
    pub fn bind(&self, arguments: Arguments) -> Result<BoundArguments<'_>, BindError> {
        let (positional, mut keywords) = arguments.into_parts();
        let params = self.parameters();
        let mut staged = Kwargs::new();
        let mut remaining = positional.into_iter();
        let mut next = 0;

        // Positional phase.
        for par in params {
            match par.kind() {
                ParameterKind::PositionalOnly | ParameterKind::PositionalOrKeyword => {
                    let Some(value) = remaining.next() else {
                        break;
                    };
                    if par.kind() == ParameterKind::PositionalOrKeyword
                        && keywords.contains_key(par.name())
                    {
                        return Err(BindError::MultipleValues(par.name().to_string()));
                    }
                    staged.insert(par.name().to_string(), value);
                }
                ParameterKind::VariadicPositional => {
                    let rest: Vec<Value> = remaining.by_ref().collect();
                    staged.insert(par.name().to_string(), Value::Array(rest));
                }
                ParameterKind::KeywordOnly | ParameterKind::VariadicKeyword => break,
            }
            next += 1;
        }
        if remaining.next().is_some() {
            return Err(BindError::TooManyPositional);
        }

        // Keyword phase. Positional-only names are checked whether or not
        // they were already filled by position.
        if self.var_keyword().is_none() {
            let misused = params.iter().find(|par| {
                par.kind() == ParameterKind::PositionalOnly && keywords.contains_key(par.name())
            });
            if let Some(par) = misused {
                return Err(BindError::PositionalOnlyAsKeyword(par.name().to_string()));
            }
        }
        for par in &params[next..] {
            match par.kind() {
                ParameterKind::PositionalOnly
                | ParameterKind::VariadicPositional
                | ParameterKind::VariadicKeyword => {}
                ParameterKind::PositionalOrKeyword | ParameterKind::KeywordOnly => {
                    if let Some(value) = keywords.shift_remove(par.name()) {
                        staged.insert(par.name().to_string(), value);
                    }
                }
            }
        }

        // Defaults, in declaration order.
        let mut bound = Kwargs::with_capacity(params.len());
        for par in params {
            let value = match staged.shift_remove(par.name()) {
                Some(value) => value,
                None => match par.kind() {
                    ParameterKind::VariadicPositional => Value::Array(Vec::new()),
                    ParameterKind::VariadicKeyword => {
                        Value::Object(std::mem::take(&mut keywords).into_iter().collect())
                    }
                    _ => par
                        .default()
                        .cloned()
                        .ok_or_else(|| BindError::MissingArgument(par.name().to_string()))?,
                },
            };
            bound.insert(par.name().to_string(), value);
        }

        if let Some((name, _)) = keywords.first() {
            return Err(BindError::UnexpectedKeyword(name.clone()));
        }

        Ok(BoundArguments {
            signature: self,
            arguments: bound,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{args, parameter::Parameter};
    use serde_json::json;

    // f(a, /, b=1, *, c=2, **d)
    fn f() -> Signature {
        Signature::new(
            vec![
                Parameter::positional_only("a"),
                Parameter::positional_or_keyword("b").with_default(json!(1)),
                Parameter::keyword_only("c").with_default(json!(2)),
                Parameter::var_keyword("d"),
            ],
            None,
        )
        .unwrap()
    }

    // g(a, b=1, *rest, flag=false)
    fn g() -> Signature {
        Signature::new(
            vec![
                Parameter::positional_or_keyword("a"),
                Parameter::positional_or_keyword("b").with_default(json!(1)),
                Parameter::var_positional("rest"),
                Parameter::keyword_only("flag").with_default(json!(false)),
            ],
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_args_macro() {
        let args = args![0, "x"; d = 3];
        assert_eq!(args.positional(), &[json!(0), json!("x")]);
        assert_eq!(args.keywords()["d"], json!(3));
        assert_eq!(args![], Arguments::new());
        assert_eq!(args![; flag = true].keywords().len(), 1);
    }

    #[test]
    fn test_bind_applies_defaults() {
        let sig = f();
        let bound = sig.bind(args![10]).unwrap();
        assert_eq!(bound.get("a"), Some(&json!(10)));
        assert_eq!(bound.get("b"), Some(&json!(1)));
        assert_eq!(bound.get("c"), Some(&json!(2)));
        assert_eq!(bound.get("d"), Some(&json!({})));
        let names: Vec<_> = bound.arguments().keys().cloned().collect();
        assert_eq!(names, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_bind_collects_var_keyword() {
        let sig = f();
        let bound = sig.bind(args![10; c = 5, x = 7, a = 9]).unwrap();
        assert_eq!(bound.get("c"), Some(&json!(5)));
        // a positional-only name passed by keyword lands in **d
        assert_eq!(bound.get("d"), Some(&json!({"x": 7, "a": 9})));
    }

    #[test]
    fn test_bind_errors() {
        let sig = f();
        assert_eq!(
            sig.bind(args![]).unwrap_err(),
            BindError::MissingArgument("a".to_string())
        );
        assert_eq!(
            sig.bind(args![1, 2, 3]).unwrap_err(),
            BindError::TooManyPositional
        );
        assert_eq!(
            sig.bind(args![1, 2; b = 3]).unwrap_err(),
            BindError::MultipleValues("b".to_string())
        );

        let sig = g();
        assert_eq!(
            sig.bind(args![1; nope = 2]).unwrap_err(),
            BindError::UnexpectedKeyword("nope".to_string())
        );
    }

    #[test]
    fn test_positional_only_as_keyword() {
        let sig = Signature::new(vec![Parameter::positional_only("a")], None).unwrap();
        assert_eq!(
            sig.bind(args![; a = 1]).unwrap_err(),
            BindError::PositionalOnlyAsKeyword("a".to_string())
        );
        assert_eq!(
            sig.bind(args![1; a = 2]).unwrap_err(),
            BindError::PositionalOnlyAsKeyword("a".to_string())
        );
    }

    #[test]
    fn test_args_and_kwargs_views() {
        let sig = g();
        let bound = sig.bind(args![1, 2, 3, 4; flag = true]).unwrap();
        assert_eq!(bound.args(), vec![json!(1), json!(2), json!(3), json!(4)]);
        let kwargs = bound.kwargs();
        assert_eq!(kwargs.len(), 1);
        assert_eq!(kwargs["flag"], json!(true));

        let sig = f();
        let bound = sig.bind(args![1; e = 5]).unwrap();
        assert_eq!(bound.args(), vec![json!(1), json!(1)]);
        let kwargs = bound.kwargs();
        assert_eq!(kwargs["c"], json!(2));
        assert_eq!(kwargs["e"], json!(5));
    }

    #[test]
    fn test_forward_round_trips() {
        let sig = f();
        let bound = sig.bind(args![1, 2; c = 3, e = 4]).unwrap();
        let forwarded = bound.forward();
        assert_eq!(forwarded.positional(), &[json!(1)]);
        assert_eq!(forwarded.keywords()["b"], json!(2));
        let rebound = sig.bind(forwarded).unwrap();
        assert_eq!(rebound.arguments(), bound.arguments());
    }

    #[test]
    fn test_forward_with_var_positional_passes_by_position() {
        let sig = g();
        let bound = sig.bind(args![1, 2, 3]).unwrap();
        let forwarded = bound.forward();
        assert_eq!(forwarded.positional(), &[json!(1), json!(2), json!(3)]);
        assert_eq!(forwarded.keywords()["flag"], json!(false));
        let rebound = sig.bind(forwarded).unwrap();
        assert_eq!(rebound.arguments(), bound.arguments());

        let bound = sig.bind(args![1]).unwrap();
        let forwarded = bound.forward();
        assert!(forwarded.positional().is_empty());
        assert_eq!(sig.bind(forwarded).unwrap().arguments(), bound.arguments());
    }

    #[test]
    fn test_extract() {
        let sig = g();
        let bound = sig.bind(args![1, 2, 3]).unwrap();
        assert_eq!(bound.extract::<i64>("a").unwrap(), 1);
        assert_eq!(bound.extract::<Vec<i64>>("rest").unwrap(), vec![3]);
        assert!(matches!(
            bound.extract::<String>("a"),
            Err(CallError::Conversion(_))
        ));
    }
}
