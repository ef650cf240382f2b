#![allow(dead_code)]

use interpose::{
    CallError, Callable, Class, Function, Hook, Kwargs, Parameter, Signature, TypeDescriptor,
    Value,
    testing::{CallLog, RecordingCheckpoint},
};
use serde_json::json;
use std::sync::Arc;

// ============================================================================
// Sample callables
// ============================================================================

/// `f(a, /, b=1, *, c=2, **d)`, returning every bound value.
pub fn mixed() -> Function {
    let signature = Signature::new(
        vec![
            Parameter::positional_only("a"),
            Parameter::positional_or_keyword("b").with_default(json!(1)),
            Parameter::keyword_only("c").with_default(json!(2)),
            Parameter::var_keyword("d"),
        ],
        None,
    )
    .unwrap();
    Function::new("f", signature, |bound| {
        Ok(Value::Object(
            bound
                .arguments()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        ))
    })
}

/// Every parameter kind at once, with annotations.
///
/// `everything(x: int, /, y: int = 10, *rest, flag: bool = false, **extra) -> int`
pub fn everything() -> Function {
    let signature = Signature::new(
        vec![
            Parameter::positional_only("x").with_annotation(TypeDescriptor::named("int")),
            Parameter::positional_or_keyword("y")
                .with_default(json!(10))
                .with_annotation(TypeDescriptor::named("int")),
            Parameter::var_positional("rest"),
            Parameter::keyword_only("flag")
                .with_default(json!(false))
                .with_annotation(TypeDescriptor::named("bool")),
            Parameter::var_keyword("extra"),
        ],
        Some(TypeDescriptor::named("int")),
    )
    .unwrap();
    Function::new("everything", signature, |bound| {
        let x: i64 = bound.extract("x")?;
        let y: i64 = bound.extract("y")?;
        let rest: Vec<i64> = bound.extract("rest")?;
        let flag: bool = bound.extract("flag")?;
        let extra: Kwargs = bound.extract("extra")?;
        let total = x + y + rest.iter().sum::<i64>() + extra.len() as i64;
        Ok(json!(if flag { -total } else { total }))
    })
}

/// Fails with `"division by zero"` when `divisor` is 0.
pub fn divide() -> Function {
    let signature = Signature::new(
        vec![
            Parameter::positional_or_keyword("dividend"),
            Parameter::positional_or_keyword("divisor"),
        ],
        None,
    )
    .unwrap();
    Function::new("divide", signature, |bound| {
        let dividend: i64 = bound.extract("dividend")?;
        let divisor: i64 = bound.extract("divisor")?;
        if divisor == 0 {
            return Err(CallError::raised("division by zero"));
        }
        Ok(json!(dividend / divisor))
    })
}

/// A body that echoes its bound values as an array.
pub fn echo(name: &str, parameters: Vec<Parameter>) -> Function {
    Function::new(name, Signature::new(parameters, None).unwrap(), |bound| {
        Ok(Value::Array(bound.arguments().values().cloned().collect()))
    })
}

// ============================================================================
// Sample classes
// ============================================================================

/// `Animal <- Dog`, with one member of every kind plus an attribute.
pub fn animals() -> Arc<Class> {
    let animal = Class::builder("Animal")
        .method(echo("speak", vec![Parameter::positional_only("self")]))
        .class_method(echo(
            "create",
            vec![
                Parameter::positional_only("cls"),
                Parameter::positional_or_keyword("name"),
            ],
        ))
        .attribute("legs", 4)
        .build()
        .unwrap();
    Class::builder("Dog")
        .base(animal)
        .method(echo(
            "fetch",
            vec![
                Parameter::positional_only("self"),
                Parameter::positional_or_keyword("item").with_default(json!("ball")),
            ],
        ))
        .static_method(echo("bark", vec![Parameter::var_positional("times")]))
        .build()
        .unwrap()
}

// ============================================================================
// Hooks
// ============================================================================

/// A hook with one recording checkpoint (id 0).
pub fn recording_hook() -> (Hook, CallLog) {
    let hook = Hook::new();
    let log = CallLog::new();
    hook.add_checkpoint_factory(RecordingCheckpoint::factory(0, log.clone()));
    (hook, log)
}

/// Wrap `callable` with a fresh recording hook.
pub fn recorded(callable: impl Callable) -> (Arc<dyn Callable>, CallLog) {
    let (hook, log) = recording_hook();
    (hook.wrap(Arc::new(callable)), log)
}
