//! Class-wide hooking.

mod common;

use common::{animals, echo, recording_hook};
use interpose::{
    CallError, Class, ClassError, Hook, MethodKind, MethodKinds, Parameter, RehookPolicy, args,
    testing::{CallLog, Event, RecordingCheckpoint},
};
use serde_json::json;
use std::sync::Arc;

#[test]
fn test_every_method_along_mro_is_wrapped() {
    let (hook, log) = recording_hook();
    let original = animals();
    let hooked = hook.hook(&original).unwrap();

    for name in ["speak", "create", "fetch", "bark"] {
        let wrapped = hooked.method(name).unwrap();
        let plain = original.method(name).unwrap();
        assert_eq!(wrapped.kind(), plain.kind(), "{name} changed kind");
        assert_eq!(wrapped.signature(), plain.signature(), "{name} changed signature");
        assert_eq!(wrapped.callable().hooked_by(), Some(hook.registry().id()));
    }

    let dog = hooked.instantiate("rex");
    assert_eq!(dog.call("speak", args![]).unwrap(), json!(["rex"]));
    assert_eq!(dog.call("fetch", args![]).unwrap(), json!(["rex", "ball"]));
    assert_eq!(dog.call("create", args!["fido"]).unwrap(), json!(["Dog", "fido"]));
    assert_eq!(hooked.call("bark", args![1, 2]).unwrap(), json!([[1, 2]]));

    assert_eq!(log.entered(), vec!["speak", "fetch", "create", "bark"]);
}

#[test]
fn test_attributes_unchanged() {
    let (hook, _) = recording_hook();
    let hooked = hook.hook(&animals()).unwrap();

    assert_eq!(hooked.instantiate(json!(null)).attribute("legs"), Some(&json!(4)));
    assert!(matches!(
        hooked.call("legs", args![]),
        Err(CallError::NotCallable(_))
    ));
}

#[test]
fn test_class_bound_receives_accessing_class() {
    let (hook, log) = recording_hook();
    let hooked = hook.hook(&animals()).unwrap();
    let animal = &hooked.bases()[0];

    assert_eq!(animal.call("create", args!["generic"]).unwrap(), json!(["Animal", "generic"]));
    assert_eq!(hooked.call("create", args!["fido"]).unwrap(), json!(["Dog", "fido"]));

    let Event::Enter { args, .. } = &log.events()[0] else {
        panic!("expected enter first");
    };
    assert_eq!(args, &vec![json!("Animal"), json!("generic")]);
}

#[test]
fn test_kind_selection_leaves_others_alone() {
    let hook = Hook::builder()
        .kinds(MethodKinds::CLASS_BOUND | MethodKinds::STATIC)
        .build();
    let hooked = hook.hook(&animals()).unwrap();

    let wrapped = |name: &str| hooked.method(name).unwrap().callable().hooked_by().is_some();
    assert!(!wrapped("speak"));
    assert!(!wrapped("fetch"));
    assert!(wrapped("create"));
    assert!(wrapped("bark"));
}

#[test]
fn test_rehook_policies() {
    for (policy, expected) in [(RehookPolicy::Skip, 2), (RehookPolicy::Layer, 4)] {
        let hook = Hook::builder().rehook(policy).build();
        let log = CallLog::new();
        hook.add_checkpoint_factory(RecordingCheckpoint::factory(0, log.clone()));

        let once = hook.hook(&animals()).unwrap();
        let twice = hook.hook(&once).unwrap();
        twice.call("bark", args![]).unwrap();
        assert_eq!(log.len(), expected, "{policy:?}");
    }
}

#[test]
fn test_second_hook_layers_over_first() {
    let (first, first_log) = recording_hook();
    let (second, second_log) = recording_hook();

    let hooked = second.hook(&first.hook(&animals()).unwrap()).unwrap();
    hooked.call("bark", args![]).unwrap();

    assert_eq!(first_log.len(), 2);
    assert_eq!(second_log.len(), 2);
    assert_eq!(
        hooked.method("bark").unwrap().callable().hooked_by(),
        Some(second.registry().id())
    );
}

#[test]
fn test_diamond_hierarchy() {
    let (hook, log) = recording_hook();
    let root = Class::builder("Root")
        .method(echo("ping", vec![Parameter::positional_only("self")]))
        .build()
        .unwrap();
    let a = Class::builder("A").base(Arc::clone(&root)).build().unwrap();
    let b = Class::builder("B").base(root).build().unwrap();
    let leaf = Class::builder("Leaf").base(a).base(b).build().unwrap();

    let hooked = hook.hook(&leaf).unwrap();
    assert_eq!(hooked.mro_names(), vec!["Leaf", "A", "B", "Root"]);
    assert!(Arc::ptr_eq(&hooked.bases()[0].bases()[0], &hooked.bases()[1].bases()[0]));

    hooked.instantiate(1).call("ping", args![]).unwrap();
    assert_eq!(log.len(), 2);
    assert_eq!(
        hooked.method("ping").unwrap().kind(),
        MethodKind::Plain
    );
}

#[test]
fn test_inconsistent_hierarchy_rejected() {
    let base = Class::builder("Base").build().unwrap();
    let derived = Class::builder("Derived").base(Arc::clone(&base)).build().unwrap();
    let err = Class::builder("Broken")
        .base(base)
        .base(derived)
        .build()
        .unwrap_err();
    assert!(matches!(err, ClassError::InconsistentHierarchy(name) if name == "Broken"));
}
