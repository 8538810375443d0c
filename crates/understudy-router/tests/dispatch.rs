use serde_json::{Value, json};
use understudy_fn::{CallError, implementation};
use understudy_matcher::{Arg, ForeignMatcher, Matcher, MatcherError};
use understudy_router::{CallRouter, RouterError};

fn number() -> Matcher { Matcher::new("number", Value::is_number) }

#[test]
fn test_literal_pattern_uses_strict_equality() {
    let router = CallRouter::new();
    router.called_with([json!(5), json!("x")]).unwrap().returns(json!("hit"));

    assert_eq!(router.call(&[json!(5), json!("x")]).unwrap(), json!("hit"));
    assert_eq!(router.call(&[json!(5), json!("y")]).unwrap(), Value::Null);
}

#[test]
fn test_unmatched_call_uses_fallback() {
    let router = CallRouter::with_fallback(implementation(|_| Ok(json!("default"))));
    router.called_with([json!(5), json!("x")]).unwrap().returns(json!("hit"));

    assert_eq!(router.call(&[json!(5), json!("y")]).unwrap(), json!("default"));
}

#[test]
fn test_newest_binding_shadows_older_overlap() {
    let router = CallRouter::new();
    router.called_with([number()]).unwrap().returns(json!("any number"));
    router.called_with([json!(7)]).unwrap().returns(json!("seven"));

    assert_eq!(router.call(&[json!(7)]).unwrap(), json!("seven"));
    assert_eq!(router.call(&[json!(8)]).unwrap(), json!("any number"));
}

#[test]
fn test_older_specific_binding_shadowed_by_newer_general() {
    let router = CallRouter::new();
    router.called_with([json!(7)]).unwrap().returns(json!("seven"));
    router.called_with([number()]).unwrap().returns(json!("any number"));

    assert_eq!(router.call(&[json!(7)]).unwrap(), json!("any number"));
}

#[test]
fn test_matcher_accepts_any_number_only() {
    let router = CallRouter::new();
    router.called_with([number()]).unwrap().returns(json!(true));

    assert_eq!(router.call(&[json!(0)]).unwrap(), json!(true));
    assert_eq!(router.call(&[json!(-12.75)]).unwrap(), json!(true));
    assert_eq!(router.call(&[json!("12")]).unwrap(), Value::Null);
}

#[test]
fn test_fallback_error_propagates() {
    let router = CallRouter::with_fallback(implementation(|_| Err(CallError::thrown("not mocked"))));

    let err = router.call(&[json!(1)]).unwrap_err();
    assert_eq!(err.to_string(), "not mocked");
}

#[test]
fn test_foreign_matcher_registers_nothing() {
    let router = CallRouter::new();
    router.called_with([1]).unwrap();

    let err = router
        .called_with([Arg::from(1), ForeignMatcher::new("jest", "expect.any(Number)").into()])
        .unwrap_err();

    assert!(matches!(
        err,
        RouterError::UnsupportedMatcher(MatcherError::UnsupportedMatcher { position: 1, .. })
    ));
    assert_eq!(router.binding_count(), 1);
}

#[test]
fn test_serialized_foreign_matcher_rejected() {
    let router = CallRouter::new();
    let raw = json!({ "$$typeof": "Symbol.for(jest.asymmetricMatcher)", "name": "Anything" });

    assert!(router.called_with([raw]).is_err());
    assert_eq!(router.binding_count(), 0);
}

#[test]
fn test_trailing_arguments_reach_delegate() {
    let router = CallRouter::new();
    router
        .called_with(["sum"])
        .unwrap()
        .set_implementation(implementation(|args| {
            Ok(json!(args[1..].iter().filter_map(Value::as_i64).sum::<i64>()))
        }));

    assert_eq!(router.call(&[json!("sum"), json!(1), json!(2), json!(3)]).unwrap(), json!(6));
}

#[test]
fn test_history_is_kept_per_delegate_and_in_aggregate() {
    let router = CallRouter::new();
    let one = router.called_with([1]).unwrap();
    let two = router.called_with([2]).unwrap();

    router.call(&[json!(1)]).unwrap();
    router.call(&[json!(2)]).unwrap();
    router.call(&[json!(2), json!("extra")]).unwrap();
    router.call(&[json!(3)]).unwrap();

    assert_eq!(router.call_count(), 4);
    assert_eq!(one.calls(), vec![vec![json!(1)]]);
    assert_eq!(two.calls(), vec![vec![json!(2)], vec![json!(2), json!("extra")]]);
}

#[test]
fn test_delegate_once_values() {
    let router = CallRouter::new();
    let delegate = router.called_with([1]).unwrap();
    delegate.returns(json!("steady"));
    delegate.returns_once(json!("first"));

    assert_eq!(router.call(&[json!(1)]).unwrap(), json!("first"));
    assert_eq!(router.call(&[json!(1)]).unwrap(), json!("steady"));
}

#[test]
fn test_standalone_reset_empties_bindings() {
    let router = CallRouter::new();
    router.called_with([1]).unwrap().returns(json!(1));
    router.called_with([2]).unwrap().returns(json!(2));

    router.reset().unwrap();

    assert_eq!(router.binding_count(), 0);
    assert_eq!(router.call(&[json!(1)]).unwrap(), Value::Null);
}

#[test]
fn test_clear_keeps_bindings() {
    let router = CallRouter::new();
    router.called_with([1]).unwrap().returns(json!(1));
    router.call(&[json!(1)]).unwrap();

    router.clear().unwrap();

    assert_eq!(router.call_count(), 0);
    assert_eq!(router.binding_count(), 1);
    assert_eq!(router.call(&[json!(1)]).unwrap(), json!(1));
}
