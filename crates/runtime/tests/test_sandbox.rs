//! Sandbox policy for user callbacks

use arrayscript_runtime::{
    Function, ScriptError, Value, ValueSequence, call_method, call_method_in, runtime_config,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

fn sequence(values: Vec<Value>) -> Value {
    Value::from(ValueSequence::from_values(values))
}

/// Impure callback counting its invocations
fn counting_impure(calls: &Arc<AtomicUsize>) -> Value {
    let calls = calls.clone();
    Value::from(Function::new("impure", move |_, args| {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(args.first().cloned().unwrap_or_default())
    }))
}

#[test]
fn test_sandboxed_combinators_reject_impure_callbacks() {
    let s = sequence(vec![Value::Number(1.0), Value::Number(2.0)]);
    let calls = Arc::new(AtomicUsize::new(0));

    for method in ["map", "filter", "reduce", "sort"] {
        let result = call_method(&s, method, &[counting_impure(&calls)], true);
        assert_eq!(result, Err(ScriptError::PolicyViolation { method }));
    }

    // Rejected before any element was visited
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_policy_messages() {
    let s = sequence(vec![Value::Number(1.0)]);
    let calls = Arc::new(AtomicUsize::new(0));
    let err = call_method(&s, "sort", &[counting_impure(&calls)], true).unwrap_err();
    assert_eq!(err.to_string(), "Sort function must be side-effect free.");
}

#[test]
fn test_unsandboxed_frames_run_impure_callbacks() {
    let s = sequence(vec![Value::Number(1.0), Value::Number(2.0)]);
    let calls = Arc::new(AtomicUsize::new(0));
    let mapped = call_method(&s, "map", &[counting_impure(&calls)], false).unwrap();
    assert_eq!(mapped.as_sequence().unwrap().len(), 2);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_sandboxed_frames_run_pure_callbacks() {
    let s = sequence(vec![Value::Number(2.0), Value::Number(1.0)]);
    let less = Value::from(Function::pure("less", |_, args| {
        Ok(Value::Boolean(args[0] < args[1]))
    }));
    let sorted = call_method(&s, "sort", &[less], true).unwrap();
    assert_eq!(
        sorted.as_sequence().unwrap().snapshot(),
        vec![Value::Number(1.0), Value::Number(2.0)]
    );

    // Sort without a comparator has nothing to check
    assert!(call_method(&s, "sort", &[], true).is_ok());
}

#[test]
fn test_callback_frames_stay_sandboxed() {
    let s = sequence(vec![Value::Number(1.0)]);
    let inner = sequence(vec![Value::Number(1.0)]);
    let calls = Arc::new(AtomicUsize::new(0));
    let impure = counting_impure(&calls);

    // A pure callback trying to launder an impure one through a nested call
    let launder = Value::from(Function::pure("launder", move |frame, _| {
        call_method_in(frame, &inner, "map", &[impure.clone()])
    }));

    assert_eq!(
        call_method(&s, "map", &[launder], true),
        Err(ScriptError::PolicyViolation { method: "map" })
    );
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_runaway_callback_recursion_is_stopped() {
    // Deep nesting needs more stack than the default test thread has
    let handle = std::thread::Builder::new()
        .stack_size(64 * 1024 * 1024)
        .spawn(|| {
            let s = sequence(vec![Value::Number(1.0)]);
            let slot: Arc<OnceLock<Value>> = Arc::new(OnceLock::new());

            let target = s.clone();
            let me = slot.clone();
            let recurse = Value::from(Function::pure("recurse", move |frame, _| {
                let callback = me.get().cloned().unwrap_or_default();
                call_method_in(frame, &target, "map", &[callback])
            }));
            slot.set(recurse.clone()).unwrap();

            call_method(&s, "map", &[recurse], false)
        })
        .unwrap();

    assert_eq!(
        handle.join().unwrap(),
        Err(ScriptError::RecursionLimit {
            depth: runtime_config().max_depth + 1
        })
    );
}
