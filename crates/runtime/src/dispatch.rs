//! Method dispatch
//!
//! Resolves a method name against the receiver's prototype, binds an
//! `ExecutionFrame` to the receiver and runs the native implementation.
//! Frames are always explicit: a call made from inside a running callback
//! goes through [`call_method_in`] so the sandbox flag and nesting depth
//! carry over.

use crate::config::runtime_config;
use crate::prototype::{NativeMethod, prototype_registry};
use arrayscript_core::{ExecutionFrame, Function, ScriptError, ScriptResult, Value};
use tracing::trace;

/// Find the native method `name` for `receiver`
///
/// Only sequences have a prototype; any other receiver is a miss.
pub fn resolve(receiver: &Value, name: &str) -> ScriptResult<&'static NativeMethod> {
    let unknown = || ScriptError::UnknownMethod {
        type_name: receiver.type_name(),
        method: name.to_string(),
    };

    match receiver {
        Value::Sequence(_) => prototype_registry().get(name).ok_or_else(unknown),
        _ => Err(unknown()),
    }
}

/// Call `receiver.name(args...)` in a new top-level frame
pub fn call_method(
    receiver: &Value,
    name: &str,
    args: &[Value],
    sandboxed: bool,
) -> ScriptResult<Value> {
    let frame = ExecutionFrame::new(receiver.clone(), sandboxed);
    dispatch(&frame, name, args)
}

/// Call `receiver.name(args...)` from inside a running frame
pub fn call_method_in(
    caller: &ExecutionFrame,
    receiver: &Value,
    name: &str,
    args: &[Value],
) -> ScriptResult<Value> {
    let frame = caller.bound(receiver.clone());
    dispatch(&frame, name, args)
}

/// Call with the sandbox flag from the runtime configuration
pub fn call_method_default(receiver: &Value, name: &str, args: &[Value]) -> ScriptResult<Value> {
    call_method(receiver, name, args, runtime_config().sandboxed)
}

fn dispatch(frame: &ExecutionFrame, name: &str, args: &[Value]) -> ScriptResult<Value> {
    let method = resolve(&frame.receiver, name)?;
    trace!(
        method = name,
        argc = args.len(),
        sandboxed = frame.sandboxed,
        depth = frame.depth,
        "dispatching sequence method"
    );
    method.call(frame, args)
}

/// Bind a native method to `receiver` as a callable value
///
/// The resulting function carries the native method's purity flag, so a
/// bound pure method (e.g. `contains`) may be passed as a callback from a
/// sandboxed frame while a bound mutator (e.g. `add`) may not.
pub fn bind_method(receiver: &Value, name: &str) -> ScriptResult<Function> {
    let method = resolve(receiver, name)?;
    let bound = receiver.clone();
    let body = move |frame: &mut ExecutionFrame, args: &[Value]| {
        method.call(&frame.bound(bound.clone()), args)
    };

    Ok(if method.side_effect_free {
        Function::pure(method.name, body)
    } else {
        Function::new(method.name, body)
    })
}
