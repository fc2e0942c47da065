//! Sandbox gate and isolated callback invocation
//!
//! An [`Invoker`] can only be obtained through [`Invoker::gate`], which
//! applies the sandbox policy: a sandboxed frame may only run callbacks
//! declared side-effect free. Combinators gate their callback before
//! touching the receiver, so a rejected callback never visits an element.
//!
//! Each [`Invoker::call`] runs the callback in a fresh frame derived from
//! the caller's (see `ExecutionFrame::isolated`), so locals and receiver
//! bindings never leak from one element to the next. Callback errors are
//! returned unchanged.

use crate::config::runtime_config;
use arrayscript_core::{ExecutionFrame, Function, ScriptError, ScriptResult, Value};
use tracing::{debug, warn};

/// A callback that passed the sandbox gate for one combinator call
#[derive(Debug)]
pub struct Invoker<'a> {
    frame: &'a ExecutionFrame,
    function: &'a Function,
    method: &'static str,
}

impl<'a> Invoker<'a> {
    /// Apply the sandbox policy to `function` on behalf of `method`
    pub fn gate(
        frame: &'a ExecutionFrame,
        function: &'a Function,
        method: &'static str,
    ) -> ScriptResult<Self> {
        if frame.sandboxed && !function.is_side_effect_free() {
            warn!(
                method,
                function = function.name(),
                "sandboxed frame rejected callback that is not side-effect free"
            );
            return Err(ScriptError::PolicyViolation { method });
        }
        Ok(Self {
            frame,
            function,
            method,
        })
    }

    /// Invoke the callback once in a fresh, isolated frame
    pub fn call(&self, args: &[Value]) -> ScriptResult<Value> {
        let mut callback_frame = self.frame.isolated();
        let limit = runtime_config().max_depth;
        if callback_frame.depth > limit {
            return Err(ScriptError::RecursionLimit {
                depth: callback_frame.depth,
            });
        }

        self.function
            .invoke(&mut callback_frame, args)
            .inspect_err(|err| {
                debug!(
                    method = self.method,
                    function = self.function.name(),
                    error = %err,
                    "callback failed, aborting combinator"
                )
            })
    }

    /// Invoke the callback as a binary less-than predicate
    pub fn less_than(&self, a: &Value, b: &Value) -> ScriptResult<bool> {
        Ok(self.call(&[a.clone(), b.clone()])?.is_truthy())
    }
}
