//! Callable values
//!
//! A `Function` is what scripts pass to `map`, `filter`, `reduce` and
//! `sort`. It carries a declared purity flag: sandboxed frames only run
//! callbacks declared side-effect free.

use crate::error::ScriptResult;
use crate::frame::ExecutionFrame;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Native body of a function: receives its own frame and the arguments
pub type FunctionBody = dyn Fn(&mut ExecutionFrame, &[Value]) -> ScriptResult<Value> + Send + Sync;

pub struct Function {
    name: String,
    side_effect_free: bool,
    body: Arc<FunctionBody>,
}

impl Function {
    /// A function with no purity declaration
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut ExecutionFrame, &[Value]) -> ScriptResult<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            side_effect_free: false,
            body: Arc::new(body),
        }
    }

    /// A function declared side-effect free
    pub fn pure<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut ExecutionFrame, &[Value]) -> ScriptResult<Value> + Send + Sync + 'static,
    {
        Self {
            side_effect_free: true,
            ..Self::new(name, body)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_side_effect_free(&self) -> bool {
        self.side_effect_free
    }

    /// Run the body in `frame`; errors are returned unchanged
    pub fn invoke(&self, frame: &mut ExecutionFrame, args: &[Value]) -> ScriptResult<Value> {
        (self.body)(frame, args)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("side_effect_free", &self.side_effect_free)
            .finish_non_exhaustive()
    }
}
