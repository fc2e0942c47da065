//! Execution frames
//!
//! A frame is the per-call context of a running method or callback: the
//! receiver (`self` in script terms), the sandbox flag, the nesting depth
//! and scratch locals. Frames are passed explicitly; there is no ambient
//! "current frame".

use crate::value::Value;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct ExecutionFrame {
    pub receiver: Value,
    pub sandboxed: bool,
    pub depth: usize,
    pub locals: HashMap<String, Value>,
}

impl ExecutionFrame {
    /// Top-level frame bound to `receiver`
    pub fn new(receiver: Value, sandboxed: bool) -> Self {
        Self {
            receiver,
            sandboxed,
            depth: 0,
            locals: HashMap::new(),
        }
    }

    /// Frame for a method call made from inside this frame
    ///
    /// Keeps the sandbox flag and depth; binds a new receiver.
    pub fn bound(&self, receiver: Value) -> Self {
        Self {
            receiver,
            sandboxed: self.sandboxed,
            depth: self.depth,
            locals: HashMap::new(),
        }
    }

    /// Fresh frame for one callback invocation
    ///
    /// Nothing from this frame's receiver or locals is visible in the
    /// new one. The sandbox flag is inherited, so a callback can never
    /// run unsandboxed on behalf of a sandboxed caller.
    pub fn isolated(&self) -> Self {
        Self {
            receiver: Value::Empty,
            sandboxed: self.sandboxed,
            depth: self.depth + 1,
            locals: HashMap::new(),
        }
    }
}
