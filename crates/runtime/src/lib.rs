//! arrayscript Runtime: the built-in method surface of script sequences
//!
//! Key design principles:
//! - Prototype: one immutable name -> native method table per process
//! - Frames: every native method receives its receiver and sandbox flag
//!   explicitly through an `ExecutionFrame`
//! - Sandbox: callbacks from sandboxed frames must be side-effect free
//! - Locking: traversals hold the receiver's read lock for their whole
//!   duration; mutators take the write lock

pub mod config;
pub mod dispatch;
pub mod invoker;
pub mod list_ops;
pub mod logging;
pub mod prototype;
pub mod sequence_methods;

// Re-export the value model so hosts need a single dependency
pub use arrayscript_core::{
    Arity, ExecutionFrame, Function, Mapping, ScriptError, ScriptObject, ScriptResult, Value,
    ValueSequence,
};

pub use config::{RuntimeConfig, runtime_config};
pub use dispatch::{bind_method, call_method, call_method_default, call_method_in, resolve};
pub use invoker::Invoker;
pub use prototype::{NativeFn, NativeMethod, PrototypeRegistry, prototype_registry};
