//! arrayscript Core: the value model shared by the runtime
//!
//! This crate provides the data side of the scripting runtime. The method
//! surface (prototype table, sandbox gate, combinators) lives in
//! `arrayscript-runtime`.
//!
//! # Modules
//!
//! - `error`: `ScriptError`, `ScriptResult` and method arity
//! - `value`: the dynamic `Value` enum with its order and combine operator
//! - `sequence`: `ValueSequence`, the lock-guarded shared container
//! - `mapping`: `Mapping` dictionaries and opaque `ScriptObject` references
//! - `function`: callable values with a declared purity flag
//! - `frame`: per-call `ExecutionFrame`

pub mod error;
pub mod frame;
pub mod function;
pub mod mapping;
pub mod sequence;
pub mod value;

// Re-export key types
pub use error::{Arity, ScriptError, ScriptResult};
pub use frame::ExecutionFrame;
pub use function::{Function, FunctionBody};
pub use mapping::{Mapping, ScriptObject};
pub use sequence::{SequenceReadGuard, SequenceWriteGuard, ValueSequence};
pub use value::Value;
