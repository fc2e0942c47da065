//! Sequence prototype registry
//!
//! Maps method names to native implementations for every sequence value.
//! The table is built on first use, exactly once per process, and is never
//! mutated afterwards; concurrent first lookups all observe the same
//! instance.
//!
//! | Method | Arity | Side-effect free |
//! |--------|-------|------------------|
//! | `len()` | 0 | yes |
//! | `set(index, value)` | 2 | no |
//! | `get(index)` | 1 | no |
//! | `add(value)` | 1 | no |
//! | `remove(index)` | 1 | no |
//! | `contains(value)` | 1 | yes |
//! | `clear()` | 0 | no |
//! | `sort([comparator])` | 0-1 | yes |
//! | `shallow_clone()` | 0 | yes |
//! | `join(separator)` | 1 | yes |
//! | `reverse()` | 0 | yes |
//! | `map(function)` | 1 | yes |
//! | `reduce(function)` | 1 | yes |
//! | `filter(function)` | 1 | yes |
//! | `unique()` | 0 | yes |

use crate::list_ops;
use crate::sequence_methods;
use arrayscript_core::{Arity, ExecutionFrame, ScriptError, ScriptResult, Value};
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::debug;

/// Native implementation: receiver and sandbox flag come from the frame
pub type NativeFn = fn(&ExecutionFrame, &[Value]) -> ScriptResult<Value>;

/// A named, fixed-arity native method with a declared purity flag
#[derive(Debug, Clone, Copy)]
pub struct NativeMethod {
    pub name: &'static str,
    pub arity: Arity,
    /// Whether the method is safe to run as a callback in a sandboxed frame
    pub side_effect_free: bool,
    implementation: NativeFn,
}

impl NativeMethod {
    pub const fn new(
        name: &'static str,
        arity: Arity,
        side_effect_free: bool,
        implementation: NativeFn,
    ) -> Self {
        Self {
            name,
            arity,
            side_effect_free,
            implementation,
        }
    }

    /// Check the argument count, then run the implementation in `frame`
    pub fn call(&self, frame: &ExecutionFrame, args: &[Value]) -> ScriptResult<Value> {
        if !self.arity.accepts(args.len()) {
            return Err(ScriptError::ArityMismatch {
                method: self.name.to_string(),
                expected: self.arity,
                found: args.len(),
            });
        }
        (self.implementation)(frame, args)
    }
}

/// Immutable name -> method table shared by every sequence
#[derive(Debug)]
pub struct PrototypeRegistry {
    methods: HashMap<&'static str, NativeMethod>,
}

impl PrototypeRegistry {
    fn from_methods(methods: impl IntoIterator<Item = NativeMethod>) -> Self {
        Self {
            methods: methods.into_iter().map(|m| (m.name, m)).collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&NativeMethod> {
        self.methods.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Method names in sorted order
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.methods.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

static SEQUENCE_PROTOTYPE: OnceLock<PrototypeRegistry> = OnceLock::new();

/// Get the sequence prototype, building it on first use
pub fn prototype_registry() -> &'static PrototypeRegistry {
    SEQUENCE_PROTOTYPE.get_or_init(build_sequence_prototype)
}

fn build_sequence_prototype() -> PrototypeRegistry {
    use Arity::{Exact, Range};

    let registry = PrototypeRegistry::from_methods([
        NativeMethod::new("len", Exact(0), true, sequence_methods::len),
        NativeMethod::new("set", Exact(2), false, sequence_methods::set),
        NativeMethod::new("get", Exact(1), false, sequence_methods::get),
        NativeMethod::new("add", Exact(1), false, sequence_methods::add),
        NativeMethod::new("remove", Exact(1), false, sequence_methods::remove),
        NativeMethod::new("contains", Exact(1), true, sequence_methods::contains),
        NativeMethod::new("clear", Exact(0), false, sequence_methods::clear),
        NativeMethod::new("sort", Range { min: 0, max: 1 }, true, list_ops::sort),
        NativeMethod::new("shallow_clone", Exact(0), true, sequence_methods::shallow_clone),
        NativeMethod::new("join", Exact(1), true, list_ops::join),
        NativeMethod::new("reverse", Exact(0), true, sequence_methods::reverse),
        NativeMethod::new("map", Exact(1), true, list_ops::map),
        NativeMethod::new("reduce", Exact(1), true, list_ops::reduce),
        NativeMethod::new("filter", Exact(1), true, list_ops::filter),
        NativeMethod::new("unique", Exact(0), true, list_ops::unique),
    ]);

    debug!(methods = registry.len(), "built sequence prototype");
    registry
}
