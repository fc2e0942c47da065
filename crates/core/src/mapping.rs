//! Mapping and object references
//!
//! These round out the value model. The sequence methods only need their
//! identity, truthiness and combine behavior.

use crate::value::{FormatGuard, Value};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fmt;

/// String-keyed dictionary with identity distinct from content
///
/// Keys are kept ordered so enumeration is deterministic.
#[derive(Default)]
pub struct Mapping {
    entries: RwLock<BTreeMap<String, Value>>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.entries.read_recursive().get(key).cloned()
    }

    pub fn set(&self, key: impl Into<String>, value: Value) {
        self.entries.write().insert(key.into(), value);
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        self.entries.write().remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.read_recursive().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.read_recursive().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read_recursive().is_empty()
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.read_recursive().keys().cloned().collect()
    }

    /// Key/value pairs in key order, copied under the read lock
    pub fn entries(&self) -> Vec<(String, Value)> {
        self.entries
            .read_recursive()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn shallow_clone(&self) -> Mapping {
        Mapping {
            entries: RwLock::new(self.entries.read_recursive().clone()),
        }
    }
}

impl fmt::Debug for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(_visiting) = FormatGuard::enter(self as *const Self as usize) else {
            return f.write_str("{...}");
        };
        f.debug_map()
            .entries(self.entries.read_recursive().iter())
            .finish()
    }
}

/// Opaque reference to a host object (a configuration object, a checkable, ...)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptObject {
    type_name: String,
    name: String,
}

impl ScriptObject {
    pub fn new(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            name: name.into(),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
