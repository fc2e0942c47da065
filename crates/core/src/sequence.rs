//! ValueSequence: the shared, mutable ordered container behind script arrays
//!
//! A `ValueSequence` is always reached through `Arc<ValueSequence>` (see
//! `Value::Sequence`), so any number of interpreter threads may hold the
//! same container at once. Every operation synchronizes on one internal
//! read/write lock.
//!
//! # Locking discipline
//!
//! | Operation | Lock |
//! |-----------|------|
//! | `len`, `get`, `contains`, `snapshot` | shared (read) |
//! | `shallow_clone`, `reverse` | shared, for the whole copy |
//! | `set`, `add`, `remove`, `clear` | exclusive (write) |
//! | combinator traversals | shared via [`ValueSequence::read`], held for the whole traversal |
//!
//! The first read guard a thread takes on a sequence is fair: it queues
//! behind a waiting writer, so steady read traffic cannot starve `add` or
//! `set`. Further read guards taken by a thread that already holds one on
//! the same sequence (for example a `map` callback reading `len()` of the
//! sequence it is traversed from) are recursive and never wait for a
//! queued writer, since that writer is itself waiting on the outer guard.
//! Write guards are not reentrant. A callback that mutates the sequence
//! it is being traversed from deadlocks; this is the caller's
//! responsibility and is not detected.
//!
//! The lock never poisons, so a panicking callback does not leave the
//! container unusable for other threads.

use crate::error::{ScriptError, ScriptResult};
use crate::value::{FormatGuard, Value};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fmt;
use std::ops::Deref;

thread_local! {
    // Sequences the current thread holds a read guard on, by address
    static HELD_READS: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
}

/// Read guard over the elements, held for a whole traversal
pub struct SequenceReadGuard<'a> {
    items: RwLockReadGuard<'a, Vec<Value>>,
    address: usize,
}

impl Deref for SequenceReadGuard<'_> {
    type Target = Vec<Value>;

    fn deref(&self) -> &Vec<Value> {
        &self.items
    }
}

impl Drop for SequenceReadGuard<'_> {
    fn drop(&mut self) {
        let _ = HELD_READS.try_with(|held| {
            let mut held = held.borrow_mut();
            if let Some(pos) = held.iter().rposition(|&a| a == self.address) {
                held.swap_remove(pos);
            }
        });
    }
}

/// Write guard over the elements
pub type SequenceWriteGuard<'a> = RwLockWriteGuard<'a, Vec<Value>>;

/// Ordered, mutable sequence of values with identity distinct from content
#[derive(Default)]
pub struct ValueSequence {
    items: RwLock<Vec<Value>>,
}

impl ValueSequence {
    /// Create an empty sequence
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sequence owning the given elements
    pub fn from_values(values: Vec<Value>) -> Self {
        Self {
            items: RwLock::new(values),
        }
    }

    /// Create a sequence enumerating a set in ascending order
    pub fn from_set(set: BTreeSet<Value>) -> Self {
        Self::from_values(set.into_iter().collect())
    }

    /// Acquire the shared lock for a traversal
    ///
    /// The guard must be held for the entire traversal so that no
    /// mutation can interleave with it.
    pub fn read(&self) -> SequenceReadGuard<'_> {
        let address = self.address();
        let nested = HELD_READS.with_borrow(|held| held.contains(&address));
        let items = if nested {
            self.items.read_recursive()
        } else {
            self.items.read()
        };
        HELD_READS.with_borrow_mut(|held| held.push(address));
        SequenceReadGuard { items, address }
    }

    /// Acquire the exclusive lock
    pub fn write(&self) -> SequenceWriteGuard<'_> {
        self.items.write()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Get element `index`
    ///
    /// Fails with `IndexOutOfRange` unless `0 <= index < len`.
    pub fn get(&self, index: i64) -> ScriptResult<Value> {
        let items = self.read();
        let idx = checked_index(index, items.len())?;
        Ok(items[idx].clone())
    }

    /// Replace element `index`
    pub fn set(&self, index: i64, value: Value) -> ScriptResult<()> {
        let mut items = self.write();
        let idx = checked_index(index, items.len())?;
        items[idx] = value;
        Ok(())
    }

    /// Append a value
    pub fn add(&self, value: Value) {
        self.write().push(value);
    }

    /// Delete element `index`, shifting later elements down
    ///
    /// Returns the removed value.
    pub fn remove(&self, index: i64) -> ScriptResult<Value> {
        let mut items = self.write();
        let idx = checked_index(index, items.len())?;
        Ok(items.remove(idx))
    }

    /// Linear membership scan using value equality
    pub fn contains(&self, value: &Value) -> bool {
        self.read().iter().any(|item| item == value)
    }

    pub fn clear(&self) {
        self.write().clear();
    }

    /// New container with the same element references and a new identity
    pub fn shallow_clone(&self) -> ValueSequence {
        ValueSequence::from_values(self.snapshot())
    }

    /// New container with the elements in reverse order
    ///
    /// The receiver is left untouched.
    pub fn reverse(&self) -> ValueSequence {
        let items = self.read();
        ValueSequence::from_values(items.iter().rev().cloned().collect())
    }

    /// Copy of the current elements, taken under the shared lock
    pub fn snapshot(&self) -> Vec<Value> {
        self.read().clone()
    }

    fn address(&self) -> usize {
        self as *const Self as usize
    }
}

impl fmt::Debug for ValueSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(_visiting) = FormatGuard::enter(self.address()) else {
            return f.write_str("[...]");
        };
        f.debug_list().entries(self.read().iter()).finish()
    }
}

impl From<Vec<Value>> for ValueSequence {
    fn from(values: Vec<Value>) -> Self {
        ValueSequence::from_values(values)
    }
}

fn checked_index(index: i64, len: usize) -> ScriptResult<usize> {
    usize::try_from(index)
        .ok()
        .filter(|&idx| idx < len)
        .ok_or(ScriptError::IndexOutOfRange { index, len })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    fn numbers(values: &[f64]) -> ValueSequence {
        ValueSequence::from_values(values.iter().map(|&n| Value::Number(n)).collect())
    }

    #[test]
    fn test_get_after_set() {
        let seq = numbers(&[1.0, 2.0, 3.0]);
        seq.set(1, Value::from("two")).unwrap();
        assert_eq!(seq.get(1).unwrap(), Value::from("two"));
        assert_eq!(seq.len(), 3);
    }

    #[test]
    fn test_out_of_range_indices() {
        let seq = numbers(&[1.0, 2.0]);
        for index in [-1, 2, 100, i64::MIN] {
            assert_eq!(
                seq.get(index),
                Err(ScriptError::IndexOutOfRange { index, len: 2 })
            );
            assert!(seq.set(index, Value::Empty).is_err());
            assert!(seq.remove(index).is_err());
        }
        // Failed mutations leave the container unchanged
        assert_eq!(seq.snapshot(), vec![Value::Number(1.0), Value::Number(2.0)]);
    }

    #[test]
    fn test_empty_sequence_rejects_index_zero() {
        let seq = ValueSequence::new();
        assert!(seq.get(0).is_err());
        assert!(seq.is_empty());
    }

    #[test]
    fn test_remove_shifts_elements() {
        let seq = numbers(&[1.0, 2.0, 3.0]);
        assert_eq!(seq.remove(0).unwrap(), Value::Number(1.0));
        assert_eq!(seq.snapshot(), vec![Value::Number(2.0), Value::Number(3.0)]);
    }

    #[test]
    fn test_add_contains_clear() {
        let seq = ValueSequence::new();
        seq.add(Value::from("a"));
        seq.add(Value::Number(4.0));
        assert!(seq.contains(&Value::from("a")));
        assert!(seq.contains(&Value::Number(4.0)));
        assert!(!seq.contains(&Value::from("b")));
        seq.clear();
        assert_eq!(seq.len(), 0);
    }

    #[test]
    fn test_shallow_clone_shares_elements_not_identity() {
        let inner = std::sync::Arc::new(ValueSequence::new());
        let seq = ValueSequence::from_values(vec![Value::Sequence(inner.clone())]);
        let copy = seq.shallow_clone();

        copy.add(Value::Number(1.0));
        assert_eq!(seq.len(), 1);
        assert_eq!(copy.len(), 2);

        // Same element reference in both containers
        inner.add(Value::Boolean(true));
        match copy.get(0).unwrap() {
            Value::Sequence(shared) => assert_eq!(shared.len(), 1),
            other => panic!("Expected Sequence, got {:?}", other),
        }
    }

    #[test]
    fn test_reverse_leaves_receiver() {
        let seq = numbers(&[1.0, 2.0, 3.0]);
        let reversed = seq.reverse();
        assert_eq!(
            reversed.snapshot(),
            vec![Value::Number(3.0), Value::Number(2.0), Value::Number(1.0)]
        );
        assert_eq!(seq.get(0).unwrap(), Value::Number(1.0));
    }

    #[test]
    fn test_nested_read_passes_queued_writer() {
        let seq = numbers(&[1.0, 2.0]);
        thread::scope(|scope| {
            let guard = seq.read();
            let writer = scope.spawn(|| seq.add(Value::Number(3.0)));
            thread::sleep(Duration::from_millis(50));

            // Same thread already traversing: must not wait for the writer
            assert_eq!(seq.len(), 2);
            assert_eq!(guard.len(), 2);

            drop(guard);
            writer.join().unwrap();
        });
        assert_eq!(seq.len(), 3);
    }

    #[test]
    fn test_fresh_reader_waits_for_queued_writer() {
        let seq = numbers(&[1.0, 2.0]);
        thread::scope(|scope| {
            let guard = seq.read();
            let writer = scope.spawn(|| seq.add(Value::Number(3.0)));
            thread::sleep(Duration::from_millis(50));

            let (seen_tx, seen_rx) = mpsc::channel();
            let shared = &seq;
            let reader = scope.spawn(move || seen_tx.send(shared.len()));
            thread::sleep(Duration::from_millis(50));
            assert!(seen_rx.try_recv().is_err(), "reader jumped the writer queue");

            drop(guard);
            writer.join().unwrap();
            reader.join().unwrap().unwrap();
            assert_eq!(seen_rx.recv().unwrap(), 3);
        });
    }

    #[test]
    fn test_read_bookkeeping_released_on_drop() {
        let seq = numbers(&[1.0]);
        drop(seq.read());
        assert!(!HELD_READS.with_borrow(|held| held.contains(&seq.address())));
        // A later writer on this thread is not blocked by stale state
        seq.add(Value::Number(2.0));
        assert_eq!(seq.len(), 2);
    }

    #[test]
    fn test_recursive_read_while_traversing() {
        let seq = numbers(&[1.0, 2.0]);
        let guard = seq.read();
        // Nested reads from the same thread do not block
        assert_eq!(seq.len(), guard.len());
        assert!(seq.contains(&Value::Number(2.0)));
    }
}
