//! Sequence combinators
//!
//! Higher-order operations on sequences: join, sort, map, reduce, filter
//! and unique. None of them mutates the receiver; sort, map, filter and
//! unique return a new sequence.
//!
//! # Examples
//!
//! ```text
//! [3, 1, 2].sort()                    // [1, 2, 3]
//! [1, 2, 3].map(x => x * 2)           // [2, 4, 6]
//! [1, 2, 3].reduce((a, b) => a + b)   // 6
//! [1, 2, 2, 3, 1].unique()            // [1, 2, 3]
//! ["a", "b"].join(",")                // "a,b"
//! ```
//!
//! Traversals hold the receiver's read lock for their whole duration,
//! including while callbacks run: a slow callback blocks writers to the
//! same sequence until the combinator returns.

use crate::invoker::Invoker;
use crate::sequence_methods::{argument, receiver};
use arrayscript_core::{ExecutionFrame, ScriptResult, Value, ValueSequence};
use std::collections::BTreeSet;

/// Concatenate elements with `separator` between them
///
/// Folds with the value type's combine operator starting from Empty, so
/// the result type follows combine's coercions; an empty receiver yields
/// Empty.
pub fn join(frame: &ExecutionFrame, args: &[Value]) -> ScriptResult<Value> {
    let separator = argument(args, 0);
    let items = receiver(frame)?.read();

    let mut result = Value::Empty;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            result = result.combine(separator)?;
        }
        result = result.combine(item)?;
    }

    Ok(result)
}

/// Sort a shallow clone of the receiver
///
/// Without arguments elements are ordered by the value type's total
/// order. With a comparator, it is called as a less-than predicate
/// `comparator(a, b)`; in a sandboxed frame it must be side-effect free,
/// which is checked before sorting starts.
pub fn sort(frame: &ExecutionFrame, args: &[Value]) -> ScriptResult<Value> {
    let comparator = match args.first() {
        Some(value) => Some(value.as_function()?),
        None => None,
    };
    let invoker = match comparator {
        Some(function) => Some(Invoker::gate(frame, function, "sort")?),
        None => None,
    };

    let sorted = receiver(frame)?.shallow_clone();
    {
        let mut items = sorted.write();
        match invoker {
            None => items.sort_unstable(),
            Some(invoker) => {
                let unsorted = std::mem::take(&mut *items);
                *items = merge_sort(unsorted, &invoker)?;
            }
        }
    }

    Ok(Value::from(sorted))
}

// A user predicate may fail or be inconsistent, so comparator sorts use a
// fallible merge that never panics and stops at the first error.
fn merge_sort(mut items: Vec<Value>, invoker: &Invoker<'_>) -> ScriptResult<Vec<Value>> {
    if items.len() <= 1 {
        return Ok(items);
    }

    let right = items.split_off(items.len() / 2);
    let left = merge_sort(items, invoker)?;
    let right = merge_sort(right, invoker)?;

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();

    while let (Some(l), Some(r)) = (left.peek(), right.peek()) {
        let next = if invoker.less_than(r, l)? {
            right.next()
        } else {
            left.next()
        };
        merged.extend(next);
    }
    merged.extend(left);
    merged.extend(right);

    Ok(merged)
}

/// Apply `function` to every element, in order
///
/// The result always has the receiver's length.
pub fn map(frame: &ExecutionFrame, args: &[Value]) -> ScriptResult<Value> {
    let invoker = Invoker::gate(frame, argument(args, 0).as_function()?, "map")?;
    let items = receiver(frame)?.read();

    let result = ValueSequence::new();
    for item in items.iter() {
        result.add(invoker.call(std::slice::from_ref(item))?);
    }

    Ok(Value::from(result))
}

/// Left fold starting from Empty: `acc = function(acc, item)`
///
/// An empty receiver returns Empty without calling `function`.
pub fn reduce(frame: &ExecutionFrame, args: &[Value]) -> ScriptResult<Value> {
    let invoker = Invoker::gate(frame, argument(args, 0).as_function()?, "reduce")?;
    let items = receiver(frame)?.read();

    let mut acc = Value::Empty;
    for item in items.iter() {
        acc = invoker.call(&[acc, item.clone()])?;
    }

    Ok(acc)
}

/// Keep the elements for which `function` returns a truthy value
///
/// Relative order is preserved; kept elements are the originals, not the
/// callback results.
pub fn filter(frame: &ExecutionFrame, args: &[Value]) -> ScriptResult<Value> {
    let invoker = Invoker::gate(frame, argument(args, 0).as_function()?, "filter")?;
    let items = receiver(frame)?.read();

    let result = ValueSequence::new();
    for item in items.iter() {
        if invoker.call(std::slice::from_ref(item))?.is_truthy() {
            result.add(item.clone());
        }
    }

    Ok(Value::from(result))
}

/// Distinct elements in ascending order (not insertion order)
pub fn unique(frame: &ExecutionFrame, _args: &[Value]) -> ScriptResult<Value> {
    let items = receiver(frame)?.read();
    let set: BTreeSet<Value> = items.iter().cloned().collect();
    Ok(Value::from(ValueSequence::from_set(set)))
}
