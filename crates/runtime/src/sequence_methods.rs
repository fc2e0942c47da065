//! Basic sequence methods: len, get, set, add, remove, contains, clear,
//! shallow_clone, reverse
//!
//! Each one reads its receiver from the frame and delegates to the
//! container, which takes the right lock for the operation.

use arrayscript_core::{ExecutionFrame, ScriptError, ScriptResult, Value, ValueSequence};
use std::sync::Arc;

static MISSING: Value = Value::Empty;

/// Receiver of a sequence method
pub(crate) fn receiver(frame: &ExecutionFrame) -> ScriptResult<&Arc<ValueSequence>> {
    frame
        .receiver
        .as_sequence()
        .ok_or_else(|| ScriptError::TypeMismatch {
            expected: "Array",
            found: frame.receiver.type_name(),
        })
}

/// Positional argument; absent arguments read as Empty
pub(crate) fn argument(args: &[Value], index: usize) -> &Value {
    args.get(index).unwrap_or(&MISSING)
}

pub fn len(frame: &ExecutionFrame, _args: &[Value]) -> ScriptResult<Value> {
    Ok(Value::from(receiver(frame)?.len()))
}

pub fn set(frame: &ExecutionFrame, args: &[Value]) -> ScriptResult<Value> {
    let index = argument(args, 0).as_index()?;
    receiver(frame)?.set(index, argument(args, 1).clone())?;
    Ok(Value::Empty)
}

pub fn get(frame: &ExecutionFrame, args: &[Value]) -> ScriptResult<Value> {
    let index = argument(args, 0).as_index()?;
    receiver(frame)?.get(index)
}

pub fn add(frame: &ExecutionFrame, args: &[Value]) -> ScriptResult<Value> {
    receiver(frame)?.add(argument(args, 0).clone());
    Ok(Value::Empty)
}

pub fn remove(frame: &ExecutionFrame, args: &[Value]) -> ScriptResult<Value> {
    let index = argument(args, 0).as_index()?;
    receiver(frame)?.remove(index)?;
    Ok(Value::Empty)
}

pub fn contains(frame: &ExecutionFrame, args: &[Value]) -> ScriptResult<Value> {
    Ok(Value::Boolean(receiver(frame)?.contains(argument(args, 0))))
}

pub fn clear(frame: &ExecutionFrame, _args: &[Value]) -> ScriptResult<Value> {
    receiver(frame)?.clear();
    Ok(Value::Empty)
}

pub fn shallow_clone(frame: &ExecutionFrame, _args: &[Value]) -> ScriptResult<Value> {
    Ok(Value::from(receiver(frame)?.shallow_clone()))
}

pub fn reverse(frame: &ExecutionFrame, _args: &[Value]) -> ScriptResult<Value> {
    Ok(Value::from(receiver(frame)?.reverse()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_for(values: Vec<Value>) -> ExecutionFrame {
        ExecutionFrame::new(Value::from(ValueSequence::from_values(values)), false)
    }

    fn items(frame: &ExecutionFrame) -> Vec<Value> {
        receiver(frame).unwrap().snapshot()
    }

    #[test]
    fn test_set_then_get() {
        let frame = frame_for(vec![Value::Number(1.0), Value::Number(2.0)]);
        set(&frame, &[Value::Number(1.0), Value::from("x")]).unwrap();
        assert_eq!(get(&frame, &[Value::Number(1.0)]).unwrap(), Value::from("x"));
        assert_eq!(len(&frame, &[]).unwrap(), Value::Number(2.0));
    }

    #[test]
    fn test_index_errors() {
        let frame = frame_for(vec![Value::Number(1.0)]);
        let out_of_range = ScriptError::IndexOutOfRange { index: 1, len: 1 };
        assert_eq!(get(&frame, &[Value::Number(1.0)]), Err(out_of_range.clone()));
        assert_eq!(
            set(&frame, &[Value::Number(1.0), Value::Empty]),
            Err(out_of_range.clone())
        );
        assert_eq!(remove(&frame, &[Value::Number(1.0)]), Err(out_of_range));
        assert!(matches!(
            get(&frame, &[Value::from("0")]),
            Err(ScriptError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_add_remove_clear() {
        let frame = frame_for(vec![]);
        add(&frame, &[Value::from("a")]).unwrap();
        add(&frame, &[Value::from("b")]).unwrap();
        assert_eq!(
            contains(&frame, &[Value::from("b")]).unwrap(),
            Value::Boolean(true)
        );
        remove(&frame, &[Value::Number(0.0)]).unwrap();
        assert_eq!(items(&frame), vec![Value::from("b")]);
        clear(&frame, &[]).unwrap();
        assert!(items(&frame).is_empty());
    }

    #[test]
    fn test_clone_and_reverse_return_new_sequences() {
        let frame = frame_for(vec![Value::Number(1.0), Value::Number(2.0)]);
        let reversed = reverse(&frame, &[]).unwrap();
        let cloned = shallow_clone(&frame, &[]).unwrap();

        assert_eq!(
            reversed.as_sequence().unwrap().snapshot(),
            vec![Value::Number(2.0), Value::Number(1.0)]
        );
        assert_ne!(cloned, frame.receiver);
        assert_eq!(cloned.as_sequence().unwrap().snapshot(), items(&frame));
    }

    #[test]
    fn test_non_sequence_receiver() {
        let frame = ExecutionFrame::new(Value::Number(1.0), false);
        assert_eq!(
            len(&frame, &[]),
            Err(ScriptError::TypeMismatch {
                expected: "Array",
                found: "Number"
            })
        );
    }
}
