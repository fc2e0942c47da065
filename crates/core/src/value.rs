use crate::error::{ScriptError, ScriptResult};
use crate::function::Function;
use crate::mapping::{Mapping, ScriptObject};
use crate::sequence::ValueSequence;
use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Value: the dynamic data type scripts talk about
///
/// Scalars are stored inline. Containers, functions and objects are
/// reference types: cloning a `Value` clones the `Arc`, never the
/// referenced data, and equality between references is identity.
///
/// # Ordering
///
/// `Value` has a total order so it can be sorted and collected into
/// ordered sets. Values of different tags order by tag rank
/// (`Empty < Boolean < Number < String < Sequence < Mapping < Function <
/// Object`). Within a tag:
/// - numbers compare numerically, `-0 == 0`, NaN equals NaN and sorts
///   above every other number
/// - strings compare by bytes
/// - reference tags compare by allocation address
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// Absent value; also the neutral starting point of join and reduce
    #[default]
    Empty,

    Boolean(bool),

    /// IEEE 754 double; scripts have a single numeric type
    Number(f64),

    String(Arc<str>),

    /// Shared mutable sequence (identity semantics)
    Sequence(Arc<ValueSequence>),

    /// Shared mutable string-keyed mapping (identity semantics)
    Mapping(Arc<Mapping>),

    /// Callable, either a user function or a bound native method
    Function(Arc<Function>),

    /// Opaque host object reference
    Object(Arc<ScriptObject>),
}

impl Value {
    fn rank(&self) -> u8 {
        match self {
            Value::Empty => 0,
            Value::Boolean(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Sequence(_) => 4,
            Value::Mapping(_) => 5,
            Value::Function(_) => 6,
            Value::Object(_) => 7,
        }
    }

    /// Type name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Empty => "Empty",
            Value::Boolean(_) => "Boolean",
            Value::Number(_) => "Number",
            Value::String(_) => "String",
            Value::Sequence(_) => "Array",
            Value::Mapping(_) => "Dictionary",
            Value::Function(_) => "Function",
            Value::Object(_) => "Object",
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }

    /// Script truthiness
    ///
    /// Empty, `false`, zero, NaN and the empty string are false;
    /// every reference value is true.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Empty => false,
            Value::Boolean(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Sequence(_) | Value::Mapping(_) | Value::Function(_) | Value::Object(_) => true,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Arc<ValueSequence>> {
        match self {
            Value::Sequence(seq) => Some(seq),
            _ => None,
        }
    }

    /// Convert a script argument to a container index
    ///
    /// Numbers are truncated toward zero. Range checking is left to the
    /// container, which knows its length under its own lock.
    pub fn as_index(&self) -> ScriptResult<i64> {
        match self {
            Value::Number(n) if n.is_finite() => Ok(n.trunc() as i64),
            Value::Number(_) => Err(ScriptError::TypeMismatch {
                expected: "finite Number",
                found: "Number",
            }),
            other => Err(ScriptError::TypeMismatch {
                expected: "Number",
                found: other.type_name(),
            }),
        }
    }

    /// Convert a script argument to a callable
    pub fn as_function(&self) -> ScriptResult<&Arc<Function>> {
        match self {
            Value::Function(function) => Ok(function),
            other => Err(ScriptError::TypeMismatch {
                expected: "Function",
                found: other.type_name(),
            }),
        }
    }

    /// Binary combine (`+`)
    ///
    /// - Empty + Empty is Empty
    /// - numbers add; Empty counts as 0
    /// - if either side is a string, scalar operands concatenate as text
    ///   (Empty is the empty string)
    /// - sequence + sequence and mapping + mapping produce new containers;
    ///   an Empty operand counts as an empty container of the other's kind
    pub fn combine(&self, other: &Value) -> ScriptResult<Value> {
        match (self, other) {
            (Value::Empty, Value::Empty) => Ok(Value::Empty),
            (Value::Number(_) | Value::Empty, Value::Number(_) | Value::Empty) => {
                Ok(Value::Number(self.numeric() + other.numeric()))
            }
            (lhs, rhs)
                if (matches!(lhs, Value::String(_)) || matches!(rhs, Value::String(_)))
                    && lhs.is_scalar()
                    && rhs.is_scalar() =>
            {
                Ok(Value::from(format!("{}{}", lhs, rhs)))
            }
            (Value::Sequence(_) | Value::Empty, Value::Sequence(_) | Value::Empty) => {
                let mut items = Vec::new();
                for side in [self, other] {
                    if let Value::Sequence(seq) = side {
                        items.extend(seq.snapshot());
                    }
                }
                Ok(Value::from(ValueSequence::from_values(items)))
            }
            (Value::Mapping(_) | Value::Empty, Value::Mapping(_) | Value::Empty) => {
                let merged = Mapping::new();
                for side in [self, other] {
                    if let Value::Mapping(map) = side {
                        for (key, value) in map.entries() {
                            merged.set(key, value);
                        }
                    }
                }
                Ok(Value::from(merged))
            }
            _ => Err(ScriptError::InvalidOperands {
                op: "+",
                lhs: self.type_name(),
                rhs: other.type_name(),
            }),
        }
    }

    fn numeric(&self) -> f64 {
        self.as_number().unwrap_or(0.0)
    }

    fn is_scalar(&self) -> bool {
        matches!(
            self,
            Value::Empty | Value::Boolean(_) | Value::Number(_) | Value::String(_)
        )
    }
}

fn address<T: ?Sized>(ptr: &Arc<T>) -> usize {
    Arc::as_ptr(ptr) as *const () as usize
}

thread_local! {
    static FORMATTING: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
}

/// Marks a container as being formatted on the current thread
///
/// A container that (directly or indirectly) contains itself prints a
/// placeholder the second time it is reached instead of recursing.
pub(crate) struct FormatGuard(usize);

impl FormatGuard {
    /// `None` if the container at `address` is already being formatted
    pub(crate) fn enter(address: usize) -> Option<Self> {
        FORMATTING.with_borrow_mut(|active| {
            if active.contains(&address) {
                None
            } else {
                active.push(address);
                Some(FormatGuard(address))
            }
        })
    }
}

impl Drop for FormatGuard {
    fn drop(&mut self) {
        let _ = FORMATTING.try_with(|active| active.borrow_mut().retain(|&a| a != self.0));
    }
}

fn compare_numbers(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b)
        .unwrap_or_else(|| a.is_nan().cmp(&b.is_nan()))
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Empty, Value::Empty) => Ordering::Equal,
            (Value::Boolean(a), Value::Boolean(b)) => a.cmp(b),
            (Value::Number(a), Value::Number(b)) => compare_numbers(*a, *b),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::Sequence(a), Value::Sequence(b)) => address(a).cmp(&address(b)),
            (Value::Mapping(a), Value::Mapping(b)) => address(a).cmp(&address(b)),
            (Value::Function(a), Value::Function(b)) => address(a).cmp(&address(b)),
            (Value::Object(a), Value::Object(b)) => address(a).cmp(&address(b)),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Equality is "compares Equal", so sets and membership agree with sorting
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Empty => Ok(()),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::String(s) => write!(f, "{}", s),
            Value::Sequence(seq) => {
                let Some(_visiting) = FormatGuard::enter(address(seq)) else {
                    return f.write_str("[...]");
                };
                write!(f, "[")?;
                for (i, item) in seq.read().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    match item {
                        Value::String(s) => write!(f, "{:?}", s)?,
                        other => write!(f, "{}", other)?,
                    }
                }
                write!(f, "]")
            }
            Value::Mapping(map) => {
                let Some(_visiting) = FormatGuard::enter(address(map)) else {
                    return f.write_str("{...}");
                };
                write!(f, "{{")?;
                for (i, (key, value)) in map.entries().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
            Value::Function(function) => write!(f, "Function '{}'", function.name()),
            Value::Object(object) => {
                write!(f, "Object '{}' ({})", object.name(), object.type_name())
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Arc::from(s))
    }
}

impl From<ValueSequence> for Value {
    fn from(seq: ValueSequence) -> Self {
        Value::Sequence(Arc::new(seq))
    }
}

impl From<Arc<ValueSequence>> for Value {
    fn from(seq: Arc<ValueSequence>) -> Self {
        Value::Sequence(seq)
    }
}

impl From<Mapping> for Value {
    fn from(map: Mapping) -> Self {
        Value::Mapping(Arc::new(map))
    }
}

impl From<Function> for Value {
    fn from(function: Function) -> Self {
        Value::Function(Arc::new(function))
    }
}

impl From<ScriptObject> for Value {
    fn from(object: ScriptObject) -> Self {
        Value::Object(Arc::new(object))
    }
}
