//! Script Error Handling
//!
//! Every fallible operation in the runtime returns `ScriptResult<T>`.
//! Errors are detected synchronously at the point of violation and travel
//! back to the script caller through `?`.
//!
//! Errors raised inside a user callback are never wrapped or rewritten:
//! a combinator that drives the callback returns exactly the error the
//! callback produced and discards any partial result.

use std::fmt;

/// Argument count accepted by a native method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly `n` arguments
    Exact(usize),
    /// Between `min` and `max` arguments (inclusive)
    Range { min: usize, max: usize },
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            Arity::Exact(n) => count == n,
            Arity::Range { min, max } => (min..=max).contains(&count),
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "{}", n),
            Arity::Range { min, max } => write!(f, "{} to {}", min, max),
        }
    }
}

/// Error produced while running a native method or a user callback
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptError {
    /// Index outside `[0, len)` passed to get/set/remove
    IndexOutOfRange { index: i64, len: usize },
    /// Sandboxed frame supplied a callback not declared side-effect free
    PolicyViolation { method: &'static str },
    /// Error raised by script code (typically from inside a callback)
    Raised(String),
    /// Argument of the wrong type
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    /// Wrong number of arguments for a native method
    ArityMismatch {
        method: String,
        expected: Arity,
        found: usize,
    },
    /// The combine operator is not defined for these operands
    InvalidOperands {
        op: &'static str,
        lhs: &'static str,
        rhs: &'static str,
    },
    /// No prototype entry under this name
    UnknownMethod {
        type_name: &'static str,
        method: String,
    },
    /// Callbacks nested deeper than the configured limit
    RecursionLimit { depth: usize },
}

impl ScriptError {
    /// Convenience constructor for errors raised by script code
    pub fn raised(msg: impl Into<String>) -> Self {
        ScriptError::Raised(msg.into())
    }
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::IndexOutOfRange { index, len } => {
                write!(f, "Index {} is out of range for length {}", index, len)
            }
            ScriptError::PolicyViolation { method } => {
                let mut chars = method.chars();
                match chars.next() {
                    Some(first) => write!(
                        f,
                        "{}{} function must be side-effect free.",
                        first.to_uppercase(),
                        chars.as_str()
                    ),
                    None => write!(f, "Function must be side-effect free."),
                }
            }
            ScriptError::Raised(msg) => write!(f, "{}", msg),
            ScriptError::TypeMismatch { expected, found } => {
                write!(f, "Expected {}, got {}", expected, found)
            }
            ScriptError::ArityMismatch {
                method,
                expected,
                found,
            } => write!(
                f,
                "Function '{}' expects {} argument(s), got {}",
                method, expected, found
            ),
            ScriptError::InvalidOperands { op, lhs, rhs } => write!(
                f,
                "Operator {} cannot be applied to values of type '{}' and '{}'",
                op, lhs, rhs
            ),
            ScriptError::UnknownMethod { type_name, method } => {
                write!(f, "Invalid field access (for value of type '{}'): '{}'", type_name, method)
            }
            ScriptError::RecursionLimit { depth } => write!(
                f,
                "Stack overflow while evaluating expression: depth {} exceeds limit",
                depth
            ),
        }
    }
}

impl std::error::Error for ScriptError {}

pub type ScriptResult<T> = Result<T, ScriptError>;
