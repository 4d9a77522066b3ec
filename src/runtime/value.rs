use std::{fmt, rc::Rc};

/// Heap-resident runtime value.
///
/// Values are immutable after construction and never reference one
/// another; every variant is a leaf as far as the collector is concerned.
/// The mark bit lives in the owning heap slot, not here.
///
/// Using `Rc<str>` instead of `String` makes cloning a string value O(1).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// 64-bit floating point number.
    Number(f64),
    /// UTF-8 string value.
    Str(Rc<str>),
    /// Boolean value.
    Boolean(bool),
    /// Absence of value.
    Null,
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(v) => write!(f, "{}", v),
            Value::Str(v) => write!(f, "\"{}\"", v),
            Value::Boolean(v) => write!(f, "{}", v),
            Value::Null => write!(f, "null"),
        }
    }
}

impl Value {
    /// Returns the canonical runtime type label used in error messages.
    ///
    /// These labels are user-visible and are expected to remain stable.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "Number",
            Value::Str(_) => "Str",
            Value::Boolean(_) => "Boolean",
            Value::Null => "Null",
        }
    }

    /// Returns whether this value is truthy for conditional jumps.
    ///
    /// Only `Boolean(false)` and `Number(0)` are falsy; every other value,
    /// `Null` included, is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Boolean(v) => *v,
            Value::Number(v) => *v != 0.0,
            _ => true,
        }
    }

    /// Approximate heap footprint, used for allocation-pressure GC
    /// triggering. Strings count their payload bytes on top of the
    /// enum size.
    pub fn approx_bytes(&self) -> usize {
        let base = std::mem::size_of::<Value>();
        match self {
            Value::Str(v) => base + v.len(),
            _ => base,
        }
    }
}
