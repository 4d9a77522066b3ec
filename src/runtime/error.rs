//! Runtime error types.
//!
//! Every condition here is fatal to the current run; none is retried or
//! silently ignored. The VM reports the error kind together with the
//! instruction pointer at the time of failure.

use std::{error, fmt};

#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeErrorKind {
    StackUnderflow,
    TypeMismatch {
        expected: &'static str,
        found: String,
    },
    InvalidJumpTarget(usize),
    DivisionByZero,
    UnknownOpcode(u8),
}

impl fmt::Display for RuntimeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeErrorKind::StackUnderflow => write!(f, "stack underflow"),
            RuntimeErrorKind::TypeMismatch { expected, found } => {
                write!(f, "type mismatch: expected {}, found {}", expected, found)
            }
            RuntimeErrorKind::InvalidJumpTarget(target) => {
                write!(f, "invalid jump target: {}", target)
            }
            RuntimeErrorKind::DivisionByZero => write!(f, "division by zero"),
            RuntimeErrorKind::UnknownOpcode(byte) => {
                write!(f, "unknown opcode: 0x{:02X}", byte)
            }
        }
    }
}

/// A fatal execution error, carrying the instruction pointer at which it
/// was raised.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeError {
    pub kind: RuntimeErrorKind,
    pub ip: usize,
}

impl RuntimeError {
    pub fn new(kind: RuntimeErrorKind, ip: usize) -> Self {
        Self { kind, ip }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "runtime error at ip {:04}: {}", self.ip, self.kind)
    }
}

impl error::Error for RuntimeError {}

pub type RunResult<T> = Result<T, RuntimeError>;
