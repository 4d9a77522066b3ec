use std::{fmt, rc::Rc};

use crate::bytecode::op_code::OpCode;

/// Payload carried by an instruction.
///
/// The assembler does not validate that an operand fits its opcode; a
/// mismatch surfaces as a type error when the instruction executes.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    None,
    Number(f64),
    Text(Rc<str>),
    Target(usize),
}

impl Operand {
    /// Short label used in execution-time mismatch errors.
    pub fn describe(&self) -> &'static str {
        match self {
            Operand::None => "no operand",
            Operand::Number(_) => "numeric literal",
            Operand::Text(_) => "text literal",
            Operand::Target(_) => "jump target",
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::None => Ok(()),
            Operand::Number(v) => write!(f, "{}", v),
            Operand::Text(v) => write!(f, "\"{}\"", v),
            Operand::Target(v) => write!(f, "{}", v),
        }
    }
}

/// One opcode plus its operand slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub opcode: OpCode,
    pub operand: Operand,
}

impl Instruction {
    pub fn new(opcode: OpCode) -> Self {
        Self {
            opcode,
            operand: Operand::None,
        }
    }

    pub fn with_number(opcode: OpCode, value: f64) -> Self {
        Self {
            opcode,
            operand: Operand::Number(value),
        }
    }

    pub fn with_text(opcode: OpCode, text: &str) -> Self {
        Self {
            opcode,
            operand: Operand::Text(Rc::from(text)),
        }
    }

    pub fn with_target(opcode: OpCode, target: usize) -> Self {
        Self {
            opcode,
            operand: Operand::Target(target),
        }
    }

    /// Returns the numeric literal, if this instruction carries one.
    pub fn number(&self) -> Option<f64> {
        match &self.operand {
            Operand::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the text literal, if this instruction carries one.
    pub fn text(&self) -> Option<Rc<str>> {
        match &self.operand {
            Operand::Text(v) => Some(Rc::clone(v)),
            _ => None,
        }
    }

    /// Returns the jump target, if this instruction carries one.
    pub fn target(&self) -> Option<usize> {
        match &self.operand {
            Operand::Target(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operand {
            Operand::None => write!(f, "{}", self.opcode),
            _ => write!(f, "{} {}", self.opcode, self.operand),
        }
    }
}
