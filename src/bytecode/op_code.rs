use std::fmt;

use crate::runtime::error::RuntimeErrorKind;

/// Operation codes understood by the VM.
///
/// Discriminants are part of the external encoding and must not be
/// reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OpCode {
    PushNum = 0,
    PushStr = 1,
    Add = 2,
    Sub = 3,
    Mul = 4,
    Div = 5,
    Print = 6,
    Jump = 7,
    JumpIfFalse = 8,
    Halt = 9,
}

impl OpCode {
    /// Returns the canonical mnemonic used in disassembly and traces.
    pub fn mnemonic(self) -> &'static str {
        match self {
            OpCode::PushNum => "PUSH_NUM",
            OpCode::PushStr => "PUSH_STR",
            OpCode::Add => "ADD",
            OpCode::Sub => "SUB",
            OpCode::Mul => "MUL",
            OpCode::Div => "DIV",
            OpCode::Print => "PRINT",
            OpCode::Jump => "JUMP",
            OpCode::JumpIfFalse => "JUMP_IF_FALSE",
            OpCode::Halt => "HALT",
        }
    }

    /// Decodes a raw opcode byte.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(OpCode::PushNum),
            1 => Some(OpCode::PushStr),
            2 => Some(OpCode::Add),
            3 => Some(OpCode::Sub),
            4 => Some(OpCode::Mul),
            5 => Some(OpCode::Div),
            6 => Some(OpCode::Print),
            7 => Some(OpCode::Jump),
            8 => Some(OpCode::JumpIfFalse),
            9 => Some(OpCode::Halt),
            _ => None,
        }
    }
}

impl TryFrom<u8> for OpCode {
    type Error = RuntimeErrorKind;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Self::from_byte(byte).ok_or(RuntimeErrorKind::UnknownOpcode(byte))
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
