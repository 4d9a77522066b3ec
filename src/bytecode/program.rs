use std::rc::Rc;

use crate::bytecode::instruction::Instruction;

/// An immutable, ordered instruction sequence addressed by zero-based
/// position.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    instructions: Rc<[Instruction]>,
}

impl Program {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self {
            instructions: Rc::from(instructions),
        }
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }

    /// Shared handle to the instruction storage.
    ///
    /// The run loop holds this across dispatch so the program can be read
    /// while the VM is mutated.
    pub(crate) fn instructions(&self) -> Rc<[Instruction]> {
        Rc::clone(&self.instructions)
    }

    /// Renders one `NNNN MNEMONIC operand` line per instruction.
    pub fn disassemble(&self) -> String {
        let mut result = String::new();
        for (i, instruction) in self.instructions.iter().enumerate() {
            result.push_str(&format!("{:04} {}\n", i, instruction));
        }
        result
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::op_code::OpCode;

    #[test]
    fn test_disassemble_lines_up_positions() {
        let program = Program::new(vec![
            Instruction::with_number(OpCode::PushNum, 10.0),
            Instruction::with_number(OpCode::PushNum, 20.0),
            Instruction::new(OpCode::Add),
            Instruction::new(OpCode::Halt),
        ]);
        assert_eq!(
            program.disassemble(),
            "0000 PUSH_NUM 10\n0001 PUSH_NUM 20\n0002 ADD\n0003 HALT\n"
        );
    }

    #[test]
    fn test_get_and_len() {
        let program = Program::new(vec![Instruction::new(OpCode::Halt)]);
        assert_eq!(program.len(), 1);
        assert!(!program.is_empty());
        assert_eq!(program.get(0).map(|i| i.opcode), Some(OpCode::Halt));
        assert!(program.get(1).is_none());
    }

    #[test]
    fn test_empty_program() {
        let program = Program::default();
        assert!(program.is_empty());
        assert_eq!(program.disassemble(), "");
    }
}
