use crate::bytecode::{instruction::Instruction, op_code::OpCode, program::Program};

/// Fluent, side-effect-free program builder.
///
/// Emitted instructions keep their emission order. The assembler performs
/// no opcode/operand validation; ill-formed pairs are rejected by the VM
/// at execution time.
///
/// ```
/// use cinder::bytecode::{assembler::Assembler, op_code::OpCode};
///
/// let program = Assembler::new()
///     .emit_num(OpCode::PushNum, 10.0)
///     .emit_num(OpCode::PushNum, 20.0)
///     .emit(OpCode::Add)
///     .emit(OpCode::Print)
///     .emit(OpCode::Halt)
///     .build();
/// assert_eq!(program.len(), 5);
/// ```
#[derive(Debug, Default)]
pub struct Assembler {
    instructions: Vec<Instruction>,
}

impl Assembler {
    pub fn new() -> Self {
        Self {
            instructions: Vec::new(),
        }
    }

    /// Emits an instruction with an empty operand slot.
    pub fn emit(mut self, opcode: OpCode) -> Self {
        self.instructions.push(Instruction::new(opcode));
        self
    }

    /// Emits an instruction carrying a numeric literal.
    pub fn emit_num(mut self, opcode: OpCode, value: f64) -> Self {
        self.instructions
            .push(Instruction::with_number(opcode, value));
        self
    }

    /// Emits an instruction carrying a text literal.
    pub fn emit_str(mut self, opcode: OpCode, text: &str) -> Self {
        self.instructions.push(Instruction::with_text(opcode, text));
        self
    }

    /// Emits an instruction carrying a jump target.
    pub fn emit_target(mut self, opcode: OpCode, target: usize) -> Self {
        self.instructions
            .push(Instruction::with_target(opcode, target));
        self
    }

    /// Index the next emitted instruction will occupy.
    ///
    /// Useful for computing jump targets while assembling.
    pub fn next_index(&self) -> usize {
        self.instructions.len()
    }

    /// Consumes the assembler and yields the immutable program.
    pub fn build(self) -> Program {
        Program::new(self.instructions)
    }
}
