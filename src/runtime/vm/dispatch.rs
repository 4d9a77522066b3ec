use crate::{
    bytecode::{instruction::Instruction, op_code::OpCode},
    runtime::{
        error::{RunResult, RuntimeError, RuntimeErrorKind},
        value::Value,
    },
};

use super::{Control, VM};

impl VM {
    #[cold]
    #[inline(never)]
    pub(super) fn stack_underflow_err(ip: usize) -> RuntimeError {
        RuntimeError::new(RuntimeErrorKind::StackUnderflow, ip)
    }

    #[cold]
    #[inline(never)]
    fn operand_type_err(
        ip: usize,
        expected: &'static str,
        instruction: &Instruction,
    ) -> RuntimeError {
        RuntimeError::new(
            RuntimeErrorKind::TypeMismatch {
                expected,
                found: instruction.operand.describe().to_string(),
            },
            ip,
        )
    }

    #[cold]
    #[inline(never)]
    fn value_type_err(ip: usize, expected: &'static str, found: &Value) -> RuntimeError {
        RuntimeError::new(
            RuntimeErrorKind::TypeMismatch {
                expected,
                found: found.type_name().to_string(),
            },
            ip,
        )
    }

    #[cold]
    #[inline(never)]
    fn division_by_zero_err(ip: usize) -> RuntimeError {
        RuntimeError::new(RuntimeErrorKind::DivisionByZero, ip)
    }

    #[cold]
    #[inline(never)]
    fn invalid_jump_err(ip: usize, target: usize) -> RuntimeError {
        RuntimeError::new(RuntimeErrorKind::InvalidJumpTarget(target), ip)
    }

    pub(super) fn dispatch_instruction(
        &mut self,
        ip: usize,
        instruction: &Instruction,
    ) -> RunResult<Control> {
        match instruction.opcode {
            OpCode::PushNum => {
                let number = instruction
                    .number()
                    .ok_or_else(|| Self::operand_type_err(ip, "numeric literal", instruction))?;
                self.alloc_push(Value::Number(number));
                Ok(Control::Next)
            }
            OpCode::PushStr => {
                let text = instruction
                    .text()
                    .ok_or_else(|| Self::operand_type_err(ip, "text literal", instruction))?;
                self.alloc_push(Value::Str(text));
                Ok(Control::Next)
            }
            OpCode::Add | OpCode::Sub | OpCode::Mul | OpCode::Div => {
                self.execute_arithmetic(ip, instruction.opcode)?;
                Ok(Control::Next)
            }
            OpCode::Print => {
                let handle = self.pop(ip)?;
                // Popped this instruction, so no cycle has run since; the
                // slot is still live.
                let line = self.gc_heap.value(handle).to_string();
                self.sink.print_line(&line);
                Ok(Control::Next)
            }
            OpCode::Jump => {
                let target = self.jump_target(ip, instruction)?;
                Ok(Control::Jump(target))
            }
            OpCode::JumpIfFalse => {
                // The target is validated before the condition is popped,
                // so a bad target faults even on the untaken path.
                let target = self.jump_target(ip, instruction)?;
                let handle = self.pop(ip)?;
                if self.gc_heap.value(handle).is_truthy() {
                    Ok(Control::Next)
                } else {
                    Ok(Control::Jump(target))
                }
            }
            OpCode::Halt => Ok(Control::Halt),
        }
    }

    /// Extracts and validates a jump target. A target equal to the program
    /// length is legal; the run loop treats it as a completed run.
    fn jump_target(&self, ip: usize, instruction: &Instruction) -> RunResult<usize> {
        let target = instruction
            .target()
            .ok_or_else(|| Self::operand_type_err(ip, "jump target", instruction))?;
        if target > self.program.len() {
            return Err(Self::invalid_jump_err(ip, target));
        }
        Ok(target)
    }

    fn execute_arithmetic(&mut self, ip: usize, op: OpCode) -> RunResult<()> {
        let rhs_handle = self.pop(ip)?;
        let lhs_handle = self.pop(ip)?;

        // Left operand is checked first, so a mixed-type pair reports the
        // deeper of the two.
        let lhs = match self.gc_heap.value(lhs_handle) {
            Value::Number(n) => *n,
            other => return Err(Self::value_type_err(ip, "Number", other)),
        };
        let rhs = match self.gc_heap.value(rhs_handle) {
            Value::Number(n) => *n,
            other => return Err(Self::value_type_err(ip, "Number", other)),
        };

        // Division never produces inf/NaN from a zero divisor; it faults.
        if op == OpCode::Div && rhs == 0.0 {
            return Err(Self::division_by_zero_err(ip));
        }

        let result = match op {
            OpCode::Add => lhs + rhs,
            OpCode::Sub => lhs - rhs,
            OpCode::Mul => lhs * rhs,
            OpCode::Div => lhs / rhs,
            _ => unreachable!("execute_arithmetic called with non-arithmetic opcode"),
        };

        self.alloc_push(Value::Number(result));
        Ok(())
    }
}
