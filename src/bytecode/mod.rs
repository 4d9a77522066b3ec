pub mod assembler;
pub mod instruction;
pub mod op_code;
pub mod program;
