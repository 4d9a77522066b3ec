use cinder::bytecode::{assembler::Assembler, op_code::OpCode, program::Program};
use cinder::runtime::output::BufferSink;
use cinder::runtime::vm::VM;

fn run_transcript(program: Program) -> String {
    let sink = BufferSink::new();
    let mut vm = VM::with_sink(program, Box::new(sink.clone()));
    vm.run().unwrap();
    sink.lines().join("\n")
}

fn calc_program() -> Program {
    Assembler::new()
        .emit_str(OpCode::PushStr, "Hasil Kalkulasi: ")
        .emit(OpCode::Print)
        .emit_num(OpCode::PushNum, 10.0)
        .emit_num(OpCode::PushNum, 20.0)
        .emit(OpCode::Add)
        .emit_num(OpCode::PushNum, 2.0)
        .emit(OpCode::Mul)
        .emit(OpCode::Print)
        .emit(OpCode::Halt)
        .build()
}

fn countdown_program() -> Program {
    Assembler::new()
        .emit_num(OpCode::PushNum, 0.0)
        .emit_num(OpCode::PushNum, 1.0)
        .emit_num(OpCode::PushNum, 1.0)
        .emit_num(OpCode::PushNum, 2.0)
        .emit_num(OpCode::PushNum, 2.0)
        .emit_num(OpCode::PushNum, 3.0)
        .emit_num(OpCode::PushNum, 3.0)
        .emit_target(OpCode::JumpIfFalse, 10)
        .emit(OpCode::Print)
        .emit_target(OpCode::Jump, 7)
        .emit_str(OpCode::PushStr, "liftoff")
        .emit(OpCode::Print)
        .emit(OpCode::Halt)
        .build()
}

fn churn_program(rounds: usize) -> Program {
    let mut asm = Assembler::new();
    for i in 0..rounds {
        asm = asm
            .emit_str(OpCode::PushStr, &format!("chunk {:03}", i))
            .emit(OpCode::Print)
            .emit_num(OpCode::PushNum, i as f64)
            .emit_num(OpCode::PushNum, 3.0)
            .emit(OpCode::Mul)
            .emit(OpCode::Print);
    }
    asm.emit(OpCode::Halt).build()
}

#[test]
fn calc_disassembly() {
    insta::assert_snapshot!(calc_program().disassemble(), @r###"
    0000 PUSH_STR "Hasil Kalkulasi: "
    0001 PRINT
    0002 PUSH_NUM 10
    0003 PUSH_NUM 20
    0004 ADD
    0005 PUSH_NUM 2
    0006 MUL
    0007 PRINT
    0008 HALT
    "###);
}

#[test]
fn calc_transcript() {
    insta::assert_snapshot!(run_transcript(calc_program()), @r###"
    "Hasil Kalkulasi: "
    60
    "###);
}

#[test]
fn countdown_disassembly() {
    insta::assert_snapshot!(countdown_program().disassemble(), @r###"
    0000 PUSH_NUM 0
    0001 PUSH_NUM 1
    0002 PUSH_NUM 1
    0003 PUSH_NUM 2
    0004 PUSH_NUM 2
    0005 PUSH_NUM 3
    0006 PUSH_NUM 3
    0007 JUMP_IF_FALSE 10
    0008 PRINT
    0009 JUMP 7
    0010 PUSH_STR "liftoff"
    0011 PRINT
    0012 HALT
    "###);
}

#[test]
fn countdown_transcript() {
    insta::assert_snapshot!(run_transcript(countdown_program()), @r###"
    3
    2
    1
    "liftoff"
    "###);
}

#[test]
fn churn_transcript() {
    insta::assert_snapshot!(run_transcript(churn_program(3)), @r###"
    "chunk 000"
    0
    "chunk 001"
    3
    "chunk 002"
    6
    "###);
}
