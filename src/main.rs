use std::{env, process};

use cinder::{
    bytecode::{assembler::Assembler, op_code::OpCode, program::Program},
    runtime::{gc::GcTrigger, vm::VM},
};

fn main() {
    let mut args: Vec<String> = env::args().collect();
    let trace = args.iter().any(|arg| arg == "--trace");
    let no_gc = args.iter().any(|arg| arg == "--no-gc");
    let gc_telemetry = args.iter().any(|arg| arg == "--gc-telemetry");
    let json = args.iter().any(|arg| arg == "--json");
    if trace {
        args.retain(|arg| arg != "--trace");
    }
    if no_gc {
        args.retain(|arg| arg != "--no-gc");
    }
    if gc_telemetry {
        args.retain(|arg| arg != "--gc-telemetry");
    }
    if json {
        args.retain(|arg| arg != "--json");
    }
    let gc_every = match extract_gc_every(&mut args) {
        Some(value) => value,
        None => return,
    };
    let gc_bytes = match extract_gc_bytes(&mut args) {
        Some(value) => value,
        None => return,
    };
    if gc_every.is_some() && gc_bytes.is_some() {
        eprintln!("Error: --gc-every and --gc-bytes are mutually exclusive.");
        return;
    }

    if args.len() < 2 {
        print_help();
        return;
    }

    match args[1].as_str() {
        "-h" | "--help" | "help" => {
            print_help();
        }
        "list" => {
            list_demos();
        }
        "disasm" => {
            if args.len() < 3 {
                eprintln!("Usage: cinder disasm <demo>");
                return;
            }
            match demo_program(&args[2]) {
                Some(program) => print!("{}", program.disassemble()),
                None => {
                    eprintln!("Error: unknown demo: {} (try `cinder list`)", args[2]);
                    process::exit(1);
                }
            }
        }
        "run" => {
            if args.len() < 3 {
                eprintln!("Usage: cinder run <demo>");
                return;
            }
            run_demo(&args[2], trace, no_gc, gc_every, gc_bytes, gc_telemetry, json);
        }
        name => {
            run_demo(name, trace, no_gc, gc_every, gc_bytes, gc_telemetry, json);
        }
    }
}

fn print_help() {
    println!(
        "\
Cinder VM

Usage:
  cinder <demo>
  cinder run <demo>
  cinder disasm <demo>
  cinder list

Flags:
  --trace            Print executed instructions and the operand stack
  --no-gc            Disable automatic collection for this run
  --gc-every <n>     Collect after every n executed instructions (default: 5)
  --gc-bytes <n>     Collect once n bytes were allocated since the last cycle
  --gc-telemetry     Print a GC report after execution
  --json             Render the GC report as JSON (with --gc-telemetry)
  -h, --help         Show this help message
"
    );
}

fn list_demos() {
    println!(
        "\
Built-in demo programs:
  calc        Banner plus (10 + 20) * 2
  countdown   Backward-jump loop counting 3, 2, 1
  churn       Garbage-heavy mix of strings and numbers"
    );
}

#[allow(clippy::too_many_arguments)]
fn run_demo(
    name: &str,
    trace: bool,
    no_gc: bool,
    gc_every: Option<u32>,
    gc_bytes: Option<usize>,
    gc_telemetry: bool,
    json: bool,
) {
    let program = match demo_program(name) {
        Some(program) => program,
        None => {
            eprintln!("Error: unknown demo: {} (try `cinder list`)", name);
            process::exit(1);
        }
    };

    let mut vm = VM::new(program);
    vm.set_trace(trace);
    if no_gc {
        vm.set_gc_enabled(false);
    }
    if let Some(n) = gc_every {
        vm.set_gc_trigger(GcTrigger::EveryInstructions(n));
    }
    if let Some(n) = gc_bytes {
        vm.set_gc_trigger(GcTrigger::AllocatedBytes(n));
    }

    if let Err(err) = vm.run() {
        eprintln!("{}", err);
        process::exit(1);
    }

    if gc_telemetry {
        let report = vm.gc_heap.telemetry_report();
        if json {
            match serde_json::to_string_pretty(&report) {
                Ok(rendered) => println!("{}", rendered),
                Err(err) => {
                    eprintln!("Error rendering telemetry: {}", err);
                    process::exit(1);
                }
            }
        } else {
            println!("\n{}", report);
        }
    }
}

fn demo_program(name: &str) -> Option<Program> {
    match name {
        "calc" => Some(calc_demo()),
        "countdown" => Some(countdown_demo()),
        "churn" => Some(churn_demo()),
        _ => None,
    }
}

/// Prints a banner, then (10 + 20) * 2.
fn calc_demo() -> Program {
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

/// Counts 3, 2, 1 with a real backward jump, then lands.
///
/// There is no DUP opcode, so the loop pre-pushes condition/value pairs
/// with a falsy 0 sentinel at the bottom; each pass consumes one pair
/// until the sentinel stops the loop.
fn countdown_demo() -> Program {
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

/// Allocates plenty of short-lived values so collection cycles have
/// something to reclaim.
fn churn_demo() -> Program {
    let mut asm = Assembler::new();
    for i in 0..48 {
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

fn extract_gc_every(args: &mut Vec<String>) -> Option<Option<u32>> {
    let mut cadence = None;
    let mut i = 0;
    while i < args.len() {
        if args[i] == "--gc-every" {
            if i + 1 >= args.len() {
                eprintln!("Usage: cinder <demo> --gc-every <n>");
                return None;
            }
            let value = args.remove(i + 1);
            args.remove(i);
            match value.parse::<u32>() {
                Ok(parsed) => {
                    cadence = Some(parsed);
                }
                Err(_) => {
                    eprintln!("Error: --gc-every expects a non-negative integer.");
                    return None;
                }
            }
            continue;
        }
        i += 1;
    }
    Some(cadence)
}

fn extract_gc_bytes(args: &mut Vec<String>) -> Option<Option<usize>> {
    let mut threshold = None;
    let mut i = 0;
    while i < args.len() {
        if args[i] == "--gc-bytes" {
            if i + 1 >= args.len() {
                eprintln!("Usage: cinder <demo> --gc-bytes <n>");
                return None;
            }
            let value = args.remove(i + 1);
            args.remove(i);
            match value.parse::<usize>() {
                Ok(parsed) => {
                    threshold = Some(parsed);
                }
                Err(_) => {
                    eprintln!("Error: --gc-bytes expects a non-negative integer.");
                    return None;
                }
            }
            continue;
        }
        i += 1;
    }
    Some(threshold)
}
