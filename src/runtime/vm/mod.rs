use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use crate::{
    bytecode::{instruction::Instruction, program::Program},
    runtime::{
        error::{RunResult, RuntimeError},
        gc::{GcHandle, GcHeap, GcTrigger},
        output::{OutputSink, StdoutSink},
        value::Value,
    },
};

mod dispatch;

/// How a finished run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// A `HALT` instruction stopped the program.
    Halted,
    /// The instruction pointer ran past the last instruction.
    Completed,
    /// A cooperative cancellation request stopped the program.
    Cancelled,
}

/// Lifecycle of the loaded program. A run that ends, successfully or not,
/// leaves the VM terminal until a new program is loaded.
enum VmState {
    Ready,
    Finished(RunOutcome),
    Faulted(RuntimeError),
}

/// What a dispatched instruction asks the run loop to do next.
pub(crate) enum Control {
    Next,
    Jump(usize),
    Halt,
}

pub struct VM {
    program: Program,
    stack: Vec<GcHandle>,
    ip: usize,
    executed: u64,
    state: VmState,
    trace: bool,
    gc_trigger: GcTrigger,
    cancel_flag: Option<Arc<AtomicBool>>,
    sink: Box<dyn OutputSink>,
    pub gc_heap: GcHeap,
}

impl VM {
    pub fn new(program: Program) -> Self {
        Self::with_sink(program, Box::new(StdoutSink))
    }

    /// Creates a VM that routes `PRINT` lines and collection notifications
    /// through the given sink.
    pub fn with_sink(program: Program, sink: Box<dyn OutputSink>) -> Self {
        Self {
            program,
            stack: Vec::new(),
            ip: 0,
            executed: 0,
            state: VmState::Ready,
            trace: false,
            gc_trigger: GcTrigger::default(),
            cancel_flag: None,
            sink,
            gc_heap: GcHeap::new(),
        }
    }

    pub fn set_trace(&mut self, enabled: bool) {
        self.trace = enabled;
    }

    pub fn set_gc_enabled(&mut self, enabled: bool) {
        self.gc_heap.set_enabled(enabled);
    }

    pub fn set_gc_trigger(&mut self, trigger: GcTrigger) {
        self.gc_trigger = trigger;
    }

    /// Installs a cooperative cancellation flag. The run loop polls it once
    /// per instruction, before dispatch.
    pub fn set_cancel_flag(&mut self, flag: Arc<AtomicBool>) {
        self.cancel_flag = Some(flag);
    }

    /// Current instruction pointer. After `HALT` this is the index of the
    /// `HALT` instruction itself; after running off the end it equals the
    /// program length.
    pub fn ip(&self) -> usize {
        self.ip
    }

    /// Replaces the loaded program and re-arms the VM for a fresh run, even
    /// from a faulted state. Values from the previous run stay on the heap
    /// until a later cycle reclaims them.
    pub fn load_program(&mut self, program: Program) {
        self.program = program;
        self.stack.clear();
        self.ip = 0;
        self.executed = 0;
        self.state = VmState::Ready;
    }

    /// Runs the loaded program to a terminal state.
    ///
    /// Errors are fatal to the run: a finished VM does not resume, and
    /// calling `run` again returns the recorded outcome or error without
    /// executing anything further.
    pub fn run(&mut self) -> RunResult<RunOutcome> {
        match &self.state {
            VmState::Ready => {}
            VmState::Finished(outcome) => return Ok(*outcome),
            VmState::Faulted(err) => return Err(err.clone()),
        }

        match self.run_loop() {
            Ok(outcome) => {
                self.state = VmState::Finished(outcome);
                Ok(outcome)
            }
            Err(err) => {
                self.state = VmState::Faulted(err.clone());
                Err(err)
            }
        }
    }

    fn run_loop(&mut self) -> RunResult<RunOutcome> {
        // Hold our own reference to the instructions so dispatch can borrow
        // the VM mutably while the loop indexes them.
        let instructions = self.program.instructions();

        loop {
            if let Some(flag) = &self.cancel_flag
                && flag.load(Ordering::Relaxed)
            {
                return Ok(RunOutcome::Cancelled);
            }

            let ip = self.ip;
            if ip >= instructions.len() {
                return Ok(RunOutcome::Completed);
            }

            let instruction = &instructions[ip];
            if self.trace {
                self.trace_instruction(ip, instruction);
            }

            match self.dispatch_instruction(ip, instruction)? {
                Control::Next => self.ip = ip + 1,
                Control::Jump(target) => self.ip = target,
                Control::Halt => return Ok(RunOutcome::Halted),
            }

            // Collection runs between instructions, never inside one, so a
            // handle popped during dispatch always resolves.
            self.executed += 1;
            if self.should_collect() {
                self.collect_garbage();
            }
        }
    }

    fn should_collect(&self) -> bool {
        if !self.gc_heap.is_enabled() {
            return false;
        }
        match self.gc_trigger {
            GcTrigger::EveryInstructions(n) => n > 0 && self.executed % u64::from(n) == 0,
            GcTrigger::AllocatedBytes(n) => n > 0 && self.gc_heap.bytes_since_collect() >= n,
        }
    }

    fn collect_garbage(&mut self) {
        // The operand stack is the entire root set.
        let stats = self.gc_heap.collect(&self.stack);
        self.sink.gc_cycle(&stats);
    }

    pub(crate) fn push(&mut self, handle: GcHandle) {
        self.stack.push(handle);
    }

    pub(crate) fn pop(&mut self, ip: usize) -> RunResult<GcHandle> {
        match self.stack.pop() {
            Some(handle) => Ok(handle),
            None => Err(Self::stack_underflow_err(ip)),
        }
    }

    /// Allocates a value and pushes its handle in one step.
    pub(crate) fn alloc_push(&mut self, value: Value) {
        let handle = self.gc_heap.alloc(value);
        self.stack.push(handle);
    }

    fn trace_instruction(&self, ip: usize, instruction: &Instruction) {
        println!("IP={:04} {}", ip, instruction);

        let mut rendered = Vec::with_capacity(self.stack.len());
        let mut i = 0;
        while i < self.stack.len() {
            match self.gc_heap.try_value(self.stack[i]) {
                Some(value) => rendered.push(value.to_string()),
                None => rendered.push("<stale>".to_string()),
            }
            i += 1;
        }
        println!("  stack: [{}]", rendered.join(", "));
    }
}
