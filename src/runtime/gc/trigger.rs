/// Policy deciding when the VM runs a collection cycle.
///
/// The check happens after each successfully executed instruction, never
/// in the middle of one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GcTrigger {
    /// Collect after every `n` executed instructions.
    EveryInstructions(u32),
    /// Collect once at least `n` bytes have been allocated since the
    /// last cycle.
    AllocatedBytes(usize),
}

/// Instruction cadence used when no trigger is configured.
pub const DEFAULT_INSTRUCTION_CADENCE: u32 = 5;

impl Default for GcTrigger {
    fn default() -> Self {
        GcTrigger::EveryInstructions(DEFAULT_INSTRUCTION_CADENCE)
    }
}
