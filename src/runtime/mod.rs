//! Runtime core types and VM execution.
//!
//! # Handle Invariant
//! Every value the VM touches lives in a [`gc::GcHeap`] slot and is addressed
//! through a generation-stamped handle. The operand stack holds handles, not
//! values, and is the collector's entire root set: anything popped before a
//! cycle runs is garbage by definition.
//!
//! The invariant is:
//! - Collection runs between instructions, never inside one, so a handle
//!   popped during dispatch still resolves for the rest of that instruction.
//! - A freed slot's generation is bumped before reuse, so a stale handle
//!   fails to resolve instead of aliasing the new occupant.

pub mod error;
pub mod gc;
pub mod output;
pub mod value;
pub mod vm;
