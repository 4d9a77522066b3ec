pub mod gc_handle;
pub mod gc_heap;
pub mod heap_slot;
pub mod telemetry;
pub mod trigger;

pub use gc_handle::GcHandle;
pub use gc_heap::GcHeap;
pub use telemetry::{CycleStats, GcTelemetry, TelemetryReport};
pub use trigger::GcTrigger;
