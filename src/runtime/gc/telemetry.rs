//! Collection telemetry.
//!
//! The heap records a [`CycleStats`] row for every completed cycle.
//! [`TelemetryReport`] aggregates the history with the heap counters; it
//! renders as a text table through `Display` and as JSON through serde.

use std::fmt;

use serde::Serialize;

/// Statistics captured for a single collection cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CycleStats {
    pub cycle_index: usize,
    pub duration_micros: u64,
    pub live_before: usize,
    pub live_after: usize,
    pub collected: usize,
    pub bytes_reclaimed: usize,
    pub roots_scanned: usize,
}

/// Per-cycle collection history, owned by the heap.
#[derive(Debug, Default)]
pub struct GcTelemetry {
    cycles: Vec<CycleStats>,
}

impl GcTelemetry {
    pub fn new() -> Self {
        Self { cycles: Vec::new() }
    }

    pub fn record_cycle(&mut self, stats: CycleStats) {
        self.cycles.push(stats);
    }

    pub fn cycles(&self) -> &[CycleStats] {
        &self.cycles
    }

    pub fn total_collected(&self) -> usize {
        self.cycles.iter().map(|c| c.collected).sum()
    }

    pub fn total_bytes_reclaimed(&self) -> usize {
        self.cycles.iter().map(|c| c.bytes_reclaimed).sum()
    }
}

/// Aggregated heap and collection statistics.
#[derive(Debug, Clone, Serialize)]
pub struct TelemetryReport {
    pub total_allocations: usize,
    pub total_collections: usize,
    pub total_collected: usize,
    pub total_bytes_reclaimed: usize,
    pub live_objects: usize,
    pub cycles: Vec<CycleStats>,
}

impl fmt::Display for TelemetryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== GC Summary ===")?;
        writeln!(f, "Total allocations:  {}", self.total_allocations)?;
        writeln!(f, "Total collections:  {}", self.total_collections)?;
        writeln!(f, "Objects reclaimed:  {}", self.total_collected)?;
        writeln!(f, "Bytes reclaimed:    {}", self.total_bytes_reclaimed)?;
        writeln!(f, "Live objects:       {}", self.live_objects)?;
        writeln!(f)?;
        writeln!(f, "=== GC Cycles ===")?;
        if self.cycles.is_empty() {
            writeln!(f, "No collections performed.")?;
            return Ok(());
        }
        writeln!(
            f,
            "{:>5} {:>10} {:>8} {:>8} {:>9} {:>10} {:>7}",
            "Cycle", "Duration", "Before", "After", "Collected", "Bytes", "Roots"
        )?;
        writeln!(f, "{}", "-".repeat(64))?;
        for c in &self.cycles {
            writeln!(
                f,
                "{:>5} {:>8}us {:>8} {:>8} {:>9} {:>10} {:>7}",
                c.cycle_index,
                c.duration_micros,
                c.live_before,
                c.live_after,
                c.collected,
                c.bytes_reclaimed,
                c.roots_scanned
            )?;
        }
        Ok(())
    }
}
