use std::time::Instant;

use crate::runtime::{
    gc::{
        gc_handle::GcHandle,
        heap_slot::HeapSlot,
        telemetry::{CycleStats, GcTelemetry, TelemetryReport},
    },
    value::Value,
};

/// Stop-the-world mark-and-sweep garbage collector heap.
///
/// Every VM value lives in a heap slot addressed through a
/// generation-stamped [`GcHandle`]. Slots freed by a sweep go on a free
/// list and are reused by later allocations; freeing bumps the slot's
/// generation so handles into the previous occupant stop resolving.
pub struct GcHeap {
    slots: Vec<Option<HeapSlot>>,
    generations: Vec<u32>,
    free_list: Vec<u32>,
    gc_enabled: bool,
    bytes_since_collect: usize,
    total_allocations: usize,
    total_collections: usize,
    telemetry: GcTelemetry,
}

impl Default for GcHeap {
    fn default() -> Self {
        Self::new()
    }
}

impl GcHeap {
    /// Creates an empty heap with automatic collection enabled.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            gc_enabled: true,
            bytes_since_collect: 0,
            total_allocations: 0,
            total_collections: 0,
            telemetry: GcTelemetry::new(),
        }
    }

    /// Enables or disables automatic collection. The VM checks this flag
    /// before running a cycle; direct calls to [`Self::collect`] ignore it.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.gc_enabled = enabled
    }

    pub fn is_enabled(&self) -> bool {
        self.gc_enabled
    }

    /// Moves a value onto the heap and returns a handle stamped with the
    /// slot's current generation.
    ///
    /// Freed slots are reused through the internal free list before growing
    /// the storage vector.
    pub fn alloc(&mut self, value: Value) -> GcHandle {
        self.total_allocations += 1;
        self.bytes_since_collect += value.approx_bytes();

        let slot = HeapSlot {
            value,
            marked: false,
        };

        if let Some(index) = self.free_list.pop() {
            self.slots[index as usize] = Some(slot);
            GcHandle {
                index,
                generation: self.generations[index as usize],
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Some(slot));
            self.generations.push(0);
            GcHandle {
                index,
                generation: 0,
            }
        }
    }

    /// Resolves a handle, returning `None` if the slot was freed or reused
    /// since the handle was issued.
    pub fn try_value(&self, handle: GcHandle) -> Option<&Value> {
        let index = handle.index as usize;
        if index >= self.slots.len() || self.generations[index] != handle.generation {
            return None;
        }
        self.slots[index].as_ref().map(|slot| &slot.value)
    }

    /// Returns an immutable reference to a live value by handle.
    ///
    /// Panics if the handle is stale or points to a free slot. The VM only
    /// resolves handles still on the operand stack, which every cycle keeps
    /// alive.
    pub fn value(&self, handle: GcHandle) -> &Value {
        self.try_value(handle)
            .expect("GcHeap::value: stale or free handle")
    }

    /// Returns the number of currently live heap slots.
    pub fn live_count(&self) -> usize {
        let mut live = 0;
        let mut i = 0;
        let len = self.slots.len();

        while i < len {
            if self.slots[i].is_some() {
                live += 1;
            }
            i += 1;
        }

        live
    }

    /// Returns the total number of allocations performed by this heap.
    pub fn total_allocations(&self) -> usize {
        self.total_allocations
    }

    /// Returns the total number of completed GC cycles.
    pub fn total_collections(&self) -> usize {
        self.total_collections
    }

    /// Bytes allocated since the last completed cycle. Drives the
    /// byte-threshold trigger.
    pub fn bytes_since_collect(&self) -> usize {
        self.bytes_since_collect
    }

    /// Runs a full stop-the-world mark-and-sweep collection and returns the
    /// cycle's statistics.
    ///
    /// Values hold no references to other heap slots, so marking is a single
    /// pass over the roots with no traversal. The sweep frees every unmarked
    /// slot and clears the mark on survivors, leaving the heap clean for the
    /// next cycle.
    pub fn collect(&mut self, roots: &[GcHandle]) -> CycleStats {
        let started = Instant::now();

        let live_before = self.live_count();
        self.mark_roots(roots);
        let bytes_reclaimed = self.sweep();
        let live_after = self.live_count();

        let stats = CycleStats {
            cycle_index: self.total_collections,
            duration_micros: started.elapsed().as_micros() as u64,
            live_before,
            live_after,
            collected: live_before.saturating_sub(live_after),
            bytes_reclaimed,
            roots_scanned: roots.len(),
        };

        self.total_collections += 1;
        self.bytes_since_collect = 0;
        self.telemetry.record_cycle(stats);

        stats
    }

    fn mark_roots(&mut self, roots: &[GcHandle]) {
        let mut i = 0;
        let len = roots.len();
        while i < len {
            let handle = roots[i];
            let index = handle.index as usize;
            // Stale roots are skipped rather than rejected; the operand
            // stack never holds one, but callers may pass arbitrary handles.
            if index < self.slots.len()
                && self.generations[index] == handle.generation
                && let Some(slot) = self.slots[index].as_mut()
            {
                slot.marked = true;
            }
            i += 1;
        }
    }

    fn sweep(&mut self) -> usize {
        let mut reclaimed = 0;
        let mut i = 0;
        let len = self.slots.len();
        while i < len {
            if let Some(slot) = &mut self.slots[i] {
                if slot.marked {
                    slot.marked = false;
                } else {
                    reclaimed += slot.value.approx_bytes();
                    self.slots[i] = None;
                    self.generations[i] += 1;
                    self.free_list.push(i as u32);
                }
            }
            i += 1;
        }
        reclaimed
    }

    pub fn telemetry(&self) -> &GcTelemetry {
        &self.telemetry
    }

    /// Snapshot of the heap counters plus the full cycle history.
    pub fn telemetry_report(&self) -> TelemetryReport {
        TelemetryReport {
            total_allocations: self.total_allocations,
            total_collections: self.total_collections,
            total_collected: self.telemetry.total_collected(),
            total_bytes_reclaimed: self.telemetry.total_bytes_reclaimed(),
            live_objects: self.live_count(),
            cycles: self.telemetry.cycles().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_and_read_back() {
        let mut heap = GcHeap::new();
        let handle = heap.alloc(Value::Number(42.0));

        assert_eq!(heap.value(handle), &Value::Number(42.0));
        assert_eq!(heap.live_count(), 1);
        assert_eq!(heap.total_allocations(), 1);
    }

    #[test]
    fn test_collect_frees_unreachable() {
        let mut heap = GcHeap::new();
        for i in 0..100 {
            heap.alloc(Value::Number(i as f64));
        }
        assert_eq!(heap.live_count(), 100);

        // Collect with empty roots
        let stats = heap.collect(&[]);

        assert_eq!(stats.collected, 100);
        assert_eq!(stats.live_before, 100);
        assert_eq!(stats.live_after, 0);
        assert_eq!(heap.live_count(), 0);
        assert_eq!(heap.free_list.len(), 100);
    }

    #[test]
    fn test_collect_preserves_roots() {
        let mut heap = GcHeap::new();
        let keep = heap.alloc(Value::Str("kept".into()));
        let garbage = heap.alloc(Value::Number(2.0));

        let stats = heap.collect(&[keep]);

        assert_eq!(stats.collected, 1);
        assert_eq!(stats.live_after, 1);
        assert_eq!(stats.roots_scanned, 1);
        assert_eq!(heap.try_value(keep), Some(&Value::Str("kept".into())));
        assert_eq!(heap.try_value(garbage), None);
    }

    #[test]
    fn test_slot_reuse_bumps_generation() {
        let mut heap = GcHeap::new();
        let old = heap.alloc(Value::Number(1.0));
        heap.collect(&[]);

        let reused = heap.alloc(Value::Number(2.0));

        // Same slot, next generation; the stale handle no longer resolves.
        assert_eq!(reused.index(), old.index());
        assert_eq!(reused.generation(), old.generation() + 1);
        assert_eq!(heap.try_value(old), None);
        assert_eq!(heap.value(reused), &Value::Number(2.0));
        assert_eq!(heap.slots.len(), 1);
    }

    #[test]
    fn test_stale_roots_are_skipped() {
        let mut heap = GcHeap::new();
        let stale = heap.alloc(Value::Number(1.0));
        heap.collect(&[]);
        let live = heap.alloc(Value::Number(2.0));

        let stats = heap.collect(&[stale, live]);

        assert_eq!(stats.collected, 0);
        assert_eq!(stats.roots_scanned, 2);
        assert_eq!(heap.try_value(live), Some(&Value::Number(2.0)));
    }

    #[test]
    fn test_recollect_with_same_roots_frees_nothing() {
        let mut heap = GcHeap::new();
        let root = heap.alloc(Value::Number(7.0));
        heap.collect(&[root]);

        let stats = heap.collect(&[root]);

        assert_eq!(stats.collected, 0);
        assert_eq!(stats.live_after, 1);
        assert_eq!(heap.value(root), &Value::Number(7.0));
    }

    #[test]
    fn test_survivor_marks_reset_between_cycles() {
        let mut heap = GcHeap::new();
        let handle = heap.alloc(Value::Number(7.0));
        heap.collect(&[handle]);

        // The survivor's mark was cleared, so dropping the root frees it.
        let stats = heap.collect(&[]);

        assert_eq!(stats.collected, 1);
        assert_eq!(heap.live_count(), 0);
    }

    #[test]
    fn test_bytes_accounting() {
        let mut heap = GcHeap::new();
        let number_bytes = Value::Number(1.0).approx_bytes();
        let text = Value::Str("abcd".into());
        let text_bytes = text.approx_bytes();

        heap.alloc(Value::Number(1.0));
        heap.alloc(text);
        assert_eq!(heap.bytes_since_collect(), number_bytes + text_bytes);

        let stats = heap.collect(&[]);
        assert_eq!(stats.bytes_reclaimed, number_bytes + text_bytes);
        assert_eq!(heap.bytes_since_collect(), 0);
    }

    #[test]
    fn test_enabled_flag() {
        let mut heap = GcHeap::new();
        assert!(heap.is_enabled());
        heap.set_enabled(false);
        assert!(!heap.is_enabled());
    }

    #[test]
    fn test_try_value_rejects_out_of_range_index() {
        let mut heap = GcHeap::new();
        heap.alloc(Value::Number(1.0));

        let bogus = GcHandle::new_for_test(99, 0);
        assert_eq!(heap.try_value(bogus), None);
    }

    #[test]
    #[should_panic(expected = "stale or free handle")]
    fn test_value_panics_on_stale_handle() {
        let mut heap = GcHeap::new();
        let handle = heap.alloc(Value::Number(1.0));
        heap.collect(&[]);
        heap.value(handle);
    }

    #[test]
    fn test_telemetry_report_totals() {
        let mut heap = GcHeap::new();
        for i in 0..10 {
            heap.alloc(Value::Number(i as f64));
        }
        heap.collect(&[]);
        let survivor = heap.alloc(Value::Str("survivor".into()));
        heap.collect(&[survivor]);

        let report = heap.telemetry_report();
        assert_eq!(report.total_allocations, 11);
        assert_eq!(report.total_collections, 2);
        assert_eq!(report.total_collected, 10);
        assert_eq!(report.live_objects, 1);
        assert_eq!(report.cycles.len(), 2);
        assert_eq!(report.cycles[1].cycle_index, 1);
        assert!(report.to_string().contains("=== GC Summary ==="));
    }

    #[test]
    fn test_stress_alloc_collect_waves() {
        let mut heap = GcHeap::new();

        // 100 waves of garbage; slot storage should stay at one wave's worth.
        for _ in 0..100 {
            for i in 0..1000 {
                heap.alloc(Value::Number(i as f64));
            }
            heap.collect(&[]);
        }

        assert_eq!(heap.live_count(), 0);
        assert_eq!(heap.slots.len(), 1000);
        assert_eq!(heap.total_allocations(), 100_000);
        assert_eq!(heap.total_collections(), 100);
    }
}
