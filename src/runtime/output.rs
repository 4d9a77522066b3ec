use std::{cell::RefCell, rc::Rc};

use crate::runtime::gc::telemetry::CycleStats;

/// Host-side output channel for a VM instance.
///
/// `PRINT` writes one line per invocation through [`Self::print_line`];
/// every completed collection cycle is reported through
/// [`Self::gc_cycle`]. The sink is handed to the VM at construction, so
/// both channels are observable in tests without a global logger.
pub trait OutputSink {
    fn print_line(&mut self, line: &str);

    /// Called once per completed collection cycle.
    fn gc_cycle(&mut self, _stats: &CycleStats) {}
}

/// Sink used by the CLI binary.
///
/// Program output goes to stdout; collection reports go to stderr so they
/// never interleave with printed values.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn print_line(&mut self, line: &str) {
        println!("{}", line);
    }

    fn gc_cycle(&mut self, stats: &CycleStats) {
        eprintln!(
            "[GC] cycle {} finished: collected {} of {} objects",
            stats.cycle_index, stats.collected, stats.live_before
        );
    }
}

/// Sink that discards everything. Used by benchmarks.
#[derive(Debug, Default)]
pub struct NullSink;

impl OutputSink for NullSink {
    fn print_line(&mut self, _line: &str) {}
}

/// Sink that records printed lines and cycle reports in memory.
///
/// Clones share the same buffers, so a test can keep one clone and hand
/// the other to the VM.
#[derive(Debug, Clone, Default)]
pub struct BufferSink {
    lines: Rc<RefCell<Vec<String>>>,
    cycles: Rc<RefCell<Vec<CycleStats>>>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the lines printed so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    /// Snapshot of the collection cycles reported so far.
    pub fn cycles(&self) -> Vec<CycleStats> {
        self.cycles.borrow().clone()
    }
}

impl OutputSink for BufferSink {
    fn print_line(&mut self, line: &str) {
        self.lines.borrow_mut().push(line.to_string());
    }

    fn gc_cycle(&mut self, stats: &CycleStats) {
        self.cycles.borrow_mut().push(*stats);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cycle(index: usize) -> CycleStats {
        CycleStats {
            cycle_index: index,
            duration_micros: 0,
            live_before: 2,
            live_after: 1,
            collected: 1,
            bytes_reclaimed: 16,
            roots_scanned: 1,
        }
    }

    #[test]
    fn test_buffer_sink_records_lines_and_cycles() {
        let mut sink = BufferSink::new();
        sink.print_line("60");
        sink.print_line("\"done\"");
        sink.gc_cycle(&cycle(0));

        assert_eq!(sink.lines(), vec!["60".to_string(), "\"done\"".to_string()]);
        assert_eq!(sink.cycles().len(), 1);
        assert_eq!(sink.cycles()[0].collected, 1);
    }

    #[test]
    fn test_buffer_sink_clones_share_storage() {
        let sink = BufferSink::new();
        let mut writer = sink.clone();
        writer.print_line("shared");

        assert_eq!(sink.lines(), vec!["shared".to_string()]);
    }
}
