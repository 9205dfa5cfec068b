//! Timing and counter collection for LSP operations
//!
//! Disabled by default. Toggled at runtime with the
//! `zx16.server.enableBenchmarking` command.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

#[derive(Clone, Default)]
pub struct PerformanceTracker {
    measurements: Arc<Mutex<HashMap<String, Vec<Duration>>>>,
    counters: Arc<Mutex<HashMap<String, u64>>>,
    enabled: Arc<AtomicBool>,
}

fn millis(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

impl PerformanceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Enabling starts a fresh collection.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
        if enabled {
            self.reset();
        }
    }

    pub fn record(&self, operation: &str, duration: Duration) {
        if !self.is_enabled() {
            return;
        }
        self.measurements
            .lock()
            .entry(operation.to_string())
            .or_default()
            .push(duration);
    }

    pub fn increment(&self, counter: &str, amount: u64) {
        if !self.is_enabled() {
            return;
        }
        *self.counters.lock().entry(counter.to_string()).or_insert(0) += amount;
    }

    pub fn reset(&self) {
        self.measurements.lock().clear();
        self.counters.lock().clear();
    }

    pub fn generate_report(&self) -> String {
        let measurements = self.measurements.lock();
        let counters = self.counters.lock();
        let rule = "=".repeat(72);

        let mut report = String::new();
        let _ = writeln!(report, "{rule}\nZX16 LSP Server Performance Report\n{rule}\n");
        let _ = writeln!(report, "TIMING STATISTICS\n{}", "-".repeat(72));

        let mut ops: Vec<_> = measurements.iter().filter(|(_, t)| !t.is_empty()).collect();
        if ops.is_empty() {
            report.push_str("  No timing data collected\n");
        }
        ops.sort_by(|a, b| a.0.cmp(b.0));
        for (operation, times) in ops {
            let mut sorted = times.clone();
            sorted.sort();
            let count = sorted.len();
            let total: Duration = sorted.iter().sum();
            let percentile = |p: f64| sorted[((count as f64 * p) as usize).min(count - 1)];

            let _ = writeln!(report, "\n  {operation}:");
            let _ = writeln!(report, "    Calls:    {count}");
            let _ = writeln!(report, "    Total:    {:.2}ms", millis(total));
            let _ = writeln!(report, "    Avg:      {:.2}ms", millis(total / count as u32));
            let _ = writeln!(report, "    Min:      {:.2}ms", millis(sorted[0]));
            let _ = writeln!(report, "    Max:      {:.2}ms", millis(sorted[count - 1]));
            let _ = writeln!(report, "    P50:      {:.2}ms", millis(percentile(0.50)));
            let _ = writeln!(report, "    P95:      {:.2}ms", millis(percentile(0.95)));
        }

        let _ = writeln!(report, "\nCOUNTERS\n{}", "-".repeat(72));
        if counters.is_empty() {
            report.push_str("  No counter data collected\n");
        }
        let mut items: Vec<_> = counters.iter().collect();
        items.sort_by(|a, b| a.0.cmp(b.0));
        for (name, value) in items {
            let _ = writeln!(report, "  {name}: {value}");
        }
        let _ = writeln!(report, "\n{rule}");
        report
    }
}

/// RAII guard for automatic timing
pub struct TimingGuard {
    tracker: PerformanceTracker,
    operation: &'static str,
    start: Instant,
}

impl TimingGuard {
    pub fn new(tracker: &PerformanceTracker, operation: &'static str) -> Self {
        Self {
            tracker: tracker.clone(),
            operation,
            start: Instant::now(),
        }
    }
}

impl Drop for TimingGuard {
    fn drop(&mut self) {
        self.tracker.record(self.operation, self.start.elapsed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_tracker_collects_nothing() {
        let tracker = PerformanceTracker::new();
        tracker.increment("calls", 1);
        drop(TimingGuard::new(&tracker, "op"));
        let report = tracker.generate_report();
        assert!(report.contains("No timing data collected"));
        assert!(report.contains("No counter data collected"));
    }

    #[test]
    fn enabled_tracker_reports_operations() {
        let tracker = PerformanceTracker::new();
        tracker.set_enabled(true);
        tracker.record("lsp.server.hover", Duration::from_millis(3));
        tracker.record("lsp.server.hover", Duration::from_millis(1));
        tracker.increment("lsp.server.hover.calls", 2);
        let report = tracker.generate_report();
        assert!(report.contains("lsp.server.hover:"));
        assert!(report.contains("Calls:    2"));
        assert!(report.contains("lsp.server.hover.calls: 2"));

        tracker.set_enabled(true);
        assert!(tracker.generate_report().contains("No counter data collected"));
    }
}
