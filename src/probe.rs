//! Resource Probe
//!
//! Samples process resident memory and wall-clock time, and derives
//! per-call reports from before/after sample pairs.

use std::time::Instant;

use sysinfo::System;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// A point-in-time reading of the current process: a monotonic timestamp
/// plus resident set size in megabytes.
#[derive(Debug, Clone, Copy)]
pub struct ResourceSample {
    /// When the sample was taken
    pub taken_at: Instant,
    /// Resident set size in MB
    pub rss_mb: f64,
}

impl ResourceSample {
    /// Capture a sample for the current process.
    ///
    /// Reads RSS via the OS process table. Cheap enough to call twice per
    /// request, though the read itself is included in any measurement taken
    /// around it.
    pub fn capture() -> Self {
        let taken_at = Instant::now();
        let sys = System::new_all();
        let rss_bytes = sysinfo::get_current_pid()
            .ok()
            .and_then(|pid| sys.process(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        Self {
            taken_at,
            rss_mb: rss_bytes as f64 / BYTES_PER_MB,
        }
    }
}

/// Derived measurement for one wrapped call: duration, signed memory delta,
/// and the final memory reading.
///
/// Ephemeral: emitted to a sink right after the call completes, never
/// returned to the caller.
#[derive(Debug, Clone)]
pub struct ResourceReport {
    /// Name of the measured operation
    pub name: String,
    /// Wall-clock duration in milliseconds
    pub duration_ms: f64,
    /// Memory delta in MB (negative when memory was released)
    pub mem_delta_mb: f64,
    /// Final resident memory in MB
    pub final_mem_mb: f64,
}

impl ResourceReport {
    /// Compute the report for the interval between two samples.
    pub fn between(name: &str, before: &ResourceSample, after: &ResourceSample) -> Self {
        Self {
            name: name.to_string(),
            duration_ms: after.taken_at.duration_since(before.taken_at).as_secs_f64() * 1000.0,
            mem_delta_mb: after.rss_mb - before.rss_mb,
            final_mem_mb: after.rss_mb,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_capture_reads_resident_memory() {
        let sample = ResourceSample::capture();
        // A running test process always has a nonzero RSS.
        assert!(sample.rss_mb > 0.0);
    }

    #[test]
    fn test_report_between_samples() {
        let before = ResourceSample::capture();
        std::thread::sleep(Duration::from_millis(5));
        let after = ResourceSample::capture();

        let report = ResourceReport::between("op", &before, &after);
        assert_eq!(report.name, "op");
        assert!(report.duration_ms >= 5.0);
        assert_eq!(report.final_mem_mb, after.rss_mb);
    }

    #[test]
    fn test_delta_can_be_negative() {
        let now = Instant::now();
        let before = ResourceSample {
            taken_at: now,
            rss_mb: 100.0,
        };
        let after = ResourceSample {
            taken_at: now,
            rss_mb: 90.0,
        };

        let report = ResourceReport::between("shrink", &before, &after);
        assert!(report.mem_delta_mb < 0.0);
        assert_eq!(report.mem_delta_mb, -10.0);
        assert_eq!(report.final_mem_mb, 90.0);
    }
}
