//! Instrumentation Wrapper
//!
//! Generic wrap-and-report measurement: brackets an arbitrary call with two
//! resource samples and emits one [`ResourceReport`] per invocation, on
//! every exit path.

use tracing::info;

use crate::probe::{ResourceReport, ResourceSample};

/// Destination for per-call resource reports.
///
/// The default [`LogSink`] writes a plain textual log line; a production
/// deployment can substitute a structured or aggregating implementation.
pub trait ReportSink: Send + Sync {
    /// Deliver one report.
    fn emit(&self, report: &ResourceReport);
}

/// Default sink: one human-readable log line per report.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ReportSink for LogSink {
    fn emit(&self, report: &ResourceReport) {
        info!(
            "[resource] '{}': {:.2} ms, mem delta {:+.4} MB, total {:.2} MB",
            report.name, report.duration_ms, report.mem_delta_mb, report.final_mem_mb
        );
    }
}

/// Takes the after-sample and emits the report in `drop`, so both run even
/// while unwinding out of the measured call.
struct ReportOnDrop<'a> {
    name: &'a str,
    before: ResourceSample,
    sink: &'a dyn ReportSink,
}

impl Drop for ReportOnDrop<'_> {
    fn drop(&mut self) {
        let after = ResourceSample::capture();
        self.sink
            .emit(&ResourceReport::between(self.name, &self.before, &after));
    }
}

/// Run `f`, measuring wall-clock time and resident memory delta around it.
///
/// Wrapping is transparent: `f`'s output is returned unchanged and a panic
/// unwinds through unchanged. No retries, no suppression. Exactly one
/// report reaches the sink per invocation, success or failure.
pub fn measure<T, F>(name: &str, sink: &dyn ReportSink, f: F) -> T
where
    F: FnOnce() -> T,
{
    let _guard = ReportOnDrop {
        name,
        before: ResourceSample::capture(),
        sink,
    };
    f()
}
