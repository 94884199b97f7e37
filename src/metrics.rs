use metrics::{Counter, Histogram};
use std::time::Duration;

/// Gateway counters and timings
///
/// Handles are noop until a recorder is installed, so recording is always
/// safe to call.
pub struct Metrics {
    pub renders_completed: Counter,
    pub renders_failed: Counter,
    pub redirects: Counter,
    pub render_duration: Histogram,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            renders_completed: Counter::noop(),
            renders_failed: Counter::noop(),
            redirects: Counter::noop(),
            render_duration: Histogram::noop(),
        }
    }

    pub fn record_render(&self, duration: Duration, success: bool) {
        if success {
            self.renders_completed.increment(1);
        } else {
            self.renders_failed.increment(1);
        }
        self.render_duration.record(duration.as_secs_f64());
    }

    pub fn record_redirect(&self) {
        self.redirects.increment(1);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
