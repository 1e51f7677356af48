use prometheus::HistogramVec;
use std::time::{Duration, Instant};

/// A running latency measurement for one `path` of the histogram.
///
/// Unlike `prometheus::HistogramTimer`, dropping this timer records nothing,
/// and the `path` child is not even created until [`DurationTimer::observe`]
/// runs. A request whose handler panicked or whose future was cancelled
/// therefore leaves no trace in the histogram.
#[must_use = "a timer records nothing unless observed"]
pub struct DurationTimer {
    durations: HistogramVec,
    path: String,
    start: Instant,
}

impl DurationTimer {
    // ---
    pub(crate) fn start(durations: HistogramVec, path: &str) -> Self {
        Self {
            durations,
            path: path.to_string(),
            start: Instant::now(),
        }
    }

    /// Time elapsed since the timer was started.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop the timer and record the elapsed seconds. Returns the recorded value.
    pub fn observe(self) -> f64 {
        let secs = self.start.elapsed().as_secs_f64();
        self.durations.with_label_values(&[self.path.as_str()]).observe(secs);
        secs
    }
}
