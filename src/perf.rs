use std::time::Duration;

use tracing::debug;

/// Running min/max/average of a timing, in milliseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PerfCounter {
    min: Option<f64>,
    max: Option<f64>,
    sum: f64,
    count: usize,
}

impl PerfCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one sample, in milliseconds.
    pub fn update(&mut self, ms: f64) {
        self.min = Some(self.min.map_or(ms, |min| min.min(ms)));
        self.max = Some(self.max.map_or(ms, |max| max.max(ms)));
        self.sum += ms;
        self.count += 1;
    }

    pub fn update_duration(&mut self, d: Duration) {
        self.update(d.as_micros() as f64 / 1_000.0);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn min(&self) -> Option<f64> {
        self.min
    }

    pub fn max(&self) -> Option<f64> {
        self.max
    }

    /// `None` until a sample is recorded
    pub fn average(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Log the current values under `tag`.
    pub fn dump(&self, tag: &str) {
        let (Some(min), Some(max), Some(avg)) = (self.min, self.max, self.average()) else {
            debug!("[{tag}] no samples");
            return;
        };

        debug!("[{tag}] min/max/avg: {min:.2}/{max:.2}/{avg:.2}");
    }
}
