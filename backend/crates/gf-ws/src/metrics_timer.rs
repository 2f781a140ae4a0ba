use crate::Metrics;

use std::time::Instant;

/// Times one broadcast tick
pub struct MetricsTimer {
    start: Instant,
    metrics: Metrics,
    stream: String,
}

impl MetricsTimer {
    pub fn new(metrics: Metrics, stream: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            metrics,
            stream: stream.into(),
        }
    }

    pub fn finish(self) {
        let duration = self.start.elapsed();
        self.metrics.tick_duration(&self.stream, duration);
    }
}
