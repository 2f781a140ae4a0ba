use std::time::Duration;

use metrics::{counter, gauge, histogram};

/// Metrics collector for broadcast streams. Every series carries a `stream`
/// label.
#[derive(Clone)]
pub struct Metrics {
    prefix: &'static str,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            prefix: "gf_broadcast",
        }
    }

    pub fn subscriber_registered(&self, stream: &str) {
        counter!(format!("{}_subscribers_registered_total", self.prefix), "stream" => stream.to_string())
            .increment(1);
        gauge!(format!("{}_subscribers_active", self.prefix), "stream" => stream.to_string())
            .increment(1.0);
    }

    pub fn subscriber_unregistered(&self, stream: &str) {
        gauge!(format!("{}_subscribers_active", self.prefix), "stream" => stream.to_string())
            .decrement(1.0);
    }

    pub fn subscriber_rejected(&self, stream: &str) {
        counter!(format!("{}_subscribers_rejected_total", self.prefix), "stream" => stream.to_string())
            .increment(1);
    }

    pub fn subscriber_evicted(&self, stream: &str, reason: &str) {
        counter!(
            format!("{}_subscribers_evicted_total", self.prefix),
            "stream" => stream.to_string(),
            "reason" => reason.to_string()
        )
        .increment(1);
    }

    pub fn connection_closed(&self, stream: &str, reason: &str) {
        counter!(
            format!("{}_connections_closed_total", self.prefix),
            "stream" => stream.to_string(),
            "reason" => reason.to_string()
        )
        .increment(1);
    }

    /// One batch handed to the hub
    pub fn batch_broadcast(&self, stream: &str, reports: usize, delivered: usize) {
        counter!(format!("{}_batches_total", self.prefix), "stream" => stream.to_string())
            .increment(1);
        counter!(format!("{}_reports_total", self.prefix), "stream" => stream.to_string())
            .increment(reports as u64);
        counter!(format!("{}_deliveries_total", self.prefix), "stream" => stream.to_string())
            .increment(delivered as u64);
    }

    pub fn frame_sent(&self, stream: &str) {
        counter!(format!("{}_frames_sent_total", self.prefix), "stream" => stream.to_string())
            .increment(1);
    }

    pub fn feed_failed(&self, stream: &str) {
        counter!(format!("{}_feed_errors_total", self.prefix), "stream" => stream.to_string())
            .increment(1);
    }

    pub fn cursor_persist_failed(&self, stream: &str) {
        counter!(format!("{}_cursor_errors_total", self.prefix), "stream" => stream.to_string())
            .increment(1);
    }

    pub fn cursor_position(&self, stream: &str, seq: i64) {
        gauge!(format!("{}_cursor_seq", self.prefix), "stream" => stream.to_string())
            .set(seq as f64);
    }

    pub fn tick_duration(&self, stream: &str, duration: Duration) {
        histogram!(format!("{}_tick_duration_ms", self.prefix), "stream" => stream.to_string())
            .record(duration.as_millis() as f64);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
