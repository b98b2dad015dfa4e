use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Point-in-time copy of a node's counters, for reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub node_id: String,
    pub frames_processed: u64,
    pub samples_processed: u64,
    pub errors_count: u64,
    pub avg_latency_us: u64,
}

/// Per-node processing counters, shared between the node and its owner
#[derive(Debug)]
pub struct NodeMetrics {
    node_id: String,
    frames_processed: AtomicU64,
    samples_processed: AtomicU64,
    errors_count: AtomicU64,
    total_latency_us: AtomicU64,
    latency_samples: AtomicU64,
}

impl NodeMetrics {
    pub fn new(node_id: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            frames_processed: AtomicU64::new(0),
            samples_processed: AtomicU64::new(0),
            errors_count: AtomicU64::new(0),
            total_latency_us: AtomicU64::new(0),
            latency_samples: AtomicU64::new(0),
        }
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames_processed.load(Ordering::Relaxed)
    }

    pub fn samples_processed(&self) -> u64 {
        self.samples_processed.load(Ordering::Relaxed)
    }

    pub fn errors_count(&self) -> u64 {
        self.errors_count.load(Ordering::Relaxed)
    }

    pub fn record_frame_processed(&self, samples: usize) {
        self.frames_processed.fetch_add(1, Ordering::Relaxed);
        self.samples_processed.fetch_add(samples as u64, Ordering::Relaxed);
    }

    pub fn record_error(&self) {
        self.errors_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn start_processing(&self) -> Instant {
        Instant::now()
    }

    pub fn finish_processing(&self, start: Instant) {
        let latency_us = start.elapsed().as_micros() as u64;
        self.total_latency_us.fetch_add(latency_us, Ordering::Relaxed);
        self.latency_samples.fetch_add(1, Ordering::Relaxed);
    }

    pub fn avg_latency_us(&self) -> u64 {
        let samples = self.latency_samples.load(Ordering::Relaxed);
        if samples == 0 {
            return 0;
        }
        self.total_latency_us.load(Ordering::Relaxed) / samples
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            node_id: self.node_id.clone(),
            frames_processed: self.frames_processed(),
            samples_processed: self.samples_processed(),
            errors_count: self.errors_count(),
            avg_latency_us: self.avg_latency_us(),
        }
    }

    /// Zero every counter, e.g. between runs of the same pipeline
    pub fn reset(&self) {
        for counter in [
            &self.frames_processed,
            &self.samples_processed,
            &self.errors_count,
            &self.total_latency_us,
            &self.latency_samples,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_start_at_zero() {
        let metrics = NodeMetrics::new("gain");
        assert_eq!(metrics.node_id(), "gain");
        assert_eq!(metrics.frames_processed(), 0);
        assert_eq!(metrics.samples_processed(), 0);
        assert_eq!(metrics.errors_count(), 0);
        assert_eq!(metrics.avg_latency_us(), 0);
    }

    #[test]
    fn test_record_frames_and_errors() {
        let metrics = NodeMetrics::new("gain");
        metrics.record_frame_processed(1024);
        metrics.record_frame_processed(512);
        metrics.record_error();

        assert_eq!(metrics.frames_processed(), 2);
        assert_eq!(metrics.samples_processed(), 1536);
        assert_eq!(metrics.errors_count(), 1);

        let start = metrics.start_processing();
        metrics.finish_processing(start);
        assert!(metrics.avg_latency_us() < 1_000_000);
    }

    #[test]
    fn test_snapshot_and_reset() {
        let metrics = NodeMetrics::new("trim");
        metrics.record_frame_processed(4);
        metrics.record_error();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.node_id, "trim");
        assert_eq!(snapshot.frames_processed, 1);
        assert_eq!(snapshot.samples_processed, 4);
        assert_eq!(snapshot.errors_count, 1);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["samples_processed"], 4);

        metrics.reset();
        assert_eq!(
            metrics.snapshot(),
            MetricsSnapshot {
                node_id: "trim".to_string(),
                frames_processed: 0,
                samples_processed: 0,
                errors_count: 0,
                avg_latency_us: 0,
            }
        );
    }
}
