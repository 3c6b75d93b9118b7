// src/engine/tracker.rs
//
// Injected performance recording. Decoders receive an Arc<dyn DecodeRecorder>
// from their owner; there is no process-wide tracker.

use crate::DecodeMetrics;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;

/// Receives one sample per successful decode.
pub trait DecodeRecorder: Send + Sync {
    fn record(&self, decoder: &str, model_key: Option<&str>, metrics: &DecodeMetrics);
}

/// Aggregated timings for one decoder/model pair.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrackerStats {
    pub samples: u64,
    pub total: Duration,
    pub max: Duration,
    pub last_width: u32,
    pub last_height: u32,
}

impl TrackerStats {
    pub fn mean(&self) -> Duration {
        if self.samples == 0 {
            return Duration::ZERO;
        }
        self.total / self.samples as u32
    }
}

/// In-memory recorder keyed `"{decoder}:{model_key}"`.
#[derive(Debug, Default)]
pub struct PerformanceTracker {
    entries: Mutex<HashMap<String, TrackerStats>>,
}

impl PerformanceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(decoder: &str, model_key: Option<&str>) -> String {
        format!("{}:{}", decoder, model_key.unwrap_or("default"))
    }

    pub fn get(&self, decoder: &str, model_key: Option<&str>) -> Option<TrackerStats> {
        self.entries
            .lock()
            .get(&Self::key(decoder, model_key))
            .cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.lock().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl DecodeRecorder for PerformanceTracker {
    fn record(&self, decoder: &str, model_key: Option<&str>, metrics: &DecodeMetrics) {
        let elapsed = Duration::from_nanos((metrics.total_ms.max(0.0) * 1_000_000.0).round() as u64);
        let mut entries = self.entries.lock();
        let stats = entries.entry(Self::key(decoder, model_key)).or_default();
        stats.samples += 1;
        stats.total += elapsed;
        stats.max = stats.max.max(elapsed);
        stats.last_width = metrics.output_width;
        stats.last_height = metrics.output_height;
    }
}
