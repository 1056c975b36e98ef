use std::time::Duration;

/// Configuration for a capture engine.
///
/// The capture rate itself is not part of the configuration: it is
/// passed to `start`, matching the recorder surface. Everything here
/// describes how the pipeline behaves around that rate.
#[derive(Debug, Clone, PartialEq)]
pub struct RecorderConfig {
    /// Number of recorded channels (1 = mono, 2 = interleaved stereo).
    pub channel_count: u16,

    /// How often the processing thread drains the sample queue.
    pub processing_interval: Duration,

    /// Capacity of the sample queue, in seconds of audio.
    pub queue_seconds: f64,

    /// Rate reported by `sample_rate()` before the first capture.
    pub default_sample_rate: u32,
}

impl RecorderConfig {
    pub fn validate(&self) -> Result<(), String> {
        if ![1, 2].contains(&self.channel_count) {
            return Err(format!("unsupported channel count: {}", self.channel_count));
        }
        if self.processing_interval.is_zero() {
            return Err("processing interval must be non-zero".into());
        }
        if self.queue_seconds <= 0.0 {
            return Err("queue capacity must be positive".into());
        }
        if self.default_sample_rate == 0 {
            return Err("default sample rate must be positive".into());
        }
        Ok(())
    }
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            channel_count: 1,
            processing_interval: Duration::from_millis(100),
            queue_seconds: 5.0,
            default_sample_rate: 44_100,
        }
    }
}
