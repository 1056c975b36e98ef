use serde::{Deserialize, Serialize};

/// An audio input device available for capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDevice {
    pub name: String,
    pub is_default: bool,
}

/// Real-time signal metering (RMS and peak, 0.0–1.0 for normalized audio).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SignalLevels {
    pub rms: f32,
    pub peak: f32,
}

/// Counters for debugging capture sessions.
#[derive(Debug, Clone, Default)]
pub struct CaptureDiagnostics {
    /// Device callbacks received.
    pub callback_count: u64,
    /// Samples delivered by the device, after conversion.
    pub samples_captured: u64,
    /// Chunks handed to the sample sink.
    pub chunks_processed: u64,
    /// Samples lost to queue overflow.
    pub samples_dropped: u64,
}
