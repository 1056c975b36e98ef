//! # sound-recorder-core
//!
//! Platform-agnostic sound recording core library.
//!
//! Records audio samples from an input device into an in-memory
//! [`SoundBuffer`], with sample conversion, metering, and WAV file I/O.
//! Platform-specific backends implement the [`CaptureProvider`] trait
//! and plug into the generic [`CaptureEngine`]; `sound-recorder-cpal`
//! ships the cross-platform device backend.
//!
//! Capture runs on its own threads so `start` never blocks the caller,
//! and only one capture can be active at a time, process-wide.
//!
//! ## Architecture
//!
//! ```text
//! sound-recorder-core (this crate)
//! ├── traits/       ← CaptureProvider, SoundRecorder, SampleSink, CaptureDelegate
//! ├── models/       ← RecorderError, RecorderState, RecorderConfig, SoundBuffer, ...
//! ├── processing/   ← SampleConverter, SampleRing, WAV codec
//! ├── session/      ← CaptureEngine (orchestrator), SoundBufferRecorder
//! └── storage/      ← WAV file save/load, metadata sidecar
//! ```

pub mod models;
pub mod processing;
pub mod session;
pub mod storage;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use models::config::RecorderConfig;
pub use models::device::{CaptureDiagnostics, InputDevice, SignalLevels};
pub use models::error::RecorderError;
pub use models::sound_buffer::SoundBuffer;
pub use models::state::RecorderState;
pub use processing::sample_convert::SampleConverter;
pub use processing::sample_ring::SampleRing;
pub use session::buffer_recorder::SoundBufferRecorder;
pub use session::engine::CaptureEngine;
pub use storage::metadata::RecordingMetadata;
pub use traits::capture_delegate::CaptureDelegate;
pub use traits::capture_provider::{AudioBufferCallback, CaptureProvider};
pub use traits::recorder::SoundRecorder;
pub use traits::sample_sink::SampleSink;
