//! # sound-recorder-cpal
//!
//! Cross-platform device backend for sound-recorder-kit, built on
//! cpal.
//!
//! Provides:
//! - `CpalInputCapture` — input capture via the host's audio API
//!   (ALSA/PulseAudio, CoreAudio, WASAPI)
//! - `DeviceEnumerator` — input device listing and lookup
//!
//! ## Usage
//! ```ignore
//! use sound_recorder_core::SoundRecorder;
//! use sound_recorder_cpal::default_recorder;
//!
//! let mut recorder = default_recorder()?;
//! recorder.start(44_100)?;
//! // ... capture runs on its own thread ...
//! recorder.stop()?;
//! let buffer = recorder.buffer().expect("captured audio");
//! ```

pub mod device_enumerator;
pub mod input_capture;

pub use device_enumerator::DeviceEnumerator;
pub use input_capture::CpalInputCapture;

use sound_recorder_core::{RecorderError, SoundBufferRecorder};

/// A `SoundBufferRecorder` over the system default input device.
///
/// Fails with `DeviceNotAvailable` when no input device exists.
pub fn default_recorder() -> Result<SoundBufferRecorder<CpalInputCapture>, RecorderError> {
    Ok(SoundBufferRecorder::new(CpalInputCapture::default_device()?))
}
