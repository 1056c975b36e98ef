use std::sync::Arc;

use crate::models::device::InputDevice;
use crate::models::error::RecorderError;

/// Callback invoked when the device delivers an audio buffer.
///
/// Parameters:
/// - `samples`: interleaved f32 samples in the device's native layout.
/// - `sample_rate`: the actual device rate of the delivered audio.
/// - `channels`: number of interleaved channels.
pub type AudioBufferCallback = Arc<dyn Fn(&[f32], u32, u16) + Send + Sync + 'static>;

/// Interface for platform-specific audio input sources.
///
/// Implemented by `CpalInputCapture` in the backend crate; test code
/// supplies scripted providers.
pub trait CaptureProvider: Send + Sync {
    /// Whether this input source is currently available.
    fn is_available(&self) -> bool;

    /// Start capturing audio, delivering buffers via `callback`.
    ///
    /// The callback fires on a capture thread owned by the provider —
    /// keep processing minimal.
    fn start(&mut self, callback: AudioBufferCallback) -> Result<(), RecorderError>;

    /// Stop capturing and release device resources.
    fn stop(&mut self) -> Result<(), RecorderError>;

    /// Information about the device backing this provider.
    fn device_info(&self) -> InputDevice;
}
