//! cpal input capture provider.
//!
//! Captures audio from an input device in its native format and
//! delivers f32 samples via the `AudioBufferCallback`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use cpal::traits::{DeviceTrait, StreamTrait};
use parking_lot::Mutex;

use sound_recorder_core::models::device::InputDevice;
use sound_recorder_core::models::error::RecorderError;
use sound_recorder_core::traits::capture_provider::{AudioBufferCallback, CaptureProvider};

use crate::device_enumerator::DeviceEnumerator;

/// Audio input capture backed by cpal.
///
/// `cpal::Stream` is not `Send`, so the stream lives entirely on a
/// dedicated capture thread: built there, played there, dropped there
/// when the run flag clears. Sample buffers arrive from cpal's own
/// audio thread.
pub struct CpalInputCapture {
    /// Target device name; `None` captures from the system default.
    device_name: Option<String>,
    running: Arc<AtomicBool>,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
}

impl CpalInputCapture {
    /// Capture from the system default input device.
    ///
    /// Fails with `DeviceNotAvailable` when no input device exists.
    pub fn default_device() -> Result<Self, RecorderError> {
        if DeviceEnumerator::new().default_input_device().is_none() {
            return Err(RecorderError::DeviceNotAvailable);
        }
        Ok(Self {
            device_name: None,
            running: Arc::new(AtomicBool::new(false)),
            worker: Mutex::new(None),
        })
    }

    /// Capture from a specific input device by name.
    pub fn with_device(name: impl Into<String>) -> Self {
        Self {
            device_name: Some(name.into()),
            running: Arc::new(AtomicBool::new(false)),
            worker: Mutex::new(None),
        }
    }
}

impl CaptureProvider for CpalInputCapture {
    fn is_available(&self) -> bool {
        DeviceEnumerator::new()
            .resolve(self.device_name.as_deref())
            .is_ok()
    }

    fn start(&mut self, callback: AudioBufferCallback) -> Result<(), RecorderError> {
        if self.running.load(Ordering::SeqCst) {
            return Err(RecorderError::CaptureInProgress);
        }

        self.running.store(true, Ordering::SeqCst);
        let running = Arc::clone(&self.running);
        let device_name = self.device_name.clone();

        let handle = thread::Builder::new()
            .name("cpal-input-capture".into())
            .spawn(move || {
                if let Err(e) = capture_loop(Arc::clone(&running), device_name, callback) {
                    log::error!("input capture error: {e}");
                }
                running.store(false, Ordering::SeqCst);
            })
            .map_err(|e| {
                RecorderError::StreamFailed(format!("failed to spawn capture thread: {e}"))
            })?;

        *self.worker.lock() = Some(handle);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), RecorderError> {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.worker.lock().take() {
            let _ = handle.join();
        }
        Ok(())
    }

    fn device_info(&self) -> InputDevice {
        match self.device_name {
            Some(ref name) => InputDevice {
                name: name.clone(),
                is_default: false,
            },
            None => DeviceEnumerator::new()
                .default_input_device()
                .unwrap_or(InputDevice {
                    name: "default input".into(),
                    is_default: true,
                }),
        }
    }
}

/// Runs on the dedicated capture thread: builds the stream in the
/// device's native format, plays it, and keeps it alive until the run
/// flag clears.
fn capture_loop(
    running: Arc<AtomicBool>,
    device_name: Option<String>,
    callback: AudioBufferCallback,
) -> Result<(), RecorderError> {
    let device = DeviceEnumerator::new().resolve(device_name.as_deref())?;

    let supported = device
        .default_input_config()
        .map_err(|e| RecorderError::StreamFailed(format!("no default input config: {e}")))?;
    let sample_format = supported.sample_format();
    let config = supported.config();
    let sample_rate = config.sample_rate.0;
    let channels = config.channels;

    let err_cb = |err: cpal::StreamError| {
        log::error!("input stream error: {err}");
    };

    let stream = match sample_format {
        cpal::SampleFormat::F32 => {
            let callback = Arc::clone(&callback);
            device.build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    callback(data, sample_rate, channels);
                },
                err_cb,
                None,
            )
        }
        cpal::SampleFormat::I16 => {
            let callback = Arc::clone(&callback);
            device.build_input_stream(
                &config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    let samples: Vec<f32> =
                        data.iter().map(|&s| s as f32 / 32_768.0).collect();
                    callback(&samples, sample_rate, channels);
                },
                err_cb,
                None,
            )
        }
        cpal::SampleFormat::U16 => {
            let callback = Arc::clone(&callback);
            device.build_input_stream(
                &config,
                move |data: &[u16], _: &cpal::InputCallbackInfo| {
                    let samples: Vec<f32> = data
                        .iter()
                        .map(|&s| (s as f32 - 32_768.0) / 32_768.0)
                        .collect();
                    callback(&samples, sample_rate, channels);
                },
                err_cb,
                None,
            )
        }
        other => {
            return Err(RecorderError::StreamFailed(format!(
                "unsupported sample format: {other:?}"
            )));
        }
    }
    .map_err(|e| RecorderError::StreamFailed(format!("failed to build input stream: {e}")))?;

    stream
        .play()
        .map_err(|e| RecorderError::StreamFailed(format!("failed to start input stream: {e}")))?;

    while running.load(Ordering::SeqCst) {
        thread::sleep(Duration::from_millis(10));
    }

    drop(stream);
    Ok(())
}
