//! Scripted capture fixtures shared by the session tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::{Mutex, MutexGuard};

use crate::models::device::InputDevice;
use crate::models::error::RecorderError;
use crate::traits::capture_provider::{AudioBufferCallback, CaptureProvider};

/// Serializes tests that exercise a real capture: the capture slot is
/// process-wide, so concurrently running tests would contend for it.
pub(crate) fn capture_lock() -> MutexGuard<'static, ()> {
    static LOCK: Mutex<()> = Mutex::new(());
    LOCK.lock()
}

/// Provider that feeds a fixed batch of samples every few milliseconds
/// from its own thread, like a real device callback.
pub(crate) struct MockProvider {
    batch: Vec<f32>,
    sample_rate: u32,
    channels: u16,
    available: bool,
    running: Arc<AtomicBool>,
    feeder: Option<thread::JoinHandle<()>>,
}

impl MockProvider {
    pub(crate) fn constant(value: f32, batch_len: usize, sample_rate: u32, channels: u16) -> Self {
        Self {
            batch: vec![value; batch_len],
            sample_rate,
            channels,
            available: true,
            running: Arc::new(AtomicBool::new(false)),
            feeder: None,
        }
    }

    pub(crate) fn unavailable() -> Self {
        let mut provider = Self::constant(0.0, 0, 44_100, 1);
        provider.available = false;
        provider
    }
}

impl CaptureProvider for MockProvider {
    fn is_available(&self) -> bool {
        self.available
    }

    fn start(&mut self, callback: AudioBufferCallback) -> Result<(), RecorderError> {
        self.running.store(true, Ordering::SeqCst);
        let running = Arc::clone(&self.running);
        let batch = self.batch.clone();
        let sample_rate = self.sample_rate;
        let channels = self.channels;

        self.feeder = Some(thread::spawn(move || {
            while running.load(Ordering::SeqCst) {
                callback(&batch, sample_rate, channels);
                thread::sleep(Duration::from_millis(5));
            }
        }));
        Ok(())
    }

    fn stop(&mut self) -> Result<(), RecorderError> {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.feeder.take() {
            let _ = handle.join();
        }
        Ok(())
    }

    fn device_info(&self) -> InputDevice {
        InputDevice {
            name: "mock input".into(),
            is_default: true,
        }
    }
}
