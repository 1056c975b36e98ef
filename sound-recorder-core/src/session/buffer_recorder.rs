use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::config::RecorderConfig;
use crate::models::device::{CaptureDiagnostics, InputDevice, SignalLevels};
use crate::models::error::RecorderError;
use crate::models::sound_buffer::SoundBuffer;
use crate::models::state::RecorderState;
use crate::session::engine::CaptureEngine;
use crate::traits::capture_delegate::CaptureDelegate;
use crate::traits::capture_provider::CaptureProvider;
use crate::traits::recorder::SoundRecorder;
use crate::traits::sample_sink::SampleSink;

/// Sink that collects converted chunks into a shared sample store.
struct BufferSink {
    store: Arc<Mutex<Vec<i16>>>,
}

impl SampleSink for BufferSink {
    fn on_start(&mut self, _sample_rate: u32, _channel_count: u16) -> bool {
        self.store.lock().clear();
        true
    }

    fn on_samples(&mut self, samples: &[i16]) -> bool {
        self.store.lock().extend_from_slice(samples);
        true
    }
}

/// Records audio from an input device into an in-memory `SoundBuffer`.
///
/// The captured buffer becomes readable once `stop` completes; while a
/// capture is running, `buffer` still returns the previous capture's
/// result (or `None`). Each completed capture replaces the stored
/// buffer.
pub struct SoundBufferRecorder<P: CaptureProvider> {
    engine: CaptureEngine<P, BufferSink>,
    store: Arc<Mutex<Vec<i16>>>,
    buffer: Option<SoundBuffer>,
}

impl<P: CaptureProvider> SoundBufferRecorder<P> {
    pub fn new(provider: P) -> Self {
        let store = Arc::new(Mutex::new(Vec::new()));
        let sink = BufferSink {
            store: Arc::clone(&store),
        };
        Self {
            engine: CaptureEngine::new(provider, sink),
            store,
            buffer: None,
        }
    }

    pub fn with_config(provider: P, config: RecorderConfig) -> Result<Self, RecorderError> {
        let store = Arc::new(Mutex::new(Vec::new()));
        let sink = BufferSink {
            store: Arc::clone(&store),
        };
        Ok(Self {
            engine: CaptureEngine::with_config(provider, sink, config)?,
            store,
            buffer: None,
        })
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn CaptureDelegate>) {
        self.engine.set_delegate(delegate);
    }

    /// Read-only access to the captured sound buffer.
    ///
    /// `None` until a capture has completed. Copy the buffer if it
    /// needs to outlive the recorder or be modified.
    pub fn buffer(&self) -> Option<&SoundBuffer> {
        self.buffer.as_ref()
    }

    /// Take ownership of the captured buffer, leaving `None` behind.
    pub fn take_buffer(&mut self) -> Option<SoundBuffer> {
        self.buffer.take()
    }

    pub fn device_info(&self) -> InputDevice {
        self.engine.device_info()
    }

    pub fn diagnostics(&self) -> CaptureDiagnostics {
        self.engine.diagnostics()
    }
}

impl<P: CaptureProvider> SoundRecorder for SoundBufferRecorder<P> {
    fn state(&self) -> RecorderState {
        self.engine.state()
    }

    fn sample_rate(&self) -> u32 {
        self.engine.sample_rate()
    }

    fn current_levels(&self) -> SignalLevels {
        self.engine.current_levels()
    }

    fn start(&mut self, sample_rate: u32) -> Result<(), RecorderError> {
        self.engine.start(sample_rate)
    }

    fn stop(&mut self) -> Result<(), RecorderError> {
        self.engine.stop()?;

        let samples = std::mem::take(&mut *self.store.lock());
        self.buffer = if samples.is_empty() {
            // A capture that produced nothing completes with no buffer.
            None
        } else {
            Some(SoundBuffer::from_samples(
                samples,
                self.engine.sample_rate(),
                self.engine.config().channel_count,
            )?)
        };
        Ok(())
    }
}
