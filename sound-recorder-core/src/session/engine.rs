use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::models::config::RecorderConfig;
use crate::models::device::{CaptureDiagnostics, InputDevice, SignalLevels};
use crate::models::error::RecorderError;
use crate::models::state::RecorderState;
use crate::processing::sample_convert::SampleConverter;
use crate::processing::sample_ring::SampleRing;
use crate::traits::capture_delegate::CaptureDelegate;
use crate::traits::capture_provider::{AudioBufferCallback, CaptureProvider};
use crate::traits::recorder::SoundRecorder;
use crate::traits::sample_sink::SampleSink;

/// Process-wide capture slot. Only one capture can be active at a time;
/// a second `start` fails with `CaptureInProgress` until the first
/// capture stops.
static CAPTURE_SLOT: AtomicBool = AtomicBool::new(false);

/// Internal mutable engine state, protected by `parking_lot::Mutex`.
struct Shared {
    state: RecorderState,
    levels: SignalLevels,
    diagnostics: CaptureDiagnostics,
    capture_start: Option<Instant>,
}

impl Shared {
    fn new() -> Self {
        Self {
            state: RecorderState::Idle,
            levels: SignalLevels::default(),
            diagnostics: CaptureDiagnostics::default(),
            capture_start: None,
        }
    }

    fn elapsed_secs(&self) -> f64 {
        self.capture_start
            .map(|start| start.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }
}

/// Capture orchestrator, generic over the device backend and the
/// sample consumer.
///
/// Data flow:
/// ```text
/// [CaptureProvider] → convert/meter → [SampleRing] → processing thread → [SampleSink]
/// ```
///
/// The provider callback runs on the device's capture thread and does
/// only conversion, metering, and an enqueue. A processing thread
/// drains the ring every `processing_interval` and feeds the sink with
/// 16-bit chunks; a timer thread keeps the `Recording` duration and
/// delegate levels fresh.
pub struct CaptureEngine<P: CaptureProvider, S: SampleSink> {
    provider: P,
    sink: Arc<Mutex<S>>,
    config: RecorderConfig,
    sample_rate: u32,
    shared: Arc<Mutex<Shared>>,
    delegate: Option<Arc<dyn CaptureDelegate>>,

    // Sample queue shared between the device callback and the
    // processing thread. Replaced on every start.
    queue: Arc<Mutex<SampleRing>>,

    processing_running: Arc<AtomicBool>,
    processing_handle: Option<thread::JoinHandle<()>>,
    timer_running: Arc<AtomicBool>,
    timer_handle: Option<thread::JoinHandle<()>>,

    // Set when the sink declines further chunks.
    sink_halted: Arc<AtomicBool>,
    holds_slot: bool,
}

impl<P: CaptureProvider, S: SampleSink> CaptureEngine<P, S> {
    pub fn new(provider: P, sink: S) -> Self {
        let config = RecorderConfig::default();
        let sample_rate = config.default_sample_rate;
        Self {
            provider,
            sink: Arc::new(Mutex::new(sink)),
            config,
            sample_rate,
            shared: Arc::new(Mutex::new(Shared::new())),
            delegate: None,
            queue: Arc::new(Mutex::new(SampleRing::with_capacity(1))), // placeholder, replaced on start
            processing_running: Arc::new(AtomicBool::new(false)),
            processing_handle: None,
            timer_running: Arc::new(AtomicBool::new(false)),
            timer_handle: None,
            sink_halted: Arc::new(AtomicBool::new(false)),
            holds_slot: false,
        }
    }

    pub fn with_config(provider: P, sink: S, config: RecorderConfig) -> Result<Self, RecorderError> {
        config.validate().map_err(RecorderError::InvalidConfiguration)?;
        let mut engine = Self::new(provider, sink);
        engine.sample_rate = config.default_sample_rate;
        engine.config = config;
        Ok(engine)
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn CaptureDelegate>) {
        self.delegate = Some(delegate);
    }

    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }

    pub fn diagnostics(&self) -> CaptureDiagnostics {
        self.shared.lock().diagnostics.clone()
    }

    /// Information about the device backing this engine.
    pub fn device_info(&self) -> InputDevice {
        self.provider.device_info()
    }

    // --- Internal helpers ---

    fn set_state(&self, new_state: RecorderState) {
        {
            self.shared.lock().state = new_state.clone();
        }
        if let Some(ref delegate) = self.delegate {
            delegate.on_state_changed(&new_state);
        }
    }

    fn release_slot(&mut self) {
        if self.holds_slot {
            CAPTURE_SLOT.store(false, Ordering::SeqCst);
            self.holds_slot = false;
        }
    }

    fn chunk_len(&self) -> usize {
        let frames = (self.sample_rate as f64 * self.config.processing_interval.as_secs_f64()) as usize;
        frames.max(1) * self.config.channel_count as usize
    }

    /// Everything after the capture slot is held. On error the caller
    /// releases the slot and records the failure.
    fn begin_capture(&mut self, sample_rate: u32) -> Result<(), RecorderError> {
        if !self.sink.lock().on_start(sample_rate, self.config.channel_count) {
            return Err(RecorderError::InvalidConfiguration(
                "sample sink refused the capture".into(),
            ));
        }

        self.sample_rate = sample_rate;
        let converter = SampleConverter::new(sample_rate, self.config.channel_count);

        let queue_capacity = (sample_rate as f64 * self.config.queue_seconds) as usize
            * self.config.channel_count as usize;
        let queue = Arc::new(Mutex::new(SampleRing::with_capacity(queue_capacity.max(1))));
        self.queue = Arc::clone(&queue);

        {
            let mut shared = self.shared.lock();
            shared.levels = SignalLevels::default();
            shared.diagnostics = CaptureDiagnostics::default();
            shared.capture_start = None;
        }
        self.sink_halted.store(false, Ordering::SeqCst);

        // Device callback: convert to the target format, meter, enqueue.
        let callback: AudioBufferCallback = {
            let queue = Arc::clone(&queue);
            let shared = Arc::clone(&self.shared);
            let converter = converter.clone();
            Arc::new(move |samples: &[f32], source_rate: u32, source_channels: u16| {
                let converted = converter.convert(samples, source_rate, source_channels);
                let rms = SampleConverter::rms_level(&converted);
                let peak = SampleConverter::peak_level(&converted);
                let dropped = queue.lock().push(&converted);

                let mut s = shared.lock();
                s.levels = SignalLevels { rms, peak };
                s.diagnostics.callback_count += 1;
                s.diagnostics.samples_captured += converted.len() as u64;
                s.diagnostics.samples_dropped += dropped as u64;
            })
        };

        self.provider.start(callback)?;

        self.shared.lock().capture_start = Some(Instant::now());
        self.set_state(RecorderState::Recording { duration_secs: 0.0 });

        self.spawn_processing_thread();
        self.spawn_duration_timer();

        log::debug!(
            "capture started at {} Hz, {} channel(s)",
            sample_rate,
            self.config.channel_count
        );
        Ok(())
    }

    /// Drains the queue every `processing_interval` and feeds the sink.
    fn spawn_processing_thread(&mut self) {
        self.processing_running.store(true, Ordering::SeqCst);

        let running = Arc::clone(&self.processing_running);
        let halted = Arc::clone(&self.sink_halted);
        let queue = Arc::clone(&self.queue);
        let shared = Arc::clone(&self.shared);
        let sink = Arc::clone(&self.sink);
        let interval = self.config.processing_interval;
        let chunk_len = self.chunk_len();

        let handle = thread::Builder::new()
            .name("capture-processing".into())
            .spawn(move || {
                while running.load(Ordering::SeqCst) {
                    thread::sleep(interval);
                    if halted.load(Ordering::SeqCst) {
                        continue;
                    }
                    drain_chunk(&queue, &sink, &shared, &halted, chunk_len);
                }
            })
            .expect("failed to spawn processing thread");

        self.processing_handle = Some(handle);
    }

    /// Updates the `Recording` duration and delegate levels every 250 ms.
    fn spawn_duration_timer(&mut self) {
        self.timer_running.store(true, Ordering::SeqCst);

        let running = Arc::clone(&self.timer_running);
        let shared = Arc::clone(&self.shared);
        let delegate = self.delegate.clone();

        let handle = thread::Builder::new()
            .name("capture-timer".into())
            .spawn(move || {
                while running.load(Ordering::SeqCst) {
                    thread::sleep(Duration::from_millis(250));

                    let mut current = None;
                    {
                        let mut s = shared.lock();
                        if s.state.is_recording() {
                            let duration_secs = s.elapsed_secs();
                            s.state = RecorderState::Recording { duration_secs };
                            current = Some(s.levels);
                        }
                    }
                    if let (Some(levels), Some(d)) = (current, delegate.as_ref()) {
                        d.on_levels_updated(&levels);
                    }
                }
            })
            .expect("failed to spawn timer thread");

        self.timer_handle = Some(handle);
    }

    /// Hand any samples still queued to the sink (used at stop, after
    /// the threads have been joined).
    fn drain_remaining(&self) {
        let chunk_len = self.chunk_len();
        while !self.sink_halted.load(Ordering::SeqCst) && !self.queue.lock().is_empty() {
            drain_chunk(&self.queue, &self.sink, &self.shared, &self.sink_halted, chunk_len);
        }
    }
}

impl<P: CaptureProvider, S: SampleSink> SoundRecorder for CaptureEngine<P, S> {
    fn state(&self) -> RecorderState {
        self.shared.lock().state.clone()
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn current_levels(&self) -> SignalLevels {
        self.shared.lock().levels
    }

    fn start(&mut self, sample_rate: u32) -> Result<(), RecorderError> {
        if sample_rate == 0 {
            return Err(RecorderError::InvalidConfiguration(
                "sample rate must be positive".into(),
            ));
        }
        self.config
            .validate()
            .map_err(RecorderError::InvalidConfiguration)?;
        if !self.shared.lock().state.can_start() {
            return Err(RecorderError::CaptureInProgress);
        }
        if !self.provider.is_available() {
            return Err(RecorderError::DeviceNotAvailable);
        }
        if CAPTURE_SLOT
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(RecorderError::CaptureInProgress);
        }
        self.holds_slot = true;

        match self.begin_capture(sample_rate) {
            Ok(()) => Ok(()),
            Err(e) => {
                self.release_slot();
                self.set_state(RecorderState::Failed(e.clone()));
                if let Some(ref delegate) = self.delegate {
                    delegate.on_error(&e);
                }
                Err(e)
            }
        }
    }

    fn stop(&mut self) -> Result<(), RecorderError> {
        if !self.shared.lock().state.is_recording() {
            return Err(RecorderError::NotCapturing);
        }
        self.set_state(RecorderState::Stopping);

        if let Err(e) = self.provider.stop() {
            log::error!("capture provider failed to stop: {e}");
        }

        self.processing_running.store(false, Ordering::SeqCst);
        self.timer_running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.processing_handle.take() {
            let _ = handle.join();
        }
        if let Some(handle) = self.timer_handle.take() {
            let _ = handle.join();
        }

        self.drain_remaining();
        self.sink.lock().on_stop();

        let duration_secs = self.shared.lock().elapsed_secs();
        self.release_slot();
        self.set_state(RecorderState::Completed { duration_secs });

        log::debug!("capture stopped after {duration_secs:.2}s");
        Ok(())
    }
}

impl<P: CaptureProvider, S: SampleSink> Drop for CaptureEngine<P, S> {
    fn drop(&mut self) {
        if self.shared.lock().state.is_recording() {
            if let Err(e) = self.stop() {
                log::error!("failed to stop capture on drop: {e}");
            }
        }
    }
}

/// One drain cycle: pop a chunk, convert to 16-bit PCM, feed the sink.
fn drain_chunk<S: SampleSink>(
    queue: &Mutex<SampleRing>,
    sink: &Mutex<S>,
    shared: &Mutex<Shared>,
    halted: &AtomicBool,
    chunk_len: usize,
) {
    let samples = queue.lock().pop(chunk_len);
    if samples.is_empty() {
        return;
    }

    let pcm = SampleConverter::to_i16(&samples);
    let keep_going = sink.lock().on_samples(&pcm);

    shared.lock().diagnostics.chunks_processed += 1;

    if !keep_going {
        log::debug!("sample sink halted chunk delivery");
        halted.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::support::{capture_lock, MockProvider};
    use std::time::Duration;

    struct CollectSink {
        store: Arc<Mutex<Vec<i16>>>,
        chunk_limit: Option<usize>,
        stopped: Arc<AtomicBool>,
    }

    impl CollectSink {
        fn new() -> (Self, Arc<Mutex<Vec<i16>>>, Arc<AtomicBool>) {
            let store = Arc::new(Mutex::new(Vec::new()));
            let stopped = Arc::new(AtomicBool::new(false));
            (
                Self {
                    store: Arc::clone(&store),
                    chunk_limit: None,
                    stopped: Arc::clone(&stopped),
                },
                store,
                stopped,
            )
        }
    }

    impl SampleSink for CollectSink {
        fn on_samples(&mut self, samples: &[i16]) -> bool {
            let mut store = self.store.lock();
            store.extend_from_slice(samples);
            match self.chunk_limit {
                Some(limit) => store.len() < limit,
                None => true,
            }
        }

        fn on_stop(&mut self) {
            self.stopped.store(true, Ordering::SeqCst);
        }
    }

    fn fast_config() -> RecorderConfig {
        RecorderConfig {
            processing_interval: Duration::from_millis(20),
            ..Default::default()
        }
    }

    #[test]
    fn capture_collects_converted_samples() {
        let _guard = capture_lock();

        let provider = MockProvider::constant(0.5, 441, 44_100, 1);
        let (sink, store, stopped) = CollectSink::new();
        let mut engine = CaptureEngine::with_config(provider, sink, fast_config()).unwrap();

        engine.start(44_100).unwrap();
        assert!(engine.state().is_recording());
        thread::sleep(Duration::from_millis(150));
        engine.stop().unwrap();

        let samples = store.lock();
        assert!(!samples.is_empty());
        let expected = (0.5f32 * i16::MAX as f32) as i16;
        assert!(samples.iter().all(|&s| s == expected));
        assert!(stopped.load(Ordering::SeqCst));

        assert!(matches!(engine.state(), RecorderState::Completed { duration_secs } if duration_secs > 0.0));

        let diagnostics = engine.diagnostics();
        assert!(diagnostics.callback_count > 0);
        assert!(diagnostics.chunks_processed > 0);
    }

    #[test]
    fn only_one_capture_at_a_time() {
        let _guard = capture_lock();

        let (sink_a, _, _) = CollectSink::new();
        let mut first = CaptureEngine::with_config(
            MockProvider::constant(0.1, 100, 44_100, 1),
            sink_a,
            fast_config(),
        )
        .unwrap();

        let (sink_b, _, _) = CollectSink::new();
        let mut second = CaptureEngine::with_config(
            MockProvider::constant(0.1, 100, 44_100, 1),
            sink_b,
            fast_config(),
        )
        .unwrap();

        first.start(44_100).unwrap();
        assert_eq!(second.start(44_100), Err(RecorderError::CaptureInProgress));

        first.stop().unwrap();
        second.start(44_100).unwrap();
        second.stop().unwrap();
    }

    #[test]
    fn stop_without_capture_fails() {
        let (sink, _, _) = CollectSink::new();
        let mut engine =
            CaptureEngine::new(MockProvider::constant(0.0, 10, 44_100, 1), sink);

        assert_eq!(engine.stop(), Err(RecorderError::NotCapturing));
    }

    #[test]
    fn zero_sample_rate_is_rejected() {
        let _guard = capture_lock();

        let (sink, _, _) = CollectSink::new();
        let mut engine =
            CaptureEngine::new(MockProvider::constant(0.0, 10, 44_100, 1), sink);

        assert!(matches!(
            engine.start(0),
            Err(RecorderError::InvalidConfiguration(_))
        ));
        assert!(engine.state().is_idle());

        // The failed start must not leak the capture slot.
        engine.start(44_100).unwrap();
        engine.stop().unwrap();
    }

    #[test]
    fn unavailable_device_is_rejected() {
        let _guard = capture_lock();

        let (sink, _, _) = CollectSink::new();
        let mut engine = CaptureEngine::new(MockProvider::unavailable(), sink);

        assert_eq!(engine.start(44_100), Err(RecorderError::DeviceNotAvailable));
        assert!(engine.state().is_idle());
    }

    #[test]
    fn sink_halt_stops_chunk_delivery() {
        let _guard = capture_lock();

        let (mut sink, store, _) = CollectSink::new();
        sink.chunk_limit = Some(100);
        let mut engine = CaptureEngine::with_config(
            MockProvider::constant(0.2, 441, 44_100, 1),
            sink,
            fast_config(),
        )
        .unwrap();

        engine.start(44_100).unwrap();
        thread::sleep(Duration::from_millis(200));
        let after_halt = store.lock().len();
        thread::sleep(Duration::from_millis(100));
        assert_eq!(store.lock().len(), after_halt);

        engine.stop().unwrap();
    }

    #[test]
    fn drop_mid_capture_releases_the_slot() {
        let _guard = capture_lock();

        {
            let (sink, _, _) = CollectSink::new();
            let mut engine = CaptureEngine::with_config(
                MockProvider::constant(0.1, 100, 44_100, 1),
                sink,
                fast_config(),
            )
            .unwrap();
            engine.start(44_100).unwrap();
            // Dropped while recording.
        }

        let (sink, _, _) = CollectSink::new();
        let mut engine = CaptureEngine::with_config(
            MockProvider::constant(0.1, 100, 44_100, 1),
            sink,
            fast_config(),
        )
        .unwrap();
        engine.start(44_100).unwrap();
        engine.stop().unwrap();
    }

    #[test]
    fn restart_after_completion() {
        let _guard = capture_lock();

        let (sink, store, _) = CollectSink::new();
        let mut engine = CaptureEngine::with_config(
            MockProvider::constant(0.3, 441, 44_100, 1),
            sink,
            fast_config(),
        )
        .unwrap();

        engine.start(44_100).unwrap();
        thread::sleep(Duration::from_millis(60));
        engine.stop().unwrap();
        let first_len = store.lock().len();
        assert!(first_len > 0);

        engine.start(22_050).unwrap();
        assert_eq!(engine.sample_rate(), 22_050);
        thread::sleep(Duration::from_millis(60));
        engine.stop().unwrap();
        assert!(store.lock().len() > first_len);
    }

    #[test]
    fn delegate_observes_lifecycle() {
        let _guard = capture_lock();

        struct RecordingDelegate {
            states: Mutex<Vec<&'static str>>,
        }

        impl CaptureDelegate for RecordingDelegate {
            fn on_state_changed(&self, state: &RecorderState) {
                let name = match state {
                    RecorderState::Idle => "idle",
                    RecorderState::Recording { .. } => "recording",
                    RecorderState::Stopping => "stopping",
                    RecorderState::Completed { .. } => "completed",
                    RecorderState::Failed(_) => "failed",
                };
                self.states.lock().push(name);
            }

            fn on_levels_updated(&self, _levels: &SignalLevels) {}
            fn on_error(&self, _error: &RecorderError) {}
        }

        let delegate = Arc::new(RecordingDelegate {
            states: Mutex::new(Vec::new()),
        });

        let (sink, _, _) = CollectSink::new();
        let mut engine = CaptureEngine::with_config(
            MockProvider::constant(0.1, 100, 44_100, 1),
            sink,
            fast_config(),
        )
        .unwrap();
        engine.set_delegate(Arc::clone(&delegate) as Arc<dyn CaptureDelegate>);

        engine.start(44_100).unwrap();
        thread::sleep(Duration::from_millis(50));
        engine.stop().unwrap();

        let states = delegate.states.lock();
        assert_eq!(*states, vec!["recording", "stopping", "completed"]);
    }
}
