/// Consumer of converted sample chunks.
///
/// The capture engine hands each drained chunk — already mapped to the
/// recorder's channel layout, resampled, and converted to 16-bit PCM —
/// to its sink on the processing thread. `SoundBufferRecorder` uses a
/// sink that collects into memory; custom sinks can stream chunks to a
/// file, a socket, or an encoder.
pub trait SampleSink: Send + 'static {
    /// Called once, synchronously, when a capture starts.
    ///
    /// Return `false` to refuse the capture.
    fn on_start(&mut self, sample_rate: u32, channel_count: u16) -> bool {
        let _ = (sample_rate, channel_count);
        true
    }

    /// Called with each converted chunk of interleaved samples.
    ///
    /// Return `false` to halt delivery. The device stream keeps running
    /// until the recorder's `stop`; subsequent samples are discarded.
    fn on_samples(&mut self, samples: &[i16]) -> bool;

    /// Called after the final chunk, once the capture has stopped.
    fn on_stop(&mut self) {}
}
