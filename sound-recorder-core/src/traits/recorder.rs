use crate::models::device::SignalLevels;
use crate::models::error::RecorderError;
use crate::models::state::RecorderState;

/// The sound recorder surface.
///
/// Capture runs on its own threads so that `start` does not block the
/// caller. Only one capture can be active at a time, process-wide.
pub trait SoundRecorder: Send {
    /// Current recorder state.
    fn state(&self) -> RecorderState;

    /// The capture rate in samples per second: the rate passed to the
    /// most recent `start`, or the configured default before any
    /// capture has run.
    fn sample_rate(&self) -> u32;

    /// Current signal levels (RMS + peak).
    fn current_levels(&self) -> SignalLevels;

    /// Start capturing at `sample_rate` samples per second.
    ///
    /// 44100 samples/sec is CD quality; higher rates trade memory for
    /// fidelity.
    fn start(&mut self, sample_rate: u32) -> Result<(), RecorderError>;

    /// Stop the capture and finalize the recorded samples.
    fn stop(&mut self) -> Result<(), RecorderError>;
}
