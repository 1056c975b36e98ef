use crate::models::device::SignalLevels;
use crate::models::error::RecorderError;
use crate::models::state::RecorderState;

/// Event observer for capture notifications.
///
/// Methods may be called from pipeline threads; implementations
/// should marshal to their own thread if needed.
pub trait CaptureDelegate: Send + Sync {
    /// Called when the recorder state changes.
    fn on_state_changed(&self, state: &RecorderState);

    /// Called periodically with updated signal levels.
    fn on_levels_updated(&self, levels: &SignalLevels);

    /// Called when an error occurs during capture.
    fn on_error(&self, error: &RecorderError);
}
