use super::error::RecorderError;

/// Recorder state machine.
///
/// State transitions:
/// ```text
/// idle → recording → stopping → completed
///            ↓                      ↓
///          failed ←────────── (start again)
/// ```
///
/// `completed` and `failed` are restartable: a new capture clears the
/// previous outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum RecorderState {
    Idle,
    Recording { duration_secs: f64 },
    Stopping,
    Completed { duration_secs: f64 },
    Failed(RecorderError),
}

impl RecorderState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_recording(&self) -> bool {
        matches!(self, Self::Recording { .. })
    }

    /// Whether a new capture may be started from this state.
    pub fn can_start(&self) -> bool {
        matches!(self, Self::Idle | Self::Completed { .. } | Self::Failed(_))
    }

    /// Returns the tracked capture duration, if any.
    pub fn duration(&self) -> Option<f64> {
        match self {
            Self::Recording { duration_secs } | Self::Completed { duration_secs } => {
                Some(*duration_secs)
            }
            _ => None,
        }
    }
}
