use thiserror::Error;

/// Errors that can occur while recording or handling sound buffers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecorderError {
    #[error("no capture device available")]
    DeviceNotAvailable,

    #[error("a capture is already in progress")]
    CaptureInProgress,

    #[error("recorder is not capturing")]
    NotCapturing,

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("capture stream failed: {0}")]
    StreamFailed(String),

    #[error("storage error: {0}")]
    StorageError(String),

    #[error("malformed wav file: {0}")]
    MalformedWav(String),
}
