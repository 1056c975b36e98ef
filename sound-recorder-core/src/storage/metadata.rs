use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::models::error::RecorderError;
use crate::models::sound_buffer::SoundBuffer;

/// Metadata stored alongside a saved recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingMetadata {
    pub id: String,
    pub created_at: String,
    pub duration_secs: f64,
    pub sample_rate: u32,
    pub channel_count: u16,
    pub sample_count: u64,
    pub file_path: String,
    pub checksum: String,
}

impl RecordingMetadata {
    pub fn for_buffer(buffer: &SoundBuffer, file_path: &str, checksum: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            duration_secs: buffer.duration().as_secs_f64(),
            sample_rate: buffer.sample_rate(),
            channel_count: buffer.channel_count(),
            sample_count: buffer.sample_count() as u64,
            file_path: file_path.to_string(),
            checksum: checksum.to_string(),
        }
    }
}

/// Write metadata as a JSON sidecar file, `{recording_path}.metadata.json`.
pub fn write_sidecar(metadata: &RecordingMetadata, recording_path: &Path) -> Result<(), RecorderError> {
    let sidecar_path = recording_path.with_extension("metadata.json");
    let json = serde_json::to_string_pretty(metadata)
        .map_err(|e| RecorderError::StorageError(format!("failed to serialize metadata: {e}")))?;
    fs::write(&sidecar_path, json)
        .map_err(|e| RecorderError::StorageError(format!("failed to write metadata: {e}")))?;
    Ok(())
}

/// Read metadata from a recording's JSON sidecar file.
pub fn read_sidecar(recording_path: &Path) -> Result<RecordingMetadata, RecorderError> {
    let sidecar_path = recording_path.with_extension("metadata.json");
    let json = fs::read_to_string(&sidecar_path)
        .map_err(|e| RecorderError::StorageError(format!("failed to read metadata: {e}")))?;
    serde_json::from_str(&json)
        .map_err(|e| RecorderError::StorageError(format!("failed to parse metadata: {e}")))
}
