use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::models::error::RecorderError;
use crate::models::sound_buffer::SoundBuffer;
use crate::processing::wav::{self, WavSpec};
use crate::storage::metadata::{self, RecordingMetadata};

/// Write a buffer to `path` as a 16-bit PCM WAV file.
///
/// Returns the SHA-256 hex checksum of the file contents.
pub fn save_buffer(buffer: &SoundBuffer, path: &Path) -> Result<String, RecorderError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| RecorderError::StorageError(format!("failed to create directory: {e}")))?;
    }

    let spec = WavSpec {
        sample_rate: buffer.sample_rate(),
        channel_count: buffer.channel_count(),
        bit_depth: 16,
    };
    let data_len = (buffer.sample_count() * 2) as u32;

    let mut bytes = Vec::with_capacity(wav::HEADER_LEN + data_len as usize);
    bytes.extend_from_slice(&wav::encode_header(spec, data_len));
    for &sample in buffer.samples() {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }

    fs::write(path, &bytes)
        .map_err(|e| RecorderError::StorageError(format!("failed to write file: {e}")))?;
    Ok(hex_digest(&bytes))
}

/// Write a buffer plus a JSON metadata sidecar
/// (`{path}.metadata.json`). Returns the metadata that was written.
pub fn save_buffer_with_metadata(
    buffer: &SoundBuffer,
    path: &Path,
) -> Result<RecordingMetadata, RecorderError> {
    let checksum = save_buffer(buffer, path)?;
    let meta = RecordingMetadata::for_buffer(buffer, &path.to_string_lossy(), &checksum);
    metadata::write_sidecar(&meta, path)?;
    Ok(meta)
}

/// Load a 16-bit PCM WAV file into a buffer.
pub fn load_buffer(path: &Path) -> Result<SoundBuffer, RecorderError> {
    let bytes =
        fs::read(path).map_err(|e| RecorderError::StorageError(format!("failed to read file: {e}")))?;
    let (spec, data) = wav::decode(&bytes)?;

    if spec.bit_depth != 16 {
        return Err(RecorderError::MalformedWav(format!(
            "unsupported bit depth: {}",
            spec.bit_depth
        )));
    }

    let samples: Vec<i16> = data
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    if samples.is_empty() {
        return Err(RecorderError::MalformedWav("empty data chunk".into()));
    }

    SoundBuffer::from_samples(samples, spec.sample_rate, spec.channel_count)
}

fn hex_digest(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}
