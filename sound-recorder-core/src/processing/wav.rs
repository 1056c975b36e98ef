//! RIFF/WAVE PCM codec.
//!
//! Generates canonical 44-byte headers for saved buffers and parses
//! WAV data back, walking the chunk list so files with extra chunks
//! (`LIST`, `fact`, ...) still load.

use crate::models::error::RecorderError;

/// Size of the canonical WAV RIFF header in bytes.
pub const HEADER_LEN: usize = 44;

/// Format parameters recovered from (or written into) a WAV file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    pub sample_rate: u32,
    pub channel_count: u16,
    pub bit_depth: u16,
}

/// Encode a canonical 44-byte WAV header for PCM data.
///
/// Layout (all little-endian):
/// ```text
/// [0-3]    "RIFF"
/// [4-7]    file size - 8
/// [8-11]   "WAVE"
/// [12-15]  "fmt "
/// [16-19]  16 (PCM format chunk size)
/// [20-21]  1 (PCM format code)
/// [22-23]  channels
/// [24-27]  sample_rate
/// [28-31]  byte_rate = sample_rate * channels * bit_depth / 8
/// [32-33]  block_align = channels * bit_depth / 8
/// [34-35]  bit_depth
/// [36-39]  "data"
/// [40-43]  data_len
/// ```
pub fn encode_header(spec: WavSpec, data_len: u32) -> [u8; HEADER_LEN] {
    let byte_rate = spec.sample_rate * spec.channel_count as u32 * spec.bit_depth as u32 / 8;
    let block_align = spec.channel_count * spec.bit_depth / 8;

    let mut header = [0u8; HEADER_LEN];
    header[0..4].copy_from_slice(b"RIFF");
    header[4..8].copy_from_slice(&(36 + data_len).to_le_bytes());
    header[8..12].copy_from_slice(b"WAVE");

    header[12..16].copy_from_slice(b"fmt ");
    header[16..20].copy_from_slice(&16u32.to_le_bytes());
    header[20..22].copy_from_slice(&1u16.to_le_bytes());
    header[22..24].copy_from_slice(&spec.channel_count.to_le_bytes());
    header[24..28].copy_from_slice(&spec.sample_rate.to_le_bytes());
    header[28..32].copy_from_slice(&byte_rate.to_le_bytes());
    header[32..34].copy_from_slice(&block_align.to_le_bytes());
    header[34..36].copy_from_slice(&spec.bit_depth.to_le_bytes());

    header[36..40].copy_from_slice(b"data");
    header[40..44].copy_from_slice(&data_len.to_le_bytes());
    header
}

/// Decode a WAV file, returning its format and the raw data payload.
///
/// Only uncompressed PCM is accepted. The `data` chunk length is
/// clamped to the bytes actually present, so a file truncated mid-data
/// still yields its leading samples.
pub fn decode(bytes: &[u8]) -> Result<(WavSpec, &[u8]), RecorderError> {
    if bytes.len() < 12 || &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
        return Err(RecorderError::MalformedWav("missing RIFF/WAVE header".into()));
    }

    let mut spec: Option<WavSpec> = None;
    let mut data: Option<&[u8]> = None;
    let mut offset = 12;

    while offset + 8 <= bytes.len() {
        let id = &bytes[offset..offset + 4];
        let len = read_u32(bytes, offset + 4)? as usize;
        let body_start = offset + 8;

        match id {
            b"fmt " => {
                if len < 16 || body_start + 16 > bytes.len() {
                    return Err(RecorderError::MalformedWav("fmt chunk too short".into()));
                }
                let format_code = read_u16(bytes, body_start)?;
                if format_code != 1 {
                    return Err(RecorderError::MalformedWav(format!(
                        "unsupported format code: {format_code}"
                    )));
                }
                spec = Some(WavSpec {
                    channel_count: read_u16(bytes, body_start + 2)?,
                    sample_rate: read_u32(bytes, body_start + 4)?,
                    bit_depth: read_u16(bytes, body_start + 14)?,
                });
            }
            b"data" => {
                let end = (body_start + len).min(bytes.len());
                data = Some(&bytes[body_start..end]);
            }
            _ => {}
        }

        // Chunks are word-aligned: odd lengths carry a pad byte.
        offset = body_start + len + (len & 1);
    }

    let spec = spec.ok_or_else(|| RecorderError::MalformedWav("missing fmt chunk".into()))?;
    let data = data.ok_or_else(|| RecorderError::MalformedWav("missing data chunk".into()))?;
    Ok((spec, data))
}

fn read_u16(bytes: &[u8], offset: usize) -> Result<u16, RecorderError> {
    bytes
        .get(offset..offset + 2)
        .map(|b| u16::from_le_bytes([b[0], b[1]]))
        .ok_or_else(|| RecorderError::MalformedWav("unexpected end of file".into()))
}

fn read_u32(bytes: &[u8], offset: usize) -> Result<u32, RecorderError> {
    bytes
        .get(offset..offset + 4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or_else(|| RecorderError::MalformedWav("unexpected end of file".into()))
}
