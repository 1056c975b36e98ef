use std::path::Path;
use std::time::Duration;

use super::error::RecorderError;
use crate::storage::wav_file;

/// An in-memory container of captured audio samples.
///
/// Samples are interleaved 16-bit PCM. A buffer is immutable once
/// built: the recorder produces a fresh one per completed capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundBuffer {
    samples: Vec<i16>,
    sample_rate: u32,
    channel_count: u16,
}

impl SoundBuffer {
    /// Build a buffer from interleaved samples.
    ///
    /// Fails on an empty sample slice, a zero sample rate, or a channel
    /// count other than 1 or 2.
    pub fn from_samples(
        samples: Vec<i16>,
        sample_rate: u32,
        channel_count: u16,
    ) -> Result<Self, RecorderError> {
        if samples.is_empty() {
            return Err(RecorderError::InvalidConfiguration(
                "sound buffer cannot be empty".into(),
            ));
        }
        if sample_rate == 0 {
            return Err(RecorderError::InvalidConfiguration(
                "sample rate must be positive".into(),
            ));
        }
        if ![1, 2].contains(&channel_count) {
            return Err(RecorderError::InvalidConfiguration(format!(
                "unsupported channel count: {channel_count}"
            )));
        }
        Ok(Self {
            samples,
            sample_rate,
            channel_count,
        })
    }

    /// Read-only access to the interleaved samples.
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    /// Total number of samples across all channels.
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Number of frames (one sample per channel).
    pub fn frame_count(&self) -> usize {
        self.samples.len() / self.channel_count as usize
    }

    /// Number of samples captured per second, per channel.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channel_count(&self) -> u16 {
        self.channel_count
    }

    /// Playback duration of the buffer.
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.frame_count() as f64 / self.sample_rate as f64)
    }

    /// Write the buffer to a PCM WAV file. Returns the SHA-256 hex
    /// checksum of the written file.
    pub fn save_to_file(&self, path: &Path) -> Result<String, RecorderError> {
        wav_file::save_buffer(self, path)
    }

    /// Load a buffer from a PCM WAV file.
    pub fn load_from_file(path: &Path) -> Result<Self, RecorderError> {
        wav_file::load_buffer(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_samples_rejects_empty_input() {
        assert!(SoundBuffer::from_samples(Vec::new(), 44_100, 1).is_err());
    }

    #[test]
    fn from_samples_rejects_zero_rate_and_odd_channels() {
        assert!(SoundBuffer::from_samples(vec![0i16; 4], 0, 1).is_err());
        assert!(SoundBuffer::from_samples(vec![0i16; 4], 44_100, 3).is_err());
    }

    #[test]
    fn duration_mono() {
        let buffer = SoundBuffer::from_samples(vec![0i16; 44_100], 44_100, 1).unwrap();
        assert_eq!(buffer.duration(), Duration::from_secs(1));
        assert_eq!(buffer.frame_count(), 44_100);
    }

    #[test]
    fn duration_stereo_counts_frames() {
        // 2 seconds of stereo at 22050 Hz = 88200 interleaved samples.
        let buffer = SoundBuffer::from_samples(vec![0i16; 88_200], 22_050, 2).unwrap();
        assert_eq!(buffer.frame_count(), 44_100);
        assert_eq!(buffer.duration(), Duration::from_secs(2));
    }
}
