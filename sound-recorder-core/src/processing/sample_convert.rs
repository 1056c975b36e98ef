/// Pure-math sample conversion for the capture pipeline.
///
/// Maps device-native buffers (any channel count, any rate, f32) to the
/// recorder's target format. All operations work on `&[f32]` with no
/// platform dependencies.
#[derive(Debug, Clone)]
pub struct SampleConverter {
    target_rate: u32,
    target_channels: u16,
}

impl SampleConverter {
    pub fn new(target_rate: u32, target_channels: u16) -> Self {
        Self {
            target_rate,
            target_channels,
        }
    }

    pub fn target_rate(&self) -> u32 {
        self.target_rate
    }

    /// Full device-to-recorder conversion: channel mapping followed by
    /// resampling. Output is interleaved in the target channel count.
    pub fn convert(&self, samples: &[f32], source_rate: u32, source_channels: u16) -> Vec<f32> {
        match self.target_channels {
            2 if source_channels == 2 => self.resample_interleaved(samples, source_rate),
            2 => {
                let mono = downmix_to_mono(samples, source_channels);
                let mono = self.resample(&mono, source_rate);
                duplicate_to_stereo(&mono)
            }
            _ => {
                let mono = downmix_to_mono(samples, source_channels);
                self.resample(&mono, source_rate)
            }
        }
    }

    /// Linear-interpolation resampling for mono audio.
    ///
    /// Returns the input unchanged when the rates already match.
    pub fn resample(&self, samples: &[f32], source_rate: u32) -> Vec<f32> {
        if source_rate == self.target_rate || samples.is_empty() {
            return samples.to_vec();
        }

        let ratio = self.target_rate as f64 / source_rate as f64;
        let output_len = (samples.len() as f64 * ratio) as usize;
        let mut output = vec![0.0f32; output_len];
        for (i, out) in output.iter_mut().enumerate() {
            let pos = i as f64 / ratio;
            let index = pos as usize;
            let fraction = (pos - index as f64) as f32;

            if index + 1 < samples.len() {
                *out = samples[index] * (1.0 - fraction) + samples[index + 1] * fraction;
            } else if index < samples.len() {
                *out = samples[index];
            }
        }
        output
    }

    /// Linear-interpolation resampling for interleaved stereo audio.
    pub fn resample_interleaved(&self, samples: &[f32], source_rate: u32) -> Vec<f32> {
        if source_rate == self.target_rate || samples.is_empty() {
            return samples.to_vec();
        }

        let frames = samples.len() / 2;
        let ratio = self.target_rate as f64 / source_rate as f64;
        let output_frames = (frames as f64 * ratio) as usize;
        let mut output = vec![0.0f32; output_frames * 2];
        for i in 0..output_frames {
            let pos = i as f64 / ratio;
            let index = pos as usize;
            let fraction = (pos - index as f64) as f32;

            for ch in 0..2usize {
                if index + 1 < frames {
                    output[i * 2 + ch] = samples[index * 2 + ch] * (1.0 - fraction)
                        + samples[(index + 1) * 2 + ch] * fraction;
                } else if index < frames {
                    output[i * 2 + ch] = samples[index * 2 + ch];
                }
            }
        }
        output
    }

    /// Convert f32 samples `[-1.0, 1.0]` to 16-bit PCM, clamping
    /// out-of-range values.
    pub fn to_i16(samples: &[f32]) -> Vec<i16> {
        samples
            .iter()
            .map(|&s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
            .collect()
    }

    /// RMS level of a sample slice (0.0–1.0 for normalized audio).
    pub fn rms_level(samples: &[f32]) -> f32 {
        if samples.is_empty() {
            return 0.0;
        }
        let sum_sq: f32 = samples.iter().map(|s| s * s).sum();
        (sum_sq / samples.len() as f32).sqrt()
    }

    /// Peak absolute level of a sample slice.
    pub fn peak_level(samples: &[f32]) -> f32 {
        samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max)
    }
}

/// Downmix interleaved multi-channel audio to mono by averaging the
/// channels of each frame.
pub fn downmix_to_mono(samples: &[f32], channels: u16) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }
    let channels = channels as usize;
    let scale = 1.0 / channels as f32;
    samples
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() * scale)
        .collect()
}

/// Duplicate a mono signal into both channels of an interleaved stereo
/// buffer.
pub fn duplicate_to_stereo(mono: &[f32]) -> Vec<f32> {
    let mut stereo = Vec::with_capacity(mono.len() * 2);
    for &sample in mono {
        stereo.push(sample);
        stereo.push(sample);
    }
    stereo
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn downmix_averages_frames() {
        let stereo = [0.2, 0.8, 0.4, 0.6];
        let mono = downmix_to_mono(&stereo, 2);

        assert_eq!(mono.len(), 2);
        assert_relative_eq!(mono[0], 0.5, epsilon = 1e-6);
        assert_relative_eq!(mono[1], 0.5, epsilon = 1e-6);
    }

    #[test]
    fn downmix_mono_is_passthrough() {
        let samples = vec![0.1, 0.2, 0.3];
        assert_eq!(downmix_to_mono(&samples, 1), samples);
    }

    #[test]
    fn duplicate_interleaves_both_channels() {
        assert_eq!(duplicate_to_stereo(&[0.1, 0.2]), vec![0.1, 0.1, 0.2, 0.2]);
    }

    #[test]
    fn resample_same_rate_is_passthrough() {
        let converter = SampleConverter::new(48_000, 1);
        let samples = vec![1.0, 2.0, 3.0];

        assert_eq!(converter.resample(&samples, 48_000), samples);
    }

    #[test]
    fn resample_upsamples_with_interpolation() {
        let converter = SampleConverter::new(48_000, 1);
        let result = converter.resample(&[0.0, 1.0], 24_000);

        assert_eq!(result.len(), 4);
        assert_relative_eq!(result[0], 0.0, epsilon = 1e-2);
        // Midpoint of the linear ramp.
        assert_relative_eq!(result[1], 0.5, epsilon = 0.1);
    }

    #[test]
    fn resample_downsamples() {
        let converter = SampleConverter::new(24_000, 1);
        let samples: Vec<f32> = (0..100).map(|i| i as f32 / 100.0).collect();

        assert_eq!(converter.resample(&samples, 48_000).len(), 50);
    }

    #[test]
    fn resample_interleaved_same_rate() {
        let converter = SampleConverter::new(48_000, 2);
        let samples = vec![1.0, 2.0, 3.0, 4.0];

        assert_eq!(converter.resample_interleaved(&samples, 48_000), samples);
    }

    #[test]
    fn convert_stereo_device_to_mono_target() {
        let converter = SampleConverter::new(48_000, 1);
        let result = converter.convert(&[0.2, 0.4, 0.6, 0.8], 48_000, 2);

        assert_eq!(result.len(), 2);
        assert_relative_eq!(result[0], 0.3, epsilon = 1e-6);
    }

    #[test]
    fn convert_mono_device_to_stereo_target() {
        let converter = SampleConverter::new(48_000, 2);
        let result = converter.convert(&[0.5, -0.5], 48_000, 1);

        assert_eq!(result, vec![0.5, 0.5, -0.5, -0.5]);
    }

    #[test]
    fn to_i16_full_scale_and_clamping() {
        let pcm = SampleConverter::to_i16(&[0.0, 1.0, -1.0, 2.0, -3.0]);

        assert_eq!(pcm[0], 0);
        assert_eq!(pcm[1], i16::MAX);
        assert_eq!(pcm[2], -i16::MAX);
        assert_eq!(pcm[3], i16::MAX);
        assert_eq!(pcm[4], -i16::MAX);
    }

    #[test]
    fn rms_of_silence_and_full_scale() {
        assert_eq!(SampleConverter::rms_level(&[0.0, 0.0]), 0.0);
        assert_relative_eq!(SampleConverter::rms_level(&[1.0, 1.0, 1.0]), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn peak_finds_largest_magnitude() {
        assert_relative_eq!(
            SampleConverter::peak_level(&[0.1, -0.5, 0.3]),
            0.5,
            epsilon = 1e-6
        );
    }
}
