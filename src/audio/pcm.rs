/// Sample rate assumed when the source carries no rate of its own.
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Interleaved signed 16-bit stereo PCM with an explicit sample rate.
#[derive(Clone, Debug, PartialEq)]
pub struct RawAudioBuffer {
    samples: Vec<i16>,
    sample_rate: u32,
}

impl RawAudioBuffer {
    pub fn new(samples: Vec<i16>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Interpret bytes as little-endian i16 samples. A trailing odd byte is dropped.
    pub fn from_le_bytes(bytes: &[u8], sample_rate: u32) -> Self {
        let samples = bytes
            .chunks_exact(2)
            .map(|b| i16::from_le_bytes([b[0], b[1]]))
            .collect();
        Self::new(samples, sample_rate)
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn with_sample_rate(self, sample_rate: u32) -> Self {
        Self {
            sample_rate,
            ..self
        }
    }

    /// Seconds of stereo audio, i.e. `bytes / (rate * 2 channels * 2 bytes)`.
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / (2.0 * f64::from(self.sample_rate))
    }
}
