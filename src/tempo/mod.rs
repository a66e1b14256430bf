//! Offline tempo estimation.
//!
//! Six pure stages, each consuming the previous one's output:
//! downmix + pre-emphasis, frame-energy flux, adaptive peak picking,
//! debounce, interval clustering and BPM resolution.

pub mod cluster;
pub mod debounce;
pub mod onset;
pub mod peaks;
pub mod preprocess;
pub mod resolve;

use serde::{Deserialize, Serialize};

use crate::audio::pcm::RawAudioBuffer;

/// Tunables for one analysis run. `Default` reproduces the reference constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TempoParams {
    pub frame_size: usize,
    pub hop_size: usize,
    /// Pre-emphasis coefficient applied to the previous unfiltered sample.
    pub pre_emphasis: f64,
    /// Standard deviations above the local mean an onset must exceed.
    pub threshold_k: f64,
    /// Debounce spacing between kept onsets (seconds).
    pub min_onset_interval: f64,
    /// Fewer filtered onsets than this falls back to `fallback_bpm`.
    pub min_onsets: usize,
    /// Max distance (seconds) between an interval and a cluster mean.
    pub cluster_tolerance: f64,
    pub fallback_bpm: u32,
    pub min_bpm: u32,
    pub max_bpm: u32,
}

impl Default for TempoParams {
    fn default() -> Self {
        Self {
            frame_size: 1024,
            hop_size: 256,
            pre_emphasis: 0.95,
            threshold_k: 1.5,
            min_onset_interval: 0.25,
            min_onsets: 8,
            cluster_tolerance: 0.05,
            fallback_bpm: 120,
            min_bpm: 60,
            max_bpm: 200,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Not enough onsets; `bpm` is the fallback value.
    Low,
    Estimated,
}

/// Final output of one analysis run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TempoEstimate {
    pub bpm: u32,
    /// Seconds of audio, derived from the buffer length.
    pub duration: f64,
    pub confidence: Confidence,
}

/// An estimate together with the intermediate results that produced it.
#[derive(Clone, Debug, PartialEq)]
pub struct TempoAnalysis {
    pub estimate: TempoEstimate,
    /// Debounced onset timestamps in seconds.
    pub onsets: Vec<f64>,
    pub dominant_interval: Option<f64>,
}

/// Run the full pipeline on a PCM buffer. Always yields an estimate.
pub fn analyze(buffer: &RawAudioBuffer, params: &TempoParams) -> TempoAnalysis {
    let sample_rate = f64::from(buffer.sample_rate());
    let duration = buffer.duration_seconds();

    let mono = preprocess::downmix(buffer.samples());
    let filtered = preprocess::pre_emphasis(&mono, params.pre_emphasis);

    let strengths = onset::onset_strength(&filtered, params.frame_size, params.hop_size);
    let window = peaks::window_size(buffer.sample_rate(), params.hop_size);
    let raw_onsets = peaks::pick_peaks(
        &strengths,
        window,
        params.threshold_k,
        params.hop_size,
        sample_rate,
    );
    let onsets = debounce::debounce(&raw_onsets, params.min_onset_interval);

    log::debug!(
        "{} frames, {} onsets ({} after debounce)",
        strengths.len(),
        raw_onsets.len(),
        onsets.len()
    );

    let dominant_interval =
        cluster::dominant_interval(&onsets, params.min_onsets, params.cluster_tolerance);
    if dominant_interval.is_none() {
        log::info!(
            "Insufficient onsets detected ({}), using default BPM: {}",
            onsets.len(),
            params.fallback_bpm
        );
    }

    let estimate = resolve::resolve_bpm(dominant_interval, duration, params);
    log::info!(
        "Detected BPM: {}, Duration: {:.2}s, Onsets: {}",
        estimate.bpm,
        estimate.duration,
        onsets.len()
    );

    TempoAnalysis {
        estimate,
        onsets,
        dominant_interval,
    }
}
