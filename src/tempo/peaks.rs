/// Half-width of the local statistics window, roughly one second of frames.
pub fn window_size(sample_rate: u32, hop_size: usize) -> usize {
    if hop_size == 0 {
        return 1;
    }
    (sample_rate as usize / hop_size).max(1)
}

/// Flag strict local maxima above `mean + k * stddev` of the surrounding
/// `2 * window + 1` frames and return their timestamps in seconds.
///
/// Frames closer than `window` to either edge are never evaluated.
pub fn pick_peaks(
    strengths: &[f64],
    window: usize,
    k: f64,
    hop_size: usize,
    sample_rate: f64,
) -> Vec<f64> {
    let window = window.max(1);
    if sample_rate <= 0.0 || strengths.len() < 2 * window + 1 {
        return Vec::new();
    }

    let span = (2 * window + 1) as f64;
    let mut onsets = Vec::new();

    for i in window..strengths.len() - window {
        let current = strengths[i];
        let local = &strengths[i - window..=i + window];

        let sum: f64 = local.iter().sum();
        let sum_sq: f64 = local.iter().map(|v| v * v).sum();
        let mean = sum / span;
        // Rounding can push the variance of a flat window slightly negative.
        let variance = (sum_sq / span - mean * mean).max(0.0);
        let threshold = mean + variance.sqrt() * k;

        if current > threshold && current > strengths[i - 1] && current > strengths[i + 1] {
            onsets.push((i * hop_size) as f64 / sample_rate);
        }
    }

    onsets
}
