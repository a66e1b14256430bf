/// Sum of squares of each full frame, stepping by `hop`.
pub fn frame_energies(signal: &[f64], frame_size: usize, hop_size: usize) -> Vec<f64> {
    if frame_size == 0 || hop_size == 0 || signal.len() < frame_size {
        return Vec::new();
    }

    (0..=signal.len() - frame_size)
        .step_by(hop_size)
        .map(|start| signal[start..start + frame_size].iter().map(|s| s * s).sum())
        .collect()
}

/// Energy-based spectral flux proxy: positive-only frame-to-frame energy increase.
///
/// One value per frame; the first frame has no predecessor and scores 0.
pub fn onset_strength(signal: &[f64], frame_size: usize, hop_size: usize) -> Vec<f64> {
    let energies = frame_energies(signal, frame_size, hop_size);
    let mut strengths = Vec::with_capacity(energies.len());
    if !energies.is_empty() {
        strengths.push(0.0);
    }
    strengths.extend(energies.windows(2).map(|w| (w[1] - w[0]).max(0.0)));
    strengths
}
