/// Average interleaved stereo pairs into one mono sample per frame.
///
/// A trailing unpaired sample is dropped.
pub fn downmix(interleaved: &[i16]) -> Vec<f64> {
    interleaved
        .chunks_exact(2)
        .map(|pair| (f64::from(pair[0]) + f64::from(pair[1])) / 2.0)
        .collect()
}

/// One-pole pre-emphasis: `y[n] = x[n] - coeff * x[n-1]` with `x[-1] = 0`.
///
/// The recurrence runs over the unfiltered input, so this is an FIR
/// high-pass that attenuates bass and keeps transients.
pub fn pre_emphasis(signal: &[f64], coeff: f64) -> Vec<f64> {
    let mut prev = 0.0;
    signal
        .iter()
        .map(|&current| {
            let out = current - prev * coeff;
            prev = current;
            out
        })
        .collect()
}
