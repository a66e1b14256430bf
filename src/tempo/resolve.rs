use super::{Confidence, TempoEstimate, TempoParams};

/// First-pass doubling applies below this tempo.
const DOUBLE_BELOW: f64 = 70.0;
/// Second-pass halving applies above this tempo.
const HALVE_ABOVE: f64 = 180.0;

/// Turn the dominant beat period into a clamped, octave-corrected BPM.
///
/// `None`, or a period that does not give a finite positive tempo, yields
/// the low-confidence fallback. Swapped bounds are reordered and the
/// fallback is clamped, so the result always lies within them.
pub fn resolve_bpm(
    dominant_interval: Option<f64>,
    duration: f64,
    params: &TempoParams,
) -> TempoEstimate {
    let (min_bpm, max_bpm) = if params.min_bpm <= params.max_bpm {
        (params.min_bpm, params.max_bpm)
    } else {
        (params.max_bpm, params.min_bpm)
    };

    let raw = dominant_interval
        .map(|interval| (60.0 / interval).round())
        .filter(|bpm| bpm.is_finite() && *bpm > 0.0);

    let Some(raw) = raw else {
        return TempoEstimate {
            bpm: params.fallback_bpm.clamp(min_bpm, max_bpm),
            duration,
            confidence: Confidence::Low,
        };
    };

    let min = f64::from(min_bpm);
    let max = f64::from(max_bpm);
    let bpm = fold_octaves(raw, min, max).clamp(min, max);

    TempoEstimate {
        bpm: bpm as u32,
        duration,
        confidence: Confidence::Estimated,
    }
}

/// Two passes of halving/doubling to undo common octave errors.
fn fold_octaves(mut bpm: f64, min: f64, max: f64) -> f64 {
    if bpm > max {
        bpm = (bpm / 2.0).round();
    } else if bpm < DOUBLE_BELOW {
        bpm = (bpm * 2.0).round();
    }

    if bpm > HALVE_ABOVE {
        bpm = (bpm / 2.0).round();
    }
    if bpm < min {
        bpm = (bpm * 2.0).round();
    }
    bpm
}
