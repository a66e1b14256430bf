/// Drop onsets that follow the last kept onset by less than `min_interval` seconds.
///
/// Discarded onsets never replace the kept one, so a dense burst keeps its first hit.
pub fn debounce(onsets: &[f64], min_interval: f64) -> Vec<f64> {
    let mut kept: Vec<f64> = Vec::with_capacity(onsets.len());
    for &onset in onsets {
        match kept.last() {
            Some(&last) if onset - last < min_interval => {}
            _ => kept.push(onset),
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_first_and_spaced_onsets() {
        let kept = debounce(&[0.1, 0.2, 0.3, 0.36, 0.6, 1.0], 0.25);
        assert_eq!(kept, vec![0.1, 0.36, 1.0]);
    }

    #[test]
    fn does_not_slide_the_reference() {
        // 0.2 and 0.4 are each within 0.25 of their predecessor, but only
        // distance to the last *kept* onset matters.
        let kept = debounce(&[0.0, 0.2, 0.4, 0.5], 0.25);
        assert_eq!(kept, vec![0.0, 0.4]);
    }

    #[test]
    fn exact_spacing_is_kept() {
        assert_eq!(debounce(&[0.0, 0.25, 0.5], 0.25), vec![0.0, 0.25, 0.5]);
    }

    #[test]
    fn empty_in_empty_out() {
        assert!(debounce(&[], 0.25).is_empty());
    }

    #[test]
    fn output_gaps_respect_minimum() {
        let onsets: Vec<f64> = (0..200).map(|i| i as f64 * 0.037).collect();
        let kept = debounce(&onsets, 0.25);
        assert!(kept.len() > 1);
        for pair in kept.windows(2) {
            assert!(pair[1] - pair[0] >= 0.25);
        }
    }
}
