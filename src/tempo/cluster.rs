/// A running mean of similar inter-onset intervals.
#[derive(Clone, Debug, PartialEq)]
pub struct IntervalCluster {
    pub mean: f64,
    pub count: usize,
}

impl IntervalCluster {
    fn new(interval: f64) -> Self {
        Self {
            mean: interval,
            count: 1,
        }
    }

    fn absorb(&mut self, interval: f64) {
        self.count += 1;
        self.mean = (self.mean * (self.count - 1) as f64 + interval) / self.count as f64;
    }
}

/// Consecutive gaps between onsets, sorted ascending.
pub fn sorted_intervals(onsets: &[f64]) -> Vec<f64> {
    let mut intervals: Vec<f64> = onsets.windows(2).map(|w| w[1] - w[0]).collect();
    intervals.sort_by(f64::total_cmp);
    intervals
}

/// Greedy single-pass clustering.
///
/// Each interval joins the first cluster, in creation order, whose mean is
/// closer than `tolerance`; otherwise it starts a new cluster.
pub fn cluster_intervals(intervals: &[f64], tolerance: f64) -> Vec<IntervalCluster> {
    let mut clusters: Vec<IntervalCluster> = Vec::new();
    for &interval in intervals {
        match clusters
            .iter_mut()
            .find(|c| (c.mean - interval).abs() < tolerance)
        {
            Some(cluster) => cluster.absorb(interval),
            None => clusters.push(IntervalCluster::new(interval)),
        }
    }
    clusters
}

/// Most populated cluster; ties go to the one created first.
pub fn dominant_cluster(clusters: &[IntervalCluster]) -> Option<&IntervalCluster> {
    clusters
        .iter()
        .reduce(|best, c| if c.count > best.count { c } else { best })
}

/// Mean interval of the dominant cluster, or `None` with fewer than `min_onsets` onsets.
pub fn dominant_interval(onsets: &[f64], min_onsets: usize, tolerance: f64) -> Option<f64> {
    if onsets.len() < min_onsets.max(2) {
        return None;
    }
    let intervals = sorted_intervals(onsets);
    let clusters = cluster_intervals(&intervals, tolerance);
    log::debug!("{} intervals in {} clusters", intervals.len(), clusters.len());
    dominant_cluster(&clusters).map(|c| c.mean)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPLIT: [f64; 9] = [0.50, 0.51, 0.52, 0.54, 0.55, 0.90, 0.91, 0.92, 0.93];

    #[test]
    fn larger_group_dominates() {
        let clusters = cluster_intervals(&SPLIT, 0.05);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].count, 5);
        assert_eq!(clusters[1].count, 4);

        let dominant = dominant_cluster(&clusters).unwrap();
        assert!((dominant.mean - 0.524).abs() < 1e-9);
    }

    #[test]
    fn running_mean_lets_cluster_drift() {
        // 0.54 is 0.04 from 0.50 only because the mean has moved to 0.51.
        let clusters = cluster_intervals(&[0.50, 0.51, 0.52, 0.54], 0.05);
        assert_eq!(clusters.len(), 1);
        assert!((clusters[0].mean - 0.5175).abs() < 1e-12);
    }

    #[test]
    fn tolerance_is_exclusive() {
        let clusters = cluster_intervals(&[0.5, 0.625], 0.125);
        assert_eq!(clusters.len(), 2);
    }

    #[test]
    fn first_matching_cluster_wins_over_nearest() {
        // Two clusters with means 0.30 and 0.38; 0.34 is within 0.05 of both
        // and joins the earlier one even though it is equidistant.
        let clusters = cluster_intervals(&[0.30, 0.38, 0.34], 0.05);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].count, 2);
        assert_eq!(clusters[1].count, 1);
    }

    #[test]
    fn ties_go_to_first_cluster() {
        let clusters = vec![
            IntervalCluster { mean: 0.4, count: 3 },
            IntervalCluster { mean: 0.7, count: 3 },
            IntervalCluster { mean: 0.9, count: 1 },
        ];
        assert_eq!(dominant_cluster(&clusters).unwrap().mean, 0.4);
        assert!(dominant_cluster(&[]).is_none());
    }

    #[test]
    fn intervals_are_sorted() {
        let intervals = sorted_intervals(&[0.0, 0.5, 0.7, 1.5]);
        let expected = [0.2, 0.5, 0.8];
        assert_eq!(intervals.len(), expected.len());
        for (a, b) in intervals.iter().zip(expected) {
            assert!((a - b).abs() < 1e-12, "{} != {}", a, b);
        }
    }

    #[test]
    fn too_few_onsets_is_insufficient() {
        let onsets: Vec<f64> = (0..7).map(|i| i as f64 * 0.5).collect();
        assert_eq!(dominant_interval(&onsets, 8, 0.05), None);
        assert_eq!(dominant_interval(&[], 8, 0.05), None);
    }

    #[test]
    fn eight_even_onsets_give_their_spacing() {
        let onsets: Vec<f64> = (0..8).map(|i| 1.0 + i as f64 * 0.5).collect();
        let interval = dominant_interval(&onsets, 8, 0.05).unwrap();
        assert!((interval - 0.5).abs() < 1e-12);
    }
}
