use crate::error::SignalError;

/// A local maximum of a smoothed series.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Peak {
    /// Position in the smoothed series.
    pub index: usize,
    pub value: f64,
    /// Height above the higher of the two enclosing valleys.
    pub prominence: f64,
}

/// Peak finder with prominence, height and distance constraints.
///
/// Results are deterministic: plateaus resolve to their midpoint, and among
/// peaks of equal height the lower index wins the distance suppression.
///
/// # Example
/// ```
/// use sc_signal::peaks::PeakDetector;
/// let detector = PeakDetector::new(2, 1.0, None);
/// let peaks = detector.find_peaks(&[0.0, 5.0, 0.0, 0.0, 3.0, 0.0]);
/// let indices: Vec<usize> = peaks.iter().map(|p| p.index).collect();
/// assert_eq!(indices, vec![1, 4]);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct PeakDetector {
    min_distance: usize,
    min_prominence: f64,
    min_height: Option<f64>,
}

impl PeakDetector {
    #[must_use]
    pub fn new(min_distance: usize, min_prominence: f64, min_height: Option<f64>) -> Self {
        Self {
            min_distance,
            min_prominence,
            min_height,
        }
    }

    /// Find peaks, sorted by index.
    ///
    /// Expects finite input; see [`PeakDetector::find_peaks_checked`].
    #[must_use]
    pub fn find_peaks(&self, values: &[f64]) -> Vec<Peak> {
        let candidates: Vec<Peak> = local_maxima(values)
            .into_iter()
            .map(|index| Peak {
                index,
                value: values[index],
                prominence: prominence(values, index),
            })
            .filter(|p| p.prominence >= self.min_prominence)
            .filter(|p| self.min_height.is_none_or(|h| p.value >= h))
            .collect();

        select_by_distance(&candidates, self.min_distance)
    }

    /// Find peaks after checking every value is finite.
    ///
    /// # Errors
    /// Returns [`SignalError::NonFiniteSmoothed`] for the first NaN or infinity.
    pub fn find_peaks_checked(&self, values: &[f64]) -> Result<Vec<Peak>, SignalError> {
        if let Some(position) = values.iter().position(|v| !v.is_finite()) {
            return Err(SignalError::NonFiniteSmoothed { position });
        }
        Ok(self.find_peaks(values))
    }
}

/// Indices of local maxima, one per peak.
///
/// A sample is a maximum when its left neighbour is strictly lower and the
/// first different sample to its right is also strictly lower. A flat top
/// reports its midpoint, rounded down. The first and last samples are never
/// maxima.
#[allow(clippy::float_cmp)]
#[must_use]
pub fn local_maxima(x: &[f64]) -> Vec<usize> {
    let mut out = Vec::new();
    if x.len() < 3 {
        return out;
    }
    let last = x.len() - 1;
    let mut i = 1;
    while i < last {
        if x[i - 1] < x[i] {
            let mut ahead = i + 1;
            while ahead < last && x[ahead] == x[i] {
                ahead += 1;
            }
            if x[ahead] < x[i] {
                out.push((i + ahead - 1) / 2);
                i = ahead;
                continue;
            }
        }
        i += 1;
    }
    out
}

/// Prominence of the sample at `peak`.
///
/// Scans outwards on each side until a strictly higher sample or the end of
/// the series, keeping the lowest value seen; the prominence is the peak
/// height above the higher of those two minima.
#[must_use]
pub fn prominence(x: &[f64], peak: usize) -> f64 {
    let v = x[peak];
    let left_min = x[..=peak]
        .iter()
        .rev()
        .take_while(|&&y| y <= v)
        .fold(v, |m, &y| m.min(y));
    let right_min = x[peak..]
        .iter()
        .take_while(|&&y| y <= v)
        .fold(v, |m, &y| m.min(y));
    v - left_min.max(right_min)
}

/// Greedy suppression: tallest first, dropping neighbours closer than
/// `min_distance`. Input and output are sorted by index.
fn select_by_distance(candidates: &[Peak], min_distance: usize) -> Vec<Peak> {
    if min_distance <= 1 || candidates.len() < 2 {
        return candidates.to_vec();
    }

    let mut order: Vec<usize> = (0..candidates.len()).collect();
    order.sort_by(|&a, &b| {
        candidates[b]
            .value
            .total_cmp(&candidates[a].value)
            .then(candidates[a].index.cmp(&candidates[b].index))
    });

    let mut keep = vec![true; candidates.len()];
    for &j in &order {
        if !keep[j] {
            continue;
        }
        let at = candidates[j].index;
        let mut k = j;
        while k > 0 && at - candidates[k - 1].index < min_distance {
            k -= 1;
            keep[k] = false;
        }
        let mut k = j + 1;
        while k < candidates.len() && candidates[k].index - at < min_distance {
            keep[k] = false;
            k += 1;
        }
    }

    candidates
        .iter()
        .zip(keep)
        .filter_map(|(p, k)| k.then_some(*p))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indices(peaks: &[Peak]) -> Vec<usize> {
        peaks.iter().map(|p| p.index).collect()
    }

    #[test]
    fn plateau_reports_midpoint() {
        assert_eq!(local_maxima(&[0.0, 2.0, 2.0, 2.0, 2.0, 0.0]), vec![2]);
        assert_eq!(local_maxima(&[0.0, 2.0, 2.0, 2.0, 0.0]), vec![2]);
    }

    #[test]
    fn plateau_rising_again_is_not_a_peak() {
        assert!(local_maxima(&[0.0, 2.0, 2.0, 3.0]).is_empty());
        assert_eq!(local_maxima(&[0.0, 2.0, 2.0, 3.0, 1.0]), vec![3]);
    }

    #[test]
    fn edges_are_never_maxima() {
        assert!(local_maxima(&[5.0, 1.0, 0.0]).is_empty());
        assert!(local_maxima(&[0.0, 1.0, 5.0]).is_empty());
        assert!(local_maxima(&[1.0, 1.0]).is_empty());
    }

    #[test]
    fn prominence_uses_higher_valley() {
        //             0    1    2    3    4    5    6
        let x = [1.0, 6.0, 2.0, 9.0, 4.0, 8.0, 0.0];
        assert!((prominence(&x, 3) - 8.0).abs() < 1e-12);
        // Peak at 5 is bounded by 9 on the left; left valley is 4.
        assert!((prominence(&x, 5) - 4.0).abs() < 1e-12);
        // Peak at 1 is bounded by 9 on the right; right valley is 2.
        assert!((prominence(&x, 1) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn low_prominence_is_discarded() {
        let x = [0.0, 10.0, 9.0, 9.5, 0.0];
        let peaks = PeakDetector::new(1, 1.0, None).find_peaks(&x);
        assert_eq!(indices(&peaks), vec![1]);
        assert!(peaks.iter().all(|p| p.prominence >= 1.0));
    }

    #[test]
    fn height_filter_applies() {
        let x = [0.0, 3.0, 0.0, 8.0, 0.0];
        let peaks = PeakDetector::new(1, 0.0, Some(5.0)).find_peaks(&x);
        assert_eq!(indices(&peaks), vec![3]);
    }

    #[test]
    fn prominence_equal_to_threshold_is_kept() {
        let x = [0.0, 10.0, 0.0, 9.5, 0.0];
        let peaks = PeakDetector::new(1, 10.0, None).find_peaks(&x);
        assert_eq!(indices(&peaks), vec![1]);
        assert!((peaks[0].prominence - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn height_equal_to_threshold_is_kept() {
        let x = [0.0, 5.0, 0.0, 4.5, 0.0];
        let peaks = PeakDetector::new(1, 0.0, Some(5.0)).find_peaks(&x);
        assert_eq!(indices(&peaks), vec![1]);
    }

    #[test]
    fn distance_keeps_tallest() {
        let x = [0.0, 4.0, 0.0, 7.0, 0.0, 5.0, 0.0];
        let peaks = PeakDetector::new(3, 0.0, None).find_peaks(&x);
        assert_eq!(indices(&peaks), vec![3]);
        let peaks = PeakDetector::new(2, 0.0, None).find_peaks(&x);
        assert_eq!(indices(&peaks), vec![1, 3, 5]);
    }

    #[test]
    fn equal_heights_prefer_lower_index() {
        let x = [0.0, 5.0, 0.0, 5.0, 0.0];
        let peaks = PeakDetector::new(3, 0.0, None).find_peaks(&x);
        assert_eq!(indices(&peaks), vec![1]);
    }

    #[test]
    fn accepted_peaks_respect_min_distance() {
        let x: Vec<f64> = (0..400)
            .map(|i| {
                let t = f64::from(i);
                (t * 0.31).sin() * 20.0 + (t * 0.07).cos() * 35.0 + (t * 1.7).sin() * 4.0
            })
            .collect();
        for distance in [1, 5, 10, 23] {
            let peaks = PeakDetector::new(distance, 2.0, None).find_peaks(&x);
            assert!(!peaks.is_empty());
            for pair in peaks.windows(2) {
                assert!(pair[1].index - pair[0].index >= distance);
            }
            assert!(peaks.iter().all(|p| p.prominence >= 2.0));
        }
    }

    #[test]
    fn non_finite_input_is_rejected() {
        let err = PeakDetector::new(1, 0.0, None).find_peaks_checked(&[0.0, f64::NAN, 0.0]);
        assert_eq!(err, Err(SignalError::NonFiniteSmoothed { position: 1 }));
    }
}
