use sc_core::config::CadenceMode;
pub use sc_core::metrics::CadenceEstimate;

use crate::peaks::Peak;

/// Reduces a peak sequence to the mean spacing between cycles.
///
/// # Example
/// ```
/// use sc_core::config::CadenceMode;
/// use sc_signal::cadence::{CadenceEstimate, CadenceEstimator};
/// use sc_signal::peaks::Peak;
///
/// let estimator = CadenceEstimator::new(3, CadenceMode::Trailing);
/// let peaks = [10, 40].map(|index| Peak { index, value: 1.0, prominence: 1.0 });
/// assert_eq!(estimator.estimate(&peaks), CadenceEstimate::Value(30.0));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct CadenceEstimator {
    window: usize,
    mode: CadenceMode,
}

impl CadenceEstimator {
    #[must_use]
    pub fn new(window: usize, mode: CadenceMode) -> Self {
        Self {
            window: window.max(1),
            mode,
        }
    }

    /// `Unknown` below two peaks, otherwise the mean of the selected gaps.
    #[must_use]
    pub fn estimate(&self, peaks: &[Peak]) -> CadenceEstimate {
        let gaps: Vec<usize> = peaks
            .windows(2)
            .map(|w| w[1].index.saturating_sub(w[0].index))
            .collect();
        if gaps.is_empty() {
            return CadenceEstimate::Unknown;
        }
        let take = match self.mode {
            CadenceMode::Trailing => self.window.min(gaps.len()),
            CadenceMode::AllGaps => gaps.len(),
        };
        let recent = &gaps[gaps.len() - take..];
        let sum: f64 = recent.iter().map(|&g| g as f64).sum();
        CadenceEstimate::from_value(sum / take as f64)
    }
}

impl Default for CadenceEstimator {
    fn default() -> Self {
        Self::new(3, CadenceMode::Trailing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peaks_at(indices: &[usize]) -> Vec<Peak> {
        indices
            .iter()
            .map(|&index| Peak {
                index,
                value: 0.0,
                prominence: 0.0,
            })
            .collect()
    }

    #[test]
    fn fewer_than_two_peaks_is_unknown() {
        let est = CadenceEstimator::default();
        assert_eq!(est.estimate(&[]), CadenceEstimate::Unknown);
        assert_eq!(est.estimate(&peaks_at(&[17])), CadenceEstimate::Unknown);
    }

    #[test]
    fn two_peaks_give_their_gap() {
        let est = CadenceEstimator::default();
        assert_eq!(est.estimate(&peaks_at(&[10, 40])), CadenceEstimate::Value(30.0));
    }

    #[test]
    fn only_last_three_gaps_count() {
        // Gaps 20, 25, 30, 25: the first is ignored.
        let est = CadenceEstimator::default().estimate(&peaks_at(&[0, 20, 45, 75, 100]));
        let v = est.value().unwrap_or(f64::NAN);
        assert!((v - 80.0 / 3.0).abs() < 1e-9, "{v}");
    }

    #[test]
    fn short_history_uses_available_gaps() {
        let est = CadenceEstimator::default().estimate(&peaks_at(&[0, 10, 30]));
        assert_eq!(est, CadenceEstimate::Value(15.0));
    }

    #[test]
    fn all_gaps_mode_averages_everything() {
        let est = CadenceEstimator::new(3, CadenceMode::AllGaps);
        assert_eq!(
            est.estimate(&peaks_at(&[0, 20, 45, 75, 100])),
            CadenceEstimate::Value(25.0)
        );
    }
}
