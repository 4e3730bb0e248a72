use sc_core::config::SignalConfig;

use crate::cadence::{CadenceEstimate, CadenceEstimator};
use crate::error::SignalError;
use crate::measurement::Channel;
use crate::peaks::{Peak, PeakDetector};
use crate::series::SignalSeries;
use crate::smoothing::Smoother;

/// Smoother → PeakDetector → CadenceEstimator, configured once per session.
///
/// # Example
/// ```
/// use sc_core::config::SignalConfig;
/// use sc_signal::channel::ChannelPipeline;
/// let pipeline = ChannelPipeline::from_config(&SignalConfig::default());
/// let analysis = pipeline.analyze(&[]).unwrap();
/// assert!(analysis.peaks.is_empty());
/// ```
#[derive(Clone, Copy, Debug)]
pub struct ChannelPipeline {
    smoother: Smoother,
    detector: PeakDetector,
    estimator: CadenceEstimator,
}

/// Result of running the pipeline over a channel's history.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChannelAnalysis {
    pub peaks: Vec<Peak>,
    pub cadence: CadenceEstimate,
}

impl ChannelAnalysis {
    #[must_use]
    pub fn peak_indices(&self) -> Vec<usize> {
        self.peaks.iter().map(|p| p.index).collect()
    }
}

impl ChannelPipeline {
    #[must_use]
    pub fn new(smoother: Smoother, detector: PeakDetector, estimator: CadenceEstimator) -> Self {
        Self {
            smoother,
            detector,
            estimator,
        }
    }

    #[must_use]
    pub fn from_config(config: &SignalConfig) -> Self {
        Self {
            smoother: Smoother::new(config.smoothing_window),
            detector: PeakDetector::new(
                config.min_peak_distance,
                config.min_prominence,
                config.min_height,
            ),
            estimator: CadenceEstimator::new(config.cadence_window, config.cadence_mode),
        }
    }

    /// Full recompute over `values`. O(n · window) per call.
    ///
    /// # Errors
    /// Returns an error if smoothing yields a non-finite value.
    pub fn analyze(&self, values: &[f64]) -> Result<ChannelAnalysis, SignalError> {
        let smoothed = self.smoother.smooth_checked(values)?;
        let peaks = self.detector.find_peaks(&smoothed);
        let cadence = self.estimator.estimate(&peaks);
        log::trace!(
            "{} peaks over {} samples, cadence {cadence:?}",
            peaks.len(),
            values.len()
        );
        Ok(ChannelAnalysis { peaks, cadence })
    }
}

impl Default for ChannelPipeline {
    fn default() -> Self {
        Self::from_config(&SignalConfig::default())
    }
}

/// One channel's history and its last cadence.
///
/// Updates go through stage → analyze → commit so that a failed frame can
/// be rolled back without touching the cached estimate.
#[derive(Clone, Debug)]
pub struct ChannelState {
    channel: Channel,
    series: SignalSeries,
    cadence: CadenceEstimate,
    peak_count: usize,
}

impl ChannelState {
    #[must_use]
    pub fn new(channel: Channel, max_history: Option<usize>) -> Self {
        Self {
            channel,
            series: SignalSeries::new(max_history),
            cadence: CadenceEstimate::Unknown,
            peak_count: 0,
        }
    }

    /// Appends a sample without recomputing. Returns its index.
    ///
    /// # Errors
    /// Rejects NaN and infinities; the series is left unchanged.
    pub fn stage(&mut self, value: f64) -> Result<u64, SignalError> {
        if !value.is_finite() {
            return Err(SignalError::NonFiniteSample {
                channel: self.channel.name(),
                value,
            });
        }
        Ok(self.series.push(value))
    }

    /// Drops the most recently staged sample.
    pub fn rollback(&mut self) {
        self.series.pop_last();
    }

    /// Runs the pipeline over the current history without changing state.
    ///
    /// # Errors
    /// Propagates pipeline faults.
    pub fn analyze(&self, pipeline: &ChannelPipeline) -> Result<ChannelAnalysis, SignalError> {
        pipeline.analyze(self.series.values())
    }

    pub fn commit(&mut self, analysis: &ChannelAnalysis) {
        self.cadence = analysis.cadence;
        self.peak_count = analysis.peaks.len();
    }

    /// Stage, analyse and commit one sample; rolls back on failure.
    ///
    /// # Errors
    /// Returns the fault that aborted the update.
    pub fn record(
        &mut self,
        value: f64,
        pipeline: &ChannelPipeline,
    ) -> Result<CadenceEstimate, SignalError> {
        self.stage(value)?;
        match self.analyze(pipeline) {
            Ok(analysis) => {
                self.commit(&analysis);
                Ok(self.cadence)
            }
            Err(e) => {
                self.rollback();
                Err(e)
            }
        }
    }

    #[must_use]
    pub fn channel(&self) -> Channel {
        self.channel
    }

    #[must_use]
    pub fn series(&self) -> &SignalSeries {
        &self.series
    }

    #[must_use]
    pub fn cadence(&self) -> CadenceEstimate {
        self.cadence
    }

    #[must_use]
    pub fn peak_count(&self) -> usize {
        self.peak_count
    }
}
