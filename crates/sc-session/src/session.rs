use sc_core::config::{GaitConfig, SessionConfig};
use sc_core::keypoint::KeypointSet;
use sc_core::metrics::{CadenceEstimate, GaitMetrics, GaitSummary, HistoryPoint};
use sc_signal::channel::{ChannelAnalysis, ChannelPipeline, ChannelState};
use sc_signal::measurement::{Channel, FrameMeasurements, MeasurementExtractor};
use sc_signal::summary::summarize;

use crate::error::SessionError;

/// Lifecycle of a session. Termination is dropping (or closing) it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    /// No valid measurement seen yet.
    Idle,
    /// At least one frame produced a measurement.
    Active,
}

/// État d'analyse d'une connexion : une `ChannelState` par canal.
///
/// Owned by exactly one connection and never shared. Frames are processed
/// strictly one after another; each call is a pure state transition with no
/// I/O.
///
/// # Example
/// ```
/// use sc_core::config::GaitConfig;
/// use sc_core::keypoint::KeypointSet;
/// use sc_session::session::{GaitSession, SessionPhase};
///
/// let mut session = GaitSession::new(1, &GaitConfig::default());
/// let metrics = session.process_frame(&KeypointSet::empty(), false).unwrap();
/// assert_eq!(metrics.frame_count, 1);
/// assert_eq!(metrics.stride_length, None);
/// assert_eq!(session.phase(), SessionPhase::Idle);
/// ```
pub struct GaitSession {
    id: u64,
    config: SessionConfig,
    pipeline: ChannelPipeline,
    extractor: MeasurementExtractor,
    stride: ChannelState,
    swing: ChannelState,
    frame_count: u64,
    phase: SessionPhase,
}

impl GaitSession {
    /// Crée une session vide à partir d'un snapshot de la config.
    #[must_use]
    pub fn new(id: u64, config: &GaitConfig) -> Self {
        let cap = config.signal.max_history;
        log::debug!("session {id}: created");
        Self {
            id,
            config: config.session.clone(),
            pipeline: ChannelPipeline::from_config(&config.signal),
            extractor: MeasurementExtractor::new(config.landmarks.min_visibility),
            stride: ChannelState::new(Channel::Stride, cap),
            swing: ChannelState::new(Channel::Swing, cap),
            frame_count: 0,
            phase: SessionPhase::Idle,
        }
    }

    /// Processes the keypoints of one frame.
    ///
    /// # Errors
    /// See [`GaitSession::process_measurements`].
    pub fn process_frame(
        &mut self,
        keypoints: &KeypointSet,
        fast_mode: bool,
    ) -> Result<GaitMetrics, SessionError> {
        let measurements = self.extractor.extract(keypoints);
        self.process_measurements(measurements, fast_mode)
    }

    /// Appends the frame's measurements and recomputes cadence.
    ///
    /// Channels without a measurement are left as they are. In fast mode the
    /// samples are still recorded but no cadence is computed, and both
    /// cadences are reported as unknown.
    ///
    /// # Errors
    /// On a signal fault every channel is restored to its pre-frame state
    /// and the frame counter does not move.
    pub fn process_measurements(
        &mut self,
        measurements: FrameMeasurements,
        fast_mode: bool,
    ) -> Result<GaitMetrics, SessionError> {
        let samples: Vec<(Channel, f64)> = Channel::ALL
            .into_iter()
            .filter_map(|channel| measurements.get(channel).map(|v| (channel, v as f64)))
            .collect();
        let staged = self.stage_frame(&samples)?;

        if !fast_mode {
            let mut analyses: Vec<(Channel, ChannelAnalysis)> = Vec::with_capacity(staged.len());
            for &channel in &staged {
                match self.state(channel).analyze(&self.pipeline) {
                    Ok(analysis) => analyses.push((channel, analysis)),
                    Err(e) => {
                        self.unstage(&staged);
                        log::warn!("session {}: frame aborted: {e}", self.id);
                        return Err(e.into());
                    }
                }
            }
            for (channel, analysis) in &analyses {
                self.state_mut(*channel).commit(analysis);
            }
        }

        self.frame_count += 1;
        if self.phase == SessionPhase::Idle && !staged.is_empty() {
            self.phase = SessionPhase::Active;
            log::info!("session {}: active at frame {}", self.id, self.frame_count);
        }
        log::debug!(
            "session {} frame {}: stride={:?} swing={:?} fast={fast_mode}",
            self.id,
            self.frame_count,
            measurements.stride,
            measurements.swing
        );

        Ok(self.snapshot(measurements, fast_mode))
    }

    fn snapshot(&self, measurements: FrameMeasurements, fast_mode: bool) -> GaitMetrics {
        let cadence = |state: &ChannelState| {
            if fast_mode {
                CadenceEstimate::Unknown
            } else {
                state.cadence()
            }
        };
        GaitMetrics {
            stride_length: measurements.stride,
            swing_length: measurements.swing,
            avg_stride: cadence(&self.stride),
            avg_swing: cadence(&self.swing),
            frame_count: self.frame_count,
            fast_mode,
            summary: if fast_mode { None } else { self.summary() },
        }
    }

    /// Magnitude statistics over recent samples, once both channels have enough.
    #[must_use]
    pub fn summary(&self) -> Option<GaitSummary> {
        let window = self.config.summary_window;
        let min = self.config.summary_min_samples;
        Some(GaitSummary {
            stride: summarize(self.stride.series().values(), window, min)?,
            swing: summarize(self.swing.series().values(), window, min)?,
        })
    }

    /// Up to `max` paired samples, newest last, aligned on the newest sample
    /// of each channel.
    #[must_use]
    pub fn history(&self, max: usize) -> Vec<HistoryPoint> {
        let stride = self.stride.series().values();
        let swing = self.swing.series().values();
        let n = stride.len().min(swing.len()).min(max);
        stride[stride.len() - n..]
            .iter()
            .zip(&swing[swing.len() - n..])
            .map(|(&st, &sw)| HistoryPoint {
                swing_length: sw as i64,
                stride_length: st as i64,
            })
            .collect()
    }

    /// Configured history payload size.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.config.history_len
    }

    /// `true` when the periodic history payload is due for the last frame.
    #[must_use]
    pub fn history_due(&self) -> bool {
        let every = self.config.history_every;
        every > 0 && self.frame_count > 0 && self.frame_count % every == 0
    }

    /// Stages every sample of a frame, or none of them.
    fn stage_frame(&mut self, samples: &[(Channel, f64)]) -> Result<Vec<Channel>, SessionError> {
        let mut staged = Vec::with_capacity(samples.len());
        for &(channel, value) in samples {
            if let Err(e) = self.state_mut(channel).stage(value) {
                self.unstage(&staged);
                log::warn!("session {}: frame aborted: {e}", self.id);
                return Err(e.into());
            }
            staged.push(channel);
        }
        Ok(staged)
    }

    fn unstage(&mut self, staged: &[Channel]) {
        for &channel in staged {
            self.state_mut(channel).rollback();
        }
    }

    #[must_use]
    pub fn state(&self, channel: Channel) -> &ChannelState {
        match channel {
            Channel::Stride => &self.stride,
            Channel::Swing => &self.swing,
        }
    }

    fn state_mut(&mut self, channel: Channel) -> &mut ChannelState {
        match channel {
            Channel::Stride => &mut self.stride,
            Channel::Swing => &mut self.swing,
        }
    }

    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Termine la session. Toute l'historique est libérée.
    pub fn close(self) -> u64 {
        log::info!(
            "session {}: closed after {} frames ({} stride / {} swing samples)",
            self.id,
            self.frame_count,
            self.stride.series().next_index(),
            self.swing.series().next_index()
        );
        self.frame_count
    }
}
