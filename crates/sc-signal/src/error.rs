use thiserror::Error;

/// Errors originating from the signal module.
///
/// None of these occur for well-formed series; they abort the current frame
/// and leave channel state as it was before the frame.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SignalError {
    /// A measurement was NaN or infinite.
    #[error("non-finite measurement {value} on channel {channel}")]
    NonFiniteSample {
        /// Channel name.
        channel: &'static str,
        /// Offending value.
        value: f64,
    },

    /// Smoothing produced a non-finite value.
    #[error("non-finite smoothed value at position {position}")]
    NonFiniteSmoothed {
        /// Position in the smoothed series.
        position: usize,
    },
}
