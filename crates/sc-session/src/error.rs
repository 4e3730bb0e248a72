use sc_core::error::CoreError;
use sc_signal::error::SignalError;
use thiserror::Error;

/// Errors that abort a single frame. The session itself stays usable.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    /// Signal processing fault; channel state was rolled back.
    #[error("signal processing failed: {0}")]
    Signal(#[from] SignalError),

    /// The frame could not be turned into keypoints.
    #[error(transparent)]
    Core(#[from] CoreError),
}
