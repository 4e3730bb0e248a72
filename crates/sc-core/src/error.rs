use thiserror::Error;

/// Errors originating from the core module.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Invalid configuration value or structure.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The frame payload could not be turned into keypoints.
    #[error("undecodable frame: {0}")]
    UndecodableFrame(String),

    /// Invalid width/height dimensions.
    #[error("invalid frame dimensions: {width}×{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// The keypoint detector is shut down or unreachable.
    #[error("pose detector unavailable")]
    DetectorUnavailable,
}
