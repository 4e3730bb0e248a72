use crate::error::CoreError;
use crate::frame::FramePayload;
use crate::keypoint::KeypointSet;

/// Extrait les keypoints du corps à partir d'une frame.
///
/// The detector is an external, blocking collaborator: the server calls it
/// from a bounded worker pool, never from the session itself.
///
/// Implémenté par : `LandmarkPassthrough`.
///
/// # Example
/// ```
/// use sc_core::traits::PoseDetector;
/// use sc_core::frame::FramePayload;
/// use sc_core::keypoint::KeypointSet;
/// use sc_core::error::CoreError;
///
/// struct NobodyDetector;
/// impl PoseDetector for NobodyDetector {
///     fn detect(&self, _frame: &FramePayload) -> Result<KeypointSet, CoreError> {
///         Ok(KeypointSet::empty())
///     }
///     fn name(&self) -> &'static str { "nobody" }
/// }
/// ```
pub trait PoseDetector: Send + Sync + 'static {
    /// Retourne les keypoints détectés dans la frame.
    ///
    /// An empty set means no body was found, which is not an error.
    ///
    /// # Errors
    /// Returns an error if the frame cannot be decoded.
    fn detect(&self, frame: &FramePayload) -> Result<KeypointSet, CoreError>;

    /// Nom lisible pour les logs.
    fn name(&self) -> &'static str;
}
