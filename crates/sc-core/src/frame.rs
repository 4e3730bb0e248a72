use serde::{Deserialize, Serialize};

use crate::keypoint::Landmark;

/// One camera frame as submitted by a client.
///
/// A frame carries either an encoded image for the detector to run on, or
/// landmarks the client already extracted on-device, or both.
///
/// # Example
/// ```
/// use sc_core::frame::FramePayload;
/// let frame = FramePayload::with_landmarks(640, 480, vec![]);
/// assert!(frame.image.is_none());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct FramePayload {
    /// Client-side frame identifier, echoed back in the response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_id: Option<u64>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Encoded image (typically a base64 data URL). Opaque to the core.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Landmarks in normalised coordinates, if already detected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landmarks: Option<Vec<Landmark>>,
}

impl FramePayload {
    #[must_use]
    pub fn with_landmarks(width: u32, height: u32, landmarks: Vec<Landmark>) -> Self {
        Self {
            frame_id: None,
            width,
            height,
            image: None,
            landmarks: Some(landmarks),
        }
    }
}
