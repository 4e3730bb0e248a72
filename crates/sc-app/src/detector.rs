use sc_core::error::CoreError;
use sc_core::frame::FramePayload;
use sc_core::keypoint::KeypointSet;
use sc_core::traits::PoseDetector;

/// Detector for clients that run pose estimation on-device.
///
/// Uses the normalised landmarks carried by the frame and projects them into
/// pixel space. A frame holding only an encoded image cannot be analysed,
/// since no pose model runs server-side.
#[derive(Clone, Copy, Debug, Default)]
pub struct LandmarkPassthrough;

impl PoseDetector for LandmarkPassthrough {
    fn detect(&self, frame: &FramePayload) -> Result<KeypointSet, CoreError> {
        match (&frame.landmarks, &frame.image) {
            (Some(landmarks), _) => {
                KeypointSet::from_normalized(landmarks, frame.width, frame.height)
            }
            (None, Some(_)) => Err(CoreError::UndecodableFrame(
                "image frames need client-side landmarks".to_string(),
            )),
            (None, None) => Err(CoreError::UndecodableFrame(
                "frame carries neither image nor landmarks".to_string(),
            )),
        }
    }

    fn name(&self) -> &'static str {
        "landmark-passthrough"
    }
}

#[cfg(test)]
mod tests {
    use sc_core::keypoint::Landmark;

    use super::*;

    #[test]
    fn landmarks_are_projected_to_pixels() {
        let frame = FramePayload::with_landmarks(640, 480, vec![Landmark::new(0.5, 0.999)]);
        let set = LandmarkPassthrough.detect(&frame).unwrap_or_default();
        let p = set.get(0).copied().unwrap_or_default();
        assert!((p.x - 320.0).abs() < f64::EPSILON);
        assert!((p.y - 479.0).abs() < f64::EPSILON);
    }

    #[test]
    fn image_only_frame_is_undecodable() {
        let frame = FramePayload {
            image: Some("data:image/jpeg;base64,AAAA".into()),
            width: 640,
            height: 480,
            ..FramePayload::default()
        };
        assert!(matches!(
            LandmarkPassthrough.detect(&frame),
            Err(CoreError::UndecodableFrame(_))
        ));
        assert!(LandmarkPassthrough.detect(&FramePayload::default()).is_err());
    }

    #[test]
    fn zero_sized_frame_is_rejected() {
        let frame = FramePayload::with_landmarks(0, 480, vec![Landmark::new(0.1, 0.1)]);
        assert_eq!(
            LandmarkPassthrough.detect(&frame),
            Err(CoreError::InvalidDimensions {
                width: 0,
                height: 480
            })
        );
    }
}
