use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Index of the left elbow in the 33-point body topology.
pub const LEFT_ELBOW: usize = 13;
/// Index of the right elbow.
pub const RIGHT_ELBOW: usize = 14;
/// Index of the left ankle.
pub const LEFT_ANKLE: usize = 27;
/// Index of the right ankle.
pub const RIGHT_ANKLE: usize = 28;

/// A landmark as reported by the detector, in normalised image coordinates.
///
/// `x` and `y` are fractions of the frame width and height. `visibility`
/// is the detector's confidence that the point is in view, when available.
///
/// # Example
/// ```
/// use sc_core::keypoint::Landmark;
/// let lm = Landmark::new(0.5, 0.25);
/// assert!(lm.visibility.is_none());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f64>,
}

impl Landmark {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            z: 0.0,
            visibility: None,
        }
    }
}

/// A point in pixel space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
    /// Detector confidence carried over from the landmark.
    pub visibility: Option<f64>,
}

impl PixelPoint {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            visibility: None,
        }
    }
}

/// Keypoints of one detected body, indexed by the fixed body topology.
///
/// An empty set means nothing was detected in the frame.
///
/// # Example
/// ```
/// use sc_core::keypoint::KeypointSet;
/// let set = KeypointSet::empty();
/// assert!(set.is_empty());
/// assert!(set.get(27).is_none());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KeypointSet {
    points: Vec<PixelPoint>,
}

impl KeypointSet {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn new(points: Vec<PixelPoint>) -> Self {
        Self { points }
    }

    /// Projette des landmarks normalisés dans l'espace pixel de la frame.
    ///
    /// Coordinates are truncated toward zero, as the detector overlay does.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidDimensions`] for a zero-sized frame and
    /// [`CoreError::UndecodableFrame`] if a landmark is not finite.
    pub fn from_normalized(
        landmarks: &[Landmark],
        width: u32,
        height: u32,
    ) -> Result<Self, CoreError> {
        if width == 0 || height == 0 {
            return Err(CoreError::InvalidDimensions { width, height });
        }
        let (w, h) = (f64::from(width), f64::from(height));
        let points = landmarks
            .iter()
            .enumerate()
            .map(|(i, lm)| {
                if !(lm.x.is_finite() && lm.y.is_finite()) {
                    return Err(CoreError::UndecodableFrame(format!(
                        "landmark {i} has non-finite coordinates"
                    )));
                }
                Ok(PixelPoint {
                    x: (lm.x * w).trunc(),
                    y: (lm.y * h).trunc(),
                    visibility: lm.visibility,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { points })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&PixelPoint> {
        self.points.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_landmarks_truncate_to_pixels() {
        let lms = [Landmark::new(0.5, 0.25), Landmark::new(0.999, 0.0015)];
        let set = KeypointSet::from_normalized(&lms, 640, 480).unwrap_or_default();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(0), Some(&PixelPoint::new(320.0, 120.0)));
        assert_eq!(set.get(1), Some(&PixelPoint::new(639.0, 0.0)));
    }

    #[test]
    fn zero_sized_frame_is_rejected() {
        let lms = [Landmark::new(0.5, 0.5)];
        let err = KeypointSet::from_normalized(&lms, 0, 480);
        assert_eq!(
            err,
            Err(CoreError::InvalidDimensions {
                width: 0,
                height: 480
            })
        );
    }

    #[test]
    fn non_finite_landmark_is_undecodable() {
        let lms = [Landmark::new(f64::NAN, 0.5)];
        let err = KeypointSet::from_normalized(&lms, 640, 480);
        assert!(matches!(err, Err(CoreError::UndecodableFrame(_))));
    }

    #[test]
    fn landmark_defaults_missing_optional_fields() {
        let lm: Landmark = serde_json::from_str(r#"{"x": 0.1, "y": 0.2}"#).unwrap_or_default();
        assert!((lm.x - 0.1).abs() < f64::EPSILON);
        assert!(lm.z.abs() < f64::EPSILON);
        assert!(lm.visibility.is_none());
    }
}
