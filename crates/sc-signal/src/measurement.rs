use sc_core::keypoint::{
    KeypointSet, LEFT_ANKLE, LEFT_ELBOW, PixelPoint, RIGHT_ANKLE, RIGHT_ELBOW,
};

/// A tracked measurement stream.
///
/// # Example
/// ```
/// use sc_signal::measurement::Channel;
/// assert_eq!(Channel::Stride.landmarks(), (27, 28));
/// assert_eq!(Channel::Swing.name(), "swing");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Ankle-to-ankle distance.
    Stride,
    /// Elbow-to-elbow distance.
    Swing,
}

impl Channel {
    pub const ALL: [Channel; 2] = [Channel::Stride, Channel::Swing];

    /// (left, right) landmark indices.
    #[must_use]
    pub fn landmarks(self) -> (usize, usize) {
        match self {
            Self::Stride => (LEFT_ANKLE, RIGHT_ANKLE),
            Self::Swing => (LEFT_ELBOW, RIGHT_ELBOW),
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Stride => "stride",
            Self::Swing => "swing",
        }
    }
}

/// Signed distance between a left and a right landmark.
///
/// The magnitude is the rounded Euclidean distance; the sign is negative
/// when the right landmark lies further right (`xR > xL`), which tells the
/// two limbs apart once they cross.
///
/// # Example
/// ```
/// use sc_core::keypoint::PixelPoint;
/// use sc_signal::measurement::signed_distance;
/// let d = signed_distance(PixelPoint::new(0.0, 0.0), PixelPoint::new(3.0, 4.0));
/// assert_eq!(d, -5);
/// ```
#[inline]
#[must_use]
pub fn signed_distance(left: PixelPoint, right: PixelPoint) -> i64 {
    let dx = right.x - left.x;
    let dy = right.y - left.y;
    let distance = (dx * dx + dy * dy).sqrt().round() as i64;
    if right.x > left.x { -distance } else { distance }
}

/// Turns a keypoint set into one optional measurement per channel.
pub struct MeasurementExtractor {
    min_visibility: Option<f64>,
    /// Smallest keypoint count covering every channel's landmarks.
    required_len: usize,
}

impl MeasurementExtractor {
    /// # Example
    /// ```
    /// use sc_core::keypoint::KeypointSet;
    /// use sc_signal::measurement::{Channel, MeasurementExtractor};
    /// let extractor = MeasurementExtractor::new(None);
    /// let m = extractor.extract(&KeypointSet::empty());
    /// assert_eq!(m.get(Channel::Stride), None);
    /// ```
    #[must_use]
    pub fn new(min_visibility: Option<f64>) -> Self {
        let required_len = Channel::ALL
            .iter()
            .map(|c| {
                let (l, r) = c.landmarks();
                l.max(r) + 1
            })
            .max()
            .unwrap_or(0);
        Self {
            min_visibility,
            required_len,
        }
    }

    /// Extracts every channel from one frame.
    ///
    /// A set too short to hold all required landmarks yields nothing for any
    /// channel. A landmark under the visibility threshold only blanks its
    /// own channel.
    #[must_use]
    pub fn extract(&self, keypoints: &KeypointSet) -> FrameMeasurements {
        if keypoints.len() < self.required_len {
            return FrameMeasurements::default();
        }
        FrameMeasurements {
            stride: self.channel(keypoints, Channel::Stride),
            swing: self.channel(keypoints, Channel::Swing),
        }
    }

    fn channel(&self, keypoints: &KeypointSet, channel: Channel) -> Option<i64> {
        let (l, r) = channel.landmarks();
        let left = self.visible(keypoints.get(l)?)?;
        let right = self.visible(keypoints.get(r)?)?;
        Some(signed_distance(left, right))
    }

    fn visible(&self, p: &PixelPoint) -> Option<PixelPoint> {
        match (self.min_visibility, p.visibility) {
            (Some(min), Some(v)) if v < min => None,
            _ => Some(*p),
        }
    }
}

/// Per-channel raw values extracted from one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameMeasurements {
    pub stride: Option<i64>,
    pub swing: Option<i64>,
}

impl FrameMeasurements {
    #[must_use]
    pub fn get(&self, channel: Channel) -> Option<i64> {
        match channel {
            Channel::Stride => self.stride,
            Channel::Swing => self.swing,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stride.is_none() && self.swing.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(points: &[(usize, f64, f64)]) -> KeypointSet {
        let mut all = vec![PixelPoint::new(0.0, 0.0); 33];
        for &(i, x, y) in points {
            all[i] = PixelPoint::new(x, y);
        }
        KeypointSet::new(all)
    }

    #[test]
    fn sign_follows_horizontal_order() {
        let a = PixelPoint::new(100.0, 200.0);
        let b = PixelPoint::new(130.0, 240.0);
        assert_eq!(signed_distance(a, b), -50);
        assert_eq!(signed_distance(b, a), 50);
    }

    #[test]
    fn vertical_pair_is_positive() {
        let a = PixelPoint::new(10.0, 0.0);
        let b = PixelPoint::new(10.0, 7.0);
        assert_eq!(signed_distance(a, b), 7);
    }

    #[test]
    fn distance_is_rounded_not_truncated() {
        // sqrt(1 + 2.89) ~ 1.97
        let a = PixelPoint::new(1.0, 0.0);
        let b = PixelPoint::new(0.0, 1.7);
        assert_eq!(signed_distance(a, b), 2);
    }

    #[test]
    fn extracts_both_channels() {
        let set = body(&[
            (LEFT_ANKLE, 300.0, 400.0),
            (RIGHT_ANKLE, 240.0, 400.0),
            (LEFT_ELBOW, 200.0, 100.0),
            (RIGHT_ELBOW, 230.0, 140.0),
        ]);
        let m = MeasurementExtractor::new(None).extract(&set);
        assert_eq!(m.stride, Some(60));
        assert_eq!(m.swing, Some(-50));
    }

    #[test]
    fn short_keypoint_set_yields_nothing() {
        // 28 points: index 28 (right ankle) is missing, so no channel reports.
        let set = KeypointSet::new(vec![PixelPoint::new(1.0, 1.0); 28]);
        let m = MeasurementExtractor::new(None).extract(&set);
        assert!(m.is_empty());
    }

    #[test]
    fn low_visibility_blanks_only_its_channel() {
        let mut points = vec![PixelPoint::new(0.0, 0.0); 33];
        points[LEFT_ELBOW] = PixelPoint {
            x: 5.0,
            y: 5.0,
            visibility: Some(0.1),
        };
        points[RIGHT_ANKLE] = PixelPoint {
            x: 10.0,
            y: 0.0,
            visibility: Some(0.9),
        };
        let m = MeasurementExtractor::new(Some(0.5)).extract(&KeypointSet::new(points));
        assert_eq!(m.swing, None);
        assert_eq!(m.stride, Some(-10));
    }
}
