use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Average spacing, in frames, between consecutive cycles of a channel.
///
/// Serialises as a number, or as `null` when unknown. Non-finite values are
/// never written out.
///
/// # Example
/// ```
/// use sc_core::metrics::CadenceEstimate;
/// assert_eq!(CadenceEstimate::from_value(f64::NAN), CadenceEstimate::Unknown);
/// assert_eq!(CadenceEstimate::Value(30.0).value(), Some(30.0));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum CadenceEstimate {
    /// Fewer than two peaks seen so far.
    #[default]
    Unknown,
    Value(f64),
}

impl CadenceEstimate {
    /// Wraps a value, mapping non-finite input to `Unknown`.
    #[must_use]
    pub fn from_value(v: f64) -> Self {
        if v.is_finite() {
            Self::Value(v)
        } else {
            Self::Unknown
        }
    }

    #[must_use]
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Value(v) if v.is_finite() => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_known(self) -> bool {
        self.value().is_some()
    }
}

impl Serialize for CadenceEstimate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CadenceEstimate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let v = Option::<f64>::deserialize(deserializer)?;
        Ok(v.map_or(Self::Unknown, Self::from_value))
    }
}

/// Writes a float, or `null` if it is not finite.
///
/// # Errors
/// Propagates serializer errors.
pub fn finite_or_null<S: Serializer>(v: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if v.is_finite() {
        serializer.serialize_f64(*v)
    } else {
        serializer.serialize_none()
    }
}

/// Reads back what [`finite_or_null`] writes: `null` becomes NaN.
///
/// # Errors
/// Propagates deserializer errors.
pub fn nan_if_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

/// Magnitude statistics over the recent raw samples of one channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct ChannelSummary {
    /// Mean of |value|.
    #[serde(serialize_with = "finite_or_null", deserialize_with = "nan_if_null")]
    pub mean_magnitude: f64,
    /// Population standard deviation of |value|.
    #[serde(serialize_with = "finite_or_null", deserialize_with = "nan_if_null")]
    pub variability: f64,
    /// Number of samples the statistics cover.
    pub samples: usize,
}

/// Summary of both channels, reported once enough history exists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct GaitSummary {
    pub stride: ChannelSummary,
    pub swing: ChannelSummary,
}

/// Metrics snapshot produced for every processed frame.
///
/// Raw lengths are `None` when the frame carried no usable landmarks for
/// that channel.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct GaitMetrics {
    pub stride_length: Option<i64>,
    pub swing_length: Option<i64>,
    pub avg_stride: CadenceEstimate,
    pub avg_swing: CadenceEstimate,
    pub frame_count: u64,
    pub fast_mode: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<GaitSummary>,
}

/// One paired sample of the history payload.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct HistoryPoint {
    pub swing_length: i64,
    pub stride_length: i64,
}
