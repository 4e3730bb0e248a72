// Measurement extraction, smoothing, peak detection and cadence estimation for stridecast.

pub mod cadence;
pub mod channel;
pub mod error;
pub mod measurement;
pub mod peaks;
pub mod sample;
pub mod series;
pub mod smoothing;
pub mod summary;

pub use cadence::{CadenceEstimate, CadenceEstimator};
pub use channel::{ChannelAnalysis, ChannelPipeline, ChannelState};
pub use error::SignalError;
pub use measurement::{Channel, FrameMeasurements, MeasurementExtractor};
pub use peaks::{Peak, PeakDetector};
pub use series::{Measurement, SignalSeries};
pub use smoothing::Smoother;
