/// Configuration, types, and shared structures for stridecast.
///
/// This crate contains all shared types, traits, and configuration logic
/// used across the stridecast workspace.

pub mod config;
pub mod error;
pub mod frame;
pub mod keypoint;
pub mod metrics;
pub mod traits;

pub use config::GaitConfig;
pub use error::CoreError;
pub use frame::FramePayload;
pub use keypoint::{KeypointSet, Landmark, PixelPoint};
pub use metrics::{CadenceEstimate, GaitMetrics, HistoryPoint};
