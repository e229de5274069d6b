pub mod config;
pub mod detection;
pub mod engine;
pub mod error;
pub mod models;
pub mod visualize;

pub use config::DetectorConfig;
pub use detection::TextDetector;
pub use engine::{InferenceEngine, TensorData};
pub use error::{DetectionError, Result};
pub use models::{Contour, OrientedBox, ProbabilityImage, ProbabilityMap, ValidSize};
pub use visualize::visualize;

#[cfg(feature = "rten")]
pub use engine::RtenEngine;
