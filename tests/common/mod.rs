mod fixtures;
#[allow(unused_imports)]
pub use fixtures::*;

// Re-export commonly used types from textdet for tests
#[allow(unused_imports)]
pub use textdet::{DetectionError, DetectorConfig, OrientedBox, TextDetector};
