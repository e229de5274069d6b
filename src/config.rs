use crate::error::{DetectionError, Result};

/// Tunable parameters of a [`TextDetector`](crate::TextDetector).
///
/// Read once per detection call and never mutated by it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorConfig {
    /// Longest edge allowed for the network input. `None` disables resizing.
    pub max_size: Option<u32>,
    /// Minimum mean probability a contour needs to be kept. `None` disables scoring.
    pub box_score_threshold: Option<f32>,
    /// Probability above which a pixel counts as text. `None` disables thresholding.
    pub box_threshold: Option<f32>,
    /// Boxes with a side less than or equal to this are dropped.
    pub min_size: u32,
    /// Enlargement ratio applied when unclipping.
    pub unclip_ratio: f32,
}

impl DetectorConfig {
    pub fn new() -> Self {
        Self {
            max_size: Some(960),
            box_score_threshold: Some(0.7),
            box_threshold: Some(0.3),
            min_size: 3,
            unclip_ratio: 1.5,
        }
    }

    pub fn with_max_size(mut self, max_size: Option<u32>) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn with_box_score_threshold(mut self, threshold: Option<f32>) -> Self {
        self.box_score_threshold = threshold;
        self
    }

    pub fn with_box_threshold(mut self, threshold: Option<f32>) -> Self {
        self.box_threshold = threshold;
        self
    }

    pub fn with_min_size(mut self, min_size: u32) -> Self {
        self.min_size = min_size;
        self
    }

    pub fn with_unclip_ratio(mut self, ratio: f32) -> Self {
        self.unclip_ratio = ratio;
        self
    }

    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.max_size == Some(0) {
            return Err(DetectionError::InvalidConfig(
                "max_size must be positive".to_string(),
            ));
        }
        if !self.unclip_ratio.is_finite() {
            return Err(DetectionError::InvalidConfig(format!(
                "unclip_ratio must be finite, got {}",
                self.unclip_ratio
            )));
        }
        for (name, value) in [
            ("box_score_threshold", self.box_score_threshold),
            ("box_threshold", self.box_threshold),
        ] {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(DetectionError::InvalidConfig(format!(
                        "{name} must be finite, got {v}"
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self::new()
    }
}
