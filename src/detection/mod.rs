pub mod contours;
pub mod decoding;
pub mod filtering;
pub mod geometry;
pub mod preprocessing;
pub mod scoring;
pub mod unclip;

use std::sync::{Mutex, MutexGuard};

use image::DynamicImage;
use tracing::{debug, trace};

use crate::config::DetectorConfig;
use crate::engine::InferenceEngine;
use crate::error::{DetectionError, Result};
use crate::models::{OrientedBox, ProbabilityMap};
use preprocessing::PreparedInput;

/// Text region detector: turns an image into oriented boxes around text.
///
/// Owns one inference engine handle. Calls on the same detector are
/// serialized around the engine; use [`TextDetector::try_clone`] to get an
/// independent detector for another thread.
pub struct TextDetector {
    engine: Mutex<Box<dyn InferenceEngine>>,
    config: DetectorConfig,
}

impl TextDetector {
    pub fn new(engine: Box<dyn InferenceEngine>) -> Self {
        Self::with_config(engine, DetectorConfig::default())
    }

    pub fn with_config(engine: Box<dyn InferenceEngine>, config: DetectorConfig) -> Self {
        Self {
            engine: Mutex::new(engine),
            config,
        }
    }

    /// Build a detector around an `.rten` detection model.
    #[cfg(feature = "rten")]
    pub fn from_model_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let engine = crate::engine::RtenEngine::load_file(path)?;
        Ok(Self::new(Box::new(engine)))
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut DetectorConfig {
        &mut self.config
    }

    pub fn set_config(&mut self, config: DetectorConfig) {
        self.config = config;
    }

    /// New detector with a copy of this configuration and its own engine handle.
    pub fn try_clone(&self) -> Result<Self> {
        let engine = self.lock_engine()?.clone_engine()?;
        Ok(Self::with_config(engine, self.config))
    }

    /// Detect text regions, ordered top to bottom then left to right.
    ///
    /// Box coordinates refer to the input image.
    pub fn detect(&self, img: &DynamicImage) -> Result<Vec<OrientedBox>> {
        let config = self.config;
        let prob = self.detect_raw(img)?;
        let pred = prob.valid_region();

        let mask = contours::binarize(&pred, config.box_threshold);
        let candidates = contours::find_text_contours(&mask);
        debug!(contours = candidates.len(), "traced probability mask");

        // Enlargement uses the width ratio only, for both axes
        let scale = (f64::from(img.width()) / f64::from(prob.valid.width)) as f32;

        let mut boxes = Vec::with_capacity(candidates.len());
        for contour in &candidates {
            if let Some(threshold) = config.box_score_threshold {
                let score = scoring::box_score(&contour.points, &pred);
                if score <= threshold {
                    trace!(score, threshold, "contour below score threshold");
                    continue;
                }
            }
            match unclip::unclip(&contour.points, config.unclip_ratio, scale) {
                Some(b) => boxes.push(b),
                None => trace!(points = contour.len(), "skipping degenerate contour"),
            }
        }

        let boxes = filtering::filter_and_sort(boxes, config.min_size as f32);
        debug!(boxes = boxes.len(), "detection finished");
        Ok(boxes)
    }

    /// Raw probability map for `img`, with the size of its unpadded region.
    ///
    /// Useful for inspecting what the network saw before thresholding.
    pub fn detect_raw(&self, img: &DynamicImage) -> Result<ProbabilityMap> {
        self.config.validate()?;
        let prepared = preprocessing::prepare(img, self.config.max_size)?;
        self.infer(prepared)
    }

    fn infer(&self, prepared: PreparedInput) -> Result<ProbabilityMap> {
        let PreparedInput {
            shape,
            tensor,
            valid,
        } = prepared;

        let output = {
            let mut engine = self.lock_engine()?;
            let input_name = first_name(engine.input_names(), "input")?;
            let output_name = first_name(engine.output_names(), "output")?;

            engine.set_input(&input_name, &shape, tensor)?;
            engine.run()?;
            engine.output(&output_name)?
        };

        debug!(shape = ?output.shape, "network output received");
        decoding::decode_output(output, valid)
    }

    fn lock_engine(&self) -> Result<MutexGuard<'_, Box<dyn InferenceEngine>>> {
        self.engine.lock().map_err(|_| DetectionError::LockPoisoned)
    }
}

fn first_name(names: Vec<String>, kind: &str) -> Result<String> {
    names
        .into_iter()
        .next()
        .ok_or_else(|| DetectionError::Inference(format!("model declares no {kind} tensors")))
}
