#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use textdet::{DetectionError, InferenceEngine, Result, TensorData};

/// Marks every pixel whose first input channel is brighter than the
/// normalization mean with `probability`, everything else with 0.
///
/// Output depends only on the input tensor, so results can be compared
/// across threads.
#[derive(Clone)]
pub struct BrightPixelEngine {
    pub probability: f32,
    pub runs: Arc<AtomicUsize>,
    input: Option<(Vec<usize>, Vec<f32>)>,
    output: Option<TensorData>,
}

impl BrightPixelEngine {
    pub fn new(probability: f32) -> Self {
        Self {
            probability,
            runs: Arc::new(AtomicUsize::new(0)),
            input: None,
            output: None,
        }
    }
}

impl InferenceEngine for BrightPixelEngine {
    fn input_names(&self) -> Vec<String> {
        vec!["x".to_string()]
    }

    fn output_names(&self) -> Vec<String> {
        vec!["sigmoid".to_string()]
    }

    fn set_input(&mut self, name: &str, shape: &[usize], data: Vec<f32>) -> Result<()> {
        assert_eq!(name, "x");
        assert_eq!(shape.len(), 4);
        assert_eq!(shape[1], 3);
        assert_eq!(shape.iter().product::<usize>(), data.len());
        self.input = Some((shape.to_vec(), data));
        Ok(())
    }

    fn run(&mut self) -> Result<()> {
        let (shape, data) = self
            .input
            .take()
            .ok_or_else(|| DetectionError::Inference("no input".to_string()))?;
        let plane = shape[2] * shape[3];
        let probs = data[..plane]
            .iter()
            .map(|&v| if v > 0.0 { self.probability } else { 0.0 })
            .collect();
        self.output = Some(TensorData {
            shape: vec![1, 1, shape[2], shape[3]],
            data: probs,
        });
        self.runs.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn output(&self, name: &str) -> Result<TensorData> {
        assert_eq!(name, "sigmoid");
        self.output
            .clone()
            .ok_or_else(|| DetectionError::Inference("not run".to_string()))
    }

    fn clone_engine(&self) -> Result<Box<dyn InferenceEngine>> {
        Ok(Box::new(Self {
            probability: self.probability,
            runs: Arc::clone(&self.runs),
            input: None,
            output: None,
        }))
    }
}

/// Engine whose forward pass always fails.
pub struct FailingEngine;

impl InferenceEngine for FailingEngine {
    fn input_names(&self) -> Vec<String> {
        vec!["x".to_string()]
    }

    fn output_names(&self) -> Vec<String> {
        vec!["y".to_string()]
    }

    fn set_input(&mut self, _name: &str, _shape: &[usize], _data: Vec<f32>) -> Result<()> {
        Ok(())
    }

    fn run(&mut self) -> Result<()> {
        Err(DetectionError::Inference("device lost".to_string()))
    }

    fn output(&self, _name: &str) -> Result<TensorData> {
        Err(DetectionError::Inference("not run".to_string()))
    }

    fn clone_engine(&self) -> Result<Box<dyn InferenceEngine>> {
        Ok(Box::new(FailingEngine))
    }
}

/// Inclusive pixel rectangle `(x0, y0, x1, y1)`.
pub type Rect = (u32, u32, u32, u32);

/// Black RGB image with white rectangles painted on it.
pub fn image_with_rects(width: u32, height: u32, rects: &[Rect]) -> DynamicImage {
    let img = RgbImage::from_fn(width, height, |x, y| {
        let inside = rects
            .iter()
            .any(|&(x0, y0, x1, y1)| (x0..=x1).contains(&x) && (y0..=y1).contains(&y));
        if inside {
            Rgb([255, 255, 255])
        } else {
            Rgb([0, 0, 0])
        }
    });
    DynamicImage::ImageRgb8(img)
}

/// Single-channel variant of [`image_with_rects`].
pub fn gray_image_with_rects(width: u32, height: u32, rects: &[Rect]) -> DynamicImage {
    DynamicImage::ImageLuma8(GrayImage::from_fn(width, height, |x, y| {
        let inside = rects
            .iter()
            .any(|&(x0, y0, x1, y1)| (x0..=x1).contains(&x) && (y0..=y1).contains(&y));
        Luma([if inside { 255 } else { 0 }])
    }))
}

/// Expected `(width, height)` of the unclipped box for a solid rectangle
/// spanning `w` x `h` pixels, before scaling.
pub fn expected_unclipped_size(w: u32, h: u32, unclip_ratio: f32) -> (f32, f32) {
    // The traced outline runs through pixel centers
    let (rw, rh) = ((w - 1) as f32, (h - 1) as f32);
    let d = unclip_ratio * (rw * rh) / (2.0 * (rw + rh));
    (rw + 2.0 * d, rh + 2.0 * d)
}
