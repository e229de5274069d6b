use std::borrow::Cow;

use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView};
use tracing::debug;

use crate::error::{DetectionError, Result};
use crate::models::ValidSize;

/// Spatial stride the network input must be a multiple of.
pub const STRIDE: u32 = 32;

/// Per-channel mean, indexed by channel position in the input.
pub const MEAN: [f32; 3] = [0.485, 0.456, 0.406];

/// Per-channel standard deviation, indexed by channel position in the input.
pub const STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Interleaved, standardized `f32` pixels.
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    pub width: u32,
    pub height: u32,
    pub channels: usize,
    pub data: Vec<f32>,
}

/// Everything the inference round trip needs from preprocessing.
#[derive(Debug, Clone)]
pub struct PreparedInput {
    /// `[1, 3, H, W]` shape of `tensor`
    pub shape: [usize; 4],
    /// Channel-planar, row-major input values
    pub tensor: Vec<f32>,
    /// Size after resizing and before padding
    pub valid: ValidSize,
}

/// Reject images the pipeline cannot handle and bring the rest to 8 bits.
pub fn validate(img: &DynamicImage) -> Result<Cow<'_, DynamicImage>> {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(DetectionError::EmptyImage { width, height });
    }

    match img {
        DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => Ok(Cow::Borrowed(img)),
        _ => match img.color().channel_count() {
            1 => Ok(Cow::Owned(DynamicImage::ImageLuma8(img.to_luma8()))),
            3 => Ok(Cow::Owned(DynamicImage::ImageRgb8(img.to_rgb8()))),
            n => Err(DetectionError::UnsupportedChannels(n)),
        },
    }
}

/// Downscale so the longest edge is at most `max_size`, keeping the aspect ratio.
///
/// Returns an unchanged copy when no limit is set or the image already fits.
pub fn resize_to_max(img: &DynamicImage, max_size: Option<u32>) -> DynamicImage {
    let Some(max_size) = max_size else {
        return img.clone();
    };

    let (width, height) = img.dimensions();
    let long_edge = width.max(height);
    let scale = f64::from(max_size) / f64::from(long_edge);
    if scale >= 1.0 {
        return img.clone();
    }

    let new_width = ((f64::from(width) * scale).round() as u32).max(1);
    let new_height = ((f64::from(height) * scale).round() as u32).max(1);
    img.resize_exact(new_width, new_height, FilterType::Triangle)
}

/// Round `value` up to the next multiple of [`STRIDE`].
pub fn align_to_stride(value: u32) -> u32 {
    value.div_ceil(STRIDE) * STRIDE
}

/// Pad bottom and right with black so both sides are multiples of [`STRIDE`].
pub fn pad_to_stride(img: &DynamicImage) -> DynamicImage {
    let (width, height) = img.dimensions();
    let (padded_width, padded_height) = (align_to_stride(width), align_to_stride(height));
    if (padded_width, padded_height) == (width, height) {
        return img.clone();
    }

    let mut canvas = DynamicImage::new(padded_width, padded_height, img.color());
    imageops::replace(&mut canvas, img, 0, 0);
    canvas
}

/// Scale 8-bit samples to `[0, 1]` and standardize each channel.
///
/// Expects an 8-bit image, as returned by [`validate`].
pub fn normalize(img: &DynamicImage) -> NormalizedImage {
    let channels = usize::from(img.color().channel_count());
    let scales: Vec<f32> = STD.iter().map(|s| 1.0 / s).collect();

    let data = img
        .as_bytes()
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let c = i % channels;
            (f32::from(v) / 255.0 - MEAN[c]) * scales[c]
        })
        .collect();

    NormalizedImage {
        width: img.width(),
        height: img.height(),
        channels,
        data,
    }
}

/// Deinterleave into three channel planes.
///
/// Planes past the image's own channel count stay zero.
pub fn to_planar(img: &NormalizedImage) -> Vec<f32> {
    let plane = img.width as usize * img.height as usize;
    let mut planar = vec![0.0f32; plane * 3];
    for (i, pixel) in img.data.chunks_exact(img.channels).enumerate() {
        for (c, &value) in pixel.iter().enumerate().take(3) {
            planar[c * plane + i] = value;
        }
    }
    planar
}

/// Run the whole preprocessing chain on an input image.
pub fn prepare(img: &DynamicImage, max_size: Option<u32>) -> Result<PreparedInput> {
    let img = validate(img)?;

    let resized = resize_to_max(&img, max_size);
    let valid = ValidSize {
        width: resized.width(),
        height: resized.height(),
    };
    let padded = pad_to_stride(&resized);
    drop(resized);

    let normalized = normalize(&padded);
    let shape = [1, 3, normalized.height as usize, normalized.width as usize];
    let tensor = to_planar(&normalized);

    debug!(
        src_width = img.width(),
        src_height = img.height(),
        valid_width = valid.width,
        valid_height = valid.height,
        input_width = shape[3],
        input_height = shape[2],
        "prepared network input"
    );

    Ok(PreparedInput {
        shape,
        tensor,
        valid,
    })
}
