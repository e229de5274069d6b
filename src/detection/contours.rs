use image::{GrayImage, Luma};
use imageproc::contours::{BorderType, find_contours};
use imageproc::point::Point;

use crate::models::{Contour, ProbabilityImage};

/// Scale probabilities to 8 bits and optionally threshold them.
///
/// With a threshold, pixels at or above `threshold * 255` become 255 and
/// the rest 0. Without one the 8-bit map is returned as is.
pub fn binarize(pred: &ProbabilityImage, threshold: Option<f32>) -> GrayImage {
    let cutoff = threshold.map(|t| t * 255.0);
    GrayImage::from_fn(pred.width(), pred.height(), |x, y| {
        let v = (pred.get_pixel(x, y)[0] * 255.0).round().clamp(0.0, 255.0) as u8;
        match cutoff {
            Some(cutoff) if f32::from(v) >= cutoff => Luma([255]),
            Some(_) => Luma([0]),
            None => Luma([v]),
        }
    })
}

/// Trace the outer borders of every bright region in `mask`.
pub fn find_text_contours(mask: &GrayImage) -> Vec<Contour> {
    find_contours::<i32>(mask)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer)
        .map(|c| Contour::new(simplify(&c.points)))
        .collect()
}

/// Collapse runs of identical steps around a closed boundary to their end points.
pub fn simplify(points: &[Point<i32>]) -> Vec<Point<i32>> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let kept: Vec<Point<i32>> = (0..n)
        .filter(|&i| {
            let prev = points[(i + n - 1) % n];
            let cur = points[i];
            let next = points[(i + 1) % n];
            (cur.x - prev.x, cur.y - prev.y) != (next.x - cur.x, next.y - cur.y)
        })
        .map(|i| points[i])
        .collect();

    if kept.is_empty() {
        points.to_vec()
    } else {
        kept
    }
}
