use image::GrayImage;
use imageproc::point::Point;

use crate::detection::geometry::fill_polygon;
use crate::models::ProbabilityImage;

/// Mean probability inside the polygon described by `contour`.
///
/// Points are clamped into the map first. Degenerate input (no points, an
/// empty bounding box or an empty fill) scores 0 rather than failing.
pub fn box_score(contour: &[Point<i32>], pred: &ProbabilityImage) -> f32 {
    let (width, height) = (pred.width() as i32, pred.height() as i32);
    if contour.is_empty() || width == 0 || height == 0 {
        return 0.0;
    }

    let clamped: Vec<Point<i32>> = contour
        .iter()
        .map(|p| Point::new(p.x.clamp(0, width - 1), p.y.clamp(0, height - 1)))
        .collect();

    let (xmin, ymin, xmax, ymax) = clamped.iter().fold(
        (i32::MAX, i32::MAX, i32::MIN, i32::MIN),
        |(xmin, ymin, xmax, ymax), p| (xmin.min(p.x), ymin.min(p.y), xmax.max(p.x), ymax.max(p.y)),
    );

    let roi_width = xmax - xmin + 1;
    let roi_height = ymax - ymin + 1;
    if roi_width <= 0 || roi_height <= 0 {
        return 0.0;
    }

    let shifted: Vec<Point<i32>> = clamped
        .iter()
        .map(|p| Point::new(p.x - xmin, p.y - ymin))
        .collect();

    let mut mask = GrayImage::new(roi_width as u32, roi_height as u32);
    fill_polygon(&mut mask, &shifted, 255);

    let mut sum = 0.0f64;
    let mut count = 0usize;
    for (x, y, m) in mask.enumerate_pixels() {
        if m[0] == 0 {
            continue;
        }
        let px = pred.get_pixel(xmin as u32 + x, ymin as u32 + y)[0];
        sum += f64::from(px);
        count += 1;
    }

    if count == 0 {
        return 0.0;
    }
    (sum / count as f64) as f32
}
