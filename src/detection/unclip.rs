use imageproc::geometry::contour_area;
use imageproc::point::Point;

use crate::detection::geometry;
use crate::models::OrientedBox;

/// Perimeters below this are treated as degenerate.
pub const MIN_PERIMETER: f64 = 1e-6;

/// Enlarge the minimum-area rectangle of `contour` and map it to source coordinates.
///
/// The rectangle grows by `d = unclip_ratio * area / perimeter` on every
/// side, then center and size are multiplied by `scale`. The angle is kept.
/// Returns `None` for contours without a usable perimeter.
pub fn unclip(contour: &[Point<i32>], unclip_ratio: f32, scale: f32) -> Option<OrientedBox> {
    let perimeter = geometry::arc_length(contour);
    if perimeter < MIN_PERIMETER {
        return None;
    }
    let area = contour_area(contour);
    let rect = geometry::min_area_rect(contour);

    let d = unclip_ratio * (area / perimeter) as f32;
    Some(OrientedBox::new(
        Point::new(rect.center.x * scale, rect.center.y * scale),
        (rect.width + 2.0 * d) * scale,
        (rect.height + 2.0 * d) * scale,
        rect.angle,
    ))
}
