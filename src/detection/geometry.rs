//! Polygon primitives used by the scorer and the unclipper.
//!
//! Contour area comes straight from `imageproc::geometry`; this module adds
//! the pieces it lacks in the form the post-processing needs: a guarded arc
//! length, a float minimum-area rectangle and a panic-free polygon fill.

use image::{GrayImage, Luma};
use imageproc::drawing::draw_line_segment_mut;
use imageproc::geometry::convex_hull;
use imageproc::point::Point;

use crate::models::OrientedBox;

/// Perimeter of the closed polygon through `points`.
pub fn arc_length(points: &[Point<i32>]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    imageproc::geometry::arc_length(points, true)
}

/// Minimum-area rectangle enclosing `points`.
///
/// Found with rotating calipers over the convex hull. The reported angle is
/// in degrees within `(-45, 45]`.
pub fn min_area_rect(points: &[Point<i32>]) -> OrientedBox {
    let Some(first) = points.first() else {
        return OrientedBox::new(Point::new(0.0, 0.0), 0.0, 0.0, 0.0);
    };

    let hull: Vec<Point<f32>> = convex_hull(points)
        .into_iter()
        .map(|p| Point::new(p.x as f32, p.y as f32))
        .collect();

    rotating_calipers(&hull).unwrap_or_else(|| {
        OrientedBox::new(Point::new(first.x as f32, first.y as f32), 0.0, 0.0, 0.0)
    })
}

fn rotating_calipers(hull: &[Point<f32>]) -> Option<OrientedBox> {
    let n = hull.len();
    let mut best: Option<(f32, OrientedBox)> = None;

    for i in 0..n {
        let p1 = hull[i];
        let p2 = hull[(i + 1) % n];

        let (edge_x, edge_y) = (p2.x - p1.x, p2.y - p1.y);
        let edge_len = edge_x.hypot(edge_y);
        if edge_len < 1e-6 {
            continue;
        }

        // u along the edge, v perpendicular to it
        let (ux, uy) = (edge_x / edge_len, edge_y / edge_len);
        let (vx, vy) = (-uy, ux);

        let (mut min_u, mut max_u) = (f32::MAX, f32::MIN);
        let (mut min_v, mut max_v) = (f32::MAX, f32::MIN);
        for p in hull {
            let (dx, dy) = (p.x - p1.x, p.y - p1.y);
            let u = dx * ux + dy * uy;
            let v = dx * vx + dy * vy;
            min_u = min_u.min(u);
            max_u = max_u.max(u);
            min_v = min_v.min(v);
            max_v = max_v.max(v);
        }

        let (width, height) = (max_u - min_u, max_v - min_v);
        let area = width * height;
        if best.as_ref().is_some_and(|(best_area, _)| area >= *best_area) {
            continue;
        }

        let (cu, cv) = ((min_u + max_u) / 2.0, (min_v + max_v) / 2.0);
        let center = Point::new(p1.x + cu * ux + cv * vx, p1.y + cu * uy + cv * vy);
        let (angle, width, height) = normalize_angle(uy.atan2(ux).to_degrees(), width, height);
        best = Some((area, OrientedBox::new(center, width, height, angle)));
    }

    best.map(|(_, rect)| rect)
}

/// Bring an angle into `(-45, 45]`, swapping the sides on each quarter turn.
fn normalize_angle(mut angle: f32, mut width: f32, mut height: f32) -> (f32, f32, f32) {
    // Half turns leave a rectangle unchanged
    if angle > 90.0 {
        angle -= 180.0;
    } else if angle <= -90.0 {
        angle += 180.0;
    }
    if angle > 45.0 {
        angle -= 90.0;
        std::mem::swap(&mut width, &mut height);
    } else if angle <= -45.0 {
        angle += 90.0;
        std::mem::swap(&mut width, &mut height);
    }
    (angle, width, height)
}

/// Fill the polygon through `points` into `mask`, boundary included.
///
/// Interior rows are filled with the even-odd rule sampled at pixel
/// centers; the outline is then rasterized on top so that thin and
/// degenerate polygons still mark the pixels they pass through.
pub fn fill_polygon(mask: &mut GrayImage, points: &[Point<i32>], value: u8) {
    let (width, height) = (mask.width() as i32, mask.height() as i32);
    let Some(first) = points.first().copied() else {
        return;
    };

    let (min_y, max_y) = points
        .iter()
        .fold((first.y, first.y), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));

    let mut crossings: Vec<f64> = Vec::new();
    for y in min_y.max(0)..=max_y.min(height - 1) {
        crossings.clear();
        for (i, p0) in points.iter().enumerate() {
            let p1 = points[(i + 1) % points.len()];
            let (lo, hi) = (p0.y.min(p1.y), p0.y.max(p1.y));
            // Half-open span keeps shared vertices from being counted twice
            if lo == hi || y < lo || y >= hi {
                continue;
            }
            let t = f64::from(y - p0.y) / f64::from(p1.y - p0.y);
            crossings.push(f64::from(p0.x) + t * f64::from(p1.x - p0.x));
        }
        crossings.sort_by(|a, b| a.total_cmp(b));

        for span in crossings.chunks_exact(2) {
            let from = (span[0].ceil() as i32).max(0);
            let to = (span[1].floor() as i32).min(width - 1);
            for x in from..=to {
                mask.put_pixel(x as u32, y as u32, Luma([value]));
            }
        }
    }

    for (i, p0) in points.iter().enumerate() {
        let p1 = points[(i + 1) % points.len()];
        draw_line_segment_mut(
            mask,
            (p0.x as f32, p0.y as f32),
            (p1.x as f32, p1.y as f32),
            Luma([value]),
        );
        if (0..width).contains(&p0.x) && (0..height).contains(&p0.y) {
            mask.put_pixel(p0.x as u32, p0.y as u32, Luma([value]));
        }
    }
}
