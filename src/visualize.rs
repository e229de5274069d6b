use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;

use crate::models::OrientedBox;

/// Copy of `img` with the outline of every box drawn in `color`.
///
/// `thickness` is the stroke width in pixels; 0 is treated as 1. Even
/// widths put the extra pixel on the positive side of each edge.
pub fn visualize(
    img: &DynamicImage,
    boxes: &[OrientedBox],
    color: Rgb<u8>,
    thickness: u32,
) -> RgbImage {
    let mut canvas = img.to_rgb8();
    let thickness = thickness.max(1) as i32;
    let (lo, hi) = (-(thickness - 1) / 2, thickness / 2);

    for b in boxes {
        let corners = b.corners();
        for i in 0..corners.len() {
            let (start, end) = (corners[i], corners[(i + 1) % corners.len()]);
            for dy in lo..=hi {
                for dx in lo..=hi {
                    let (ox, oy) = (dx as f32, dy as f32);
                    draw_line_segment_mut(
                        &mut canvas,
                        (start.x + ox, start.y + oy),
                        (end.x + ox, end.y + oy),
                        color,
                    );
                }
            }
        }
    }

    canvas
}
