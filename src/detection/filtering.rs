use std::cmp::Ordering;

use crate::models::OrientedBox;

/// Drop boxes with a side at or below `min_size` and sort the rest in
/// reading order: top to bottom, then left to right.
pub fn filter_and_sort(boxes: Vec<OrientedBox>, min_size: f32) -> Vec<OrientedBox> {
    let mut kept: Vec<OrientedBox> = boxes
        .into_iter()
        .filter(|b| b.width > min_size && b.height > min_size)
        .collect();
    kept.sort_by(reading_order);
    kept
}

/// Ascending center Y, ties broken by ascending center X.
pub fn reading_order(a: &OrientedBox, b: &OrientedBox) -> Ordering {
    a.center
        .y
        .total_cmp(&b.center.y)
        .then_with(|| a.center.x.total_cmp(&b.center.x))
}
