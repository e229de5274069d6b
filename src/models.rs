use image::{ImageBuffer, Luma, imageops};
use imageproc::point::Point;

/// Single-channel `f32` image holding per-pixel text probabilities.
pub type ProbabilityImage = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Width and height of the image region that excludes stride padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidSize {
    pub width: u32,
    pub height: u32,
}

/// Rectangle with a center, a size and a rotation angle in degrees.
///
/// `width` is measured along the direction given by `angle`, `height`
/// perpendicular to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedBox {
    pub center: Point<f32>,
    pub width: f32,
    pub height: f32,
    pub angle: f32,
}

impl OrientedBox {
    pub fn new(center: Point<f32>, width: f32, height: f32, angle: f32) -> Self {
        Self {
            center,
            width,
            height,
            angle,
        }
    }

    /// Corner points, walking around the box starting at the
    /// (-width, -height) corner in the box's own frame.
    pub fn corners(&self) -> [Point<f32>; 4] {
        let (sin, cos) = self.angle.to_radians().sin_cos();
        let (hw, hh) = (self.width / 2.0, self.height / 2.0);
        // u runs along the width, v along the height
        let (ux, uy) = (cos * hw, sin * hw);
        let (vx, vy) = (-sin * hh, cos * hh);
        let c = self.center;
        [
            Point::new(c.x - ux - vx, c.y - uy - vy),
            Point::new(c.x + ux - vx, c.y + uy - vy),
            Point::new(c.x + ux + vx, c.y + uy + vy),
            Point::new(c.x - ux + vx, c.y - uy + vy),
        ]
    }
}

/// Closed polygon boundary traced from a binary mask.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    pub points: Vec<Point<i32>>,
}

impl Contour {
    pub fn new(points: Vec<Point<i32>>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Network output reshaped into an image, plus the unpadded region size.
#[derive(Debug, Clone)]
pub struct ProbabilityMap {
    pub map: ProbabilityImage,
    pub valid: ValidSize,
}

impl ProbabilityMap {
    pub fn width(&self) -> u32 {
        self.map.width()
    }

    pub fn height(&self) -> u32 {
        self.map.height()
    }

    /// Copy of the map cropped to the valid (unpadded) region.
    pub fn valid_region(&self) -> ProbabilityImage {
        imageops::crop_imm(&self.map, 0, 0, self.valid.width, self.valid.height).to_image()
    }
}
