use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in source-image pixel coordinates.
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BBox {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Builds a box from center coordinates and dimensions `(cx, cy, w, h)`.
    pub fn from_cxcywh(cx: f32, cy: f32, w: f32, h: f32) -> Self {
        Self {
            x1: cx - w / 2.0,
            y1: cy - h / 2.0,
            x2: cx + w / 2.0,
            y2: cy + h / 2.0,
        }
    }

    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    /// Computes the area of the bounding box.
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Computes the intersection area between this bounding box and another.
    pub fn intersect(&self, other: &BBox) -> f32 {
        let left = self.x1.max(other.x1);
        let right = self.x2.min(other.x2);
        let top = self.y1.max(other.y1);
        let bottom = self.y2.min(other.y2);
        (right - left).max(0.) * (bottom - top).max(0.)
    }

    /// Computes the union area between this bounding box and another.
    pub fn union(&self, other: &BBox) -> f32 {
        self.area() + other.area() - self.intersect(other)
    }

    /// Computes the intersection over union (IoU) between this bounding box and another.
    pub fn iou(&self, other: &BBox) -> f32 {
        self.intersect(other) / self.union(other)
    }

    /// Clamps the box to an image of the given dimensions. Drawing only;
    /// detection data keeps the engine's coordinates untouched.
    pub fn clamped(&self, img_width: u32, img_height: u32) -> BBox {
        let w = img_width as f32;
        let h = img_height as f32;
        BBox {
            x1: self.x1.clamp(0., w),
            y1: self.y1.clamp(0., h),
            x2: self.x2.clamp(0., w),
            y2: self.y2.clamp(0., h),
        }
    }

    /// Returns the bounding box coordinates as `[x1, y1, x2, y2]`.
    pub fn as_xyxy(&self) -> [f32; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }

    /// Returns the rounded box as `(x, y, w, h)` for rasterized drawing.
    pub fn as_xywh_i32(&self) -> (i32, i32, i32, i32) {
        (
            self.x1.round() as i32,
            self.y1.round() as i32,
            self.width().round() as i32,
            self.height().round() as i32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iou_of_disjoint_boxes_is_zero() {
        let a = BBox::new(0., 0., 10., 10.);
        let b = BBox::new(20., 20., 30., 30.);
        assert_eq!(a.intersect(&b), 0.);
        assert_eq!(a.iou(&b), 0.);
    }

    #[test]
    fn iou_of_identical_boxes_is_one() {
        let a = BBox::new(5., 5., 15., 25.);
        assert!((a.iou(&a) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn partial_overlap() {
        let a = BBox::new(0., 0., 10., 10.);
        let b = BBox::new(5., 0., 15., 10.);
        assert_eq!(a.intersect(&b), 50.);
        assert!((a.iou(&b) - 50. / 150.).abs() < 1e-6);
    }

    #[test]
    fn clamped_stays_inside_image() {
        let b = BBox::new(-10., -5., 700., 500.).clamped(640, 480);
        assert_eq!(b, BBox::new(0., 0., 640., 480.));
    }

    #[test]
    fn cxcywh_round_trip() {
        let b = BBox::from_cxcywh(50., 40., 20., 10.);
        assert_eq!(b, BBox::new(40., 35., 60., 45.));
        assert_eq!(b.as_xyxy(), [40., 35., 60., 45.]);
    }
}
