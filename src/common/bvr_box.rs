use serde::{Deserialize, Serialize};

/// Center-form box `(cx, cy, w, h)` in model input pixel units.
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BvrBox {
    pub cx: f32,
    pub cy: f32,
    pub w: f32,
    pub h: f32,
}

/// Corner-form box `(x_min, y_min, x_max, y_max)`.
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CornerBox {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
}

/// Integer pixel rectangle `(x, y, width, height)` in original image space.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BvrRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BvrBox {
    pub fn new(cx: f32, cy: f32, w: f32, h: f32) -> Self {
        Self { cx, cy, w, h }
    }

    pub fn to_corners(&self) -> CornerBox {
        center_form_to_corner_form(self)
    }

    /// Computes the intersection over union (IoU) between this bounding box and another.
    pub fn iou(&self, other: &BvrBox) -> f32 {
        intersection_over_union(&self.to_corners(), &other.to_corners())
    }
}

impl CornerBox {
    pub fn new(x_min: f32, y_min: f32, x_max: f32, y_max: f32) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    pub fn width(&self) -> f32 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f32 {
        self.y_max - self.y_min
    }

    /// Computes the area of the box. Inverted boxes have zero area.
    pub fn area(&self) -> f32 {
        self.width().max(0.) * self.height().max(0.)
    }

    /// Computes the intersection area between this box and another.
    pub fn intersect(&self, other: &CornerBox) -> f32 {
        let left = self.x_min.max(other.x_min);
        let right = self.x_max.min(other.x_max);
        let top = self.y_min.max(other.y_min);
        let bottom = self.y_max.min(other.y_max);
        (right - left).max(0.) * (bottom - top).max(0.)
    }

    /// Returns the box as `(x, y, w, h)` with `(x, y)` the top-left corner.
    pub fn xy1_wh(&self) -> (f32, f32, f32, f32) {
        (self.x_min, self.y_min, self.width(), self.height())
    }
}

impl BvrRect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Converts `(cx, cy, w, h)` into `(x_min, y_min, x_max, y_max)`.
pub fn center_form_to_corner_form(bbox: &BvrBox) -> CornerBox {
    let half_w = bbox.w / 2.;
    let half_h = bbox.h / 2.;
    CornerBox {
        x_min: bbox.cx - half_w,
        y_min: bbox.cy - half_h,
        x_max: bbox.cx + half_w,
        y_max: bbox.cy + half_h,
    }
}

/// Intersection over union of two corner-form boxes.
///
/// A box with a non-positive (or NaN) area has an IoU of 0 with anything,
/// itself included.
pub fn intersection_over_union(a: &CornerBox, b: &CornerBox) -> f32 {
    let area_a = a.area();
    if area_a.is_nan() || area_a <= 0. {
        return 0.;
    }

    let area_b = b.area();
    if area_b.is_nan() || area_b <= 0. {
        return 0.;
    }

    let intersection = a.intersect(b);
    intersection / (area_a + area_b - intersection)
}
