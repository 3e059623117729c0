//! Maps model-space boxes back onto the original image.
//!
//! Upstream resizes straight to the model resolution without keeping the
//! aspect ratio, so each axis has its own scale and the padding term works
//! out to zero. The padding step stays so a letterboxing resize can be
//! swapped in without touching callers.

use crate::common::{BvrRect, CornerBox};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LetterboxTransform {
    ratio: (f32, f32),
    padding: (i32, i32),
}

impl LetterboxTransform {
    /// # Arguments
    ///
    /// * `model` - Model input resolution as `(width, height)`.
    /// * `original` - Original image resolution as `(width, height)`.
    pub fn new(model: (u32, u32), original: (u32, u32)) -> Self {
        let (model_w, model_h) = (model.0 as f32, model.1 as f32);
        let (orig_w, orig_h) = (original.0 as f32, original.1 as f32);

        let ratio = (orig_w / model_w, orig_h / model_h);

        let reduction = (model_w / orig_w, model_h / orig_h);
        // Truncated to whole pixels; a NaN from a zero-sized image casts to 0.
        let padding = (
            ((model_w - orig_w * reduction.0) / 2.) as i32,
            ((model_h - orig_h * reduction.1) / 2.) as i32,
        );

        Self { ratio, padding }
    }

    pub fn ratio(&self) -> (f32, f32) {
        self.ratio
    }

    pub fn padding(&self) -> (i32, i32) {
        self.padding
    }

    /// Scales a corner-form model box into original pixels, truncating to
    /// integers. Returns `None` when the mapping is not finite, e.g. for a
    /// model with a zero input dimension, or when the box has a negative
    /// width or height.
    pub fn apply(&self, bbox: &CornerBox) -> Option<BvrRect> {
        let (x, y, w, h) = bbox.xy1_wh();

        let x = (x - self.padding.0 as f32) * self.ratio.0;
        let y = (y - self.padding.1 as f32) * self.ratio.1;
        let w = w * self.ratio.0;
        let h = h * self.ratio.1;

        if !(x.is_finite() && y.is_finite() && w.is_finite() && h.is_finite()) {
            return None;
        }
        if w < 0. || h < 0. {
            return None;
        }

        Some(BvrRect::new(x as i32, y as i32, w as i32, h as i32))
    }
}
