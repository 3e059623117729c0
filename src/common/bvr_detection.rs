use serde::{Deserialize, Serialize};
use crate::common::{BvrBox, BvrRect};
use crate::detection_runners::nms::Nms;

/// A decoded, not yet suppressed, detection in model input space.
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub bbox: BvrBox,
    pub class_index: usize,
    pub confidence: f32,
}

impl Nms for Candidate {
    /// Computes the intersection over union (IoU) in corner form.
    fn iou(&self, other: &Self) -> f32 {
        self.bbox.iou(&other.bbox)
    }

    /// Returns the confidence score of the candidate.
    fn confidence(&self) -> f32 {
        self.confidence
    }

    fn class_index(&self) -> usize {
        self.class_index
    }
}

impl Candidate {
    pub fn new(class_index: usize, bbox: BvrBox, confidence: f32) -> Self {
        Self {
            bbox,
            class_index,
            confidence,
        }
    }
}

/// Final detection in original image pixel space.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BvrDetection {
    pub class_index: usize,
    pub bbox: BvrRect,
    pub label: Option<String>,
    pub confidence: f32,
}

impl BvrDetection {
    pub fn new(class_index: usize, bbox: BvrRect, label: Option<String>, confidence: f32) -> Self {
        Self {
            class_index,
            bbox,
            label,
            confidence,
        }
    }

    /// Sets the optional name of the detected class.
    ///
    /// # Arguments
    ///
    /// * `label` - The name to be set.
    ///
    /// # Returns
    ///
    /// A `BvrDetection` instance with updated name.
    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn get_label(&self) -> String {
        self.label.clone().unwrap_or("Unknown".to_string())
    }
}
