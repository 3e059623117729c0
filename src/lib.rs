mod utils;
pub mod common;
pub mod data;
pub mod detection_runners;
pub mod error;

use anyhow::Context;
use crate::common::{BvrDetection, ModelGeometry};
use crate::data::{ConfigPost, RawOutputTensor};
use crate::detection_runners::DetectionPipeline;

pub use crate::error::PostprocessError;

pub type Result<T, E = PostprocessError> = std::result::Result<T, E>;

/// One-shot post-processing of a single raw output using rayon's global pool
/// and the default IoU threshold.
pub fn run_detection(tensor: &RawOutputTensor<'_>, geometry: &ModelGeometry,
                     original_size: (u32, u32), confidence_threshold: f32) -> anyhow::Result<Vec<BvrDetection>> {
    let pipeline = DetectionPipeline::new(ConfigPost::new().with_confidence(confidence_threshold))?;

    let detections = pipeline
        .detect(tensor, geometry, original_size)
        .with_context(|| format!("Failed to post-process {} output of shape {:?}", geometry.architecture, tensor.shape()))?;

    Ok(detections)
}
