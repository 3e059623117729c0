use std::time::Instant;

use crate::common::{BvrDetection, Candidate, ModelGeometry};
use crate::data::{ConfigPost, RawOutputTensor};
use crate::detection_runners::decoder::decoder_for;
use crate::detection_runners::letterbox::LetterboxTransform;
use crate::detection_runners::nms::suppress;
use crate::error::PostprocessError;
use crate::Result;
use crate::utils;

/// Decode -> suppress -> inverse transform over one image's raw output.
#[derive(Debug)]
pub struct DetectionPipeline {
    config: ConfigPost,
    pool: Option<rayon::ThreadPool>,
}

impl DetectionPipeline {
    /// Creates the pipeline, building a dedicated decode pool when
    /// `config.max_workers` is set.
    pub fn new(config: ConfigPost) -> Result<Self> {
        let pool = match config.max_workers {
            None => None,
            Some(n) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n.max(1))
                    .thread_name(|i| format!("bvr-decode-{i}"))
                    .build()
                    .map_err(|e| PostprocessError::ThreadPool(e.to_string()))?,
            ),
        };

        log::info!(
            "Post-processing pipeline: confidence={} iou={} workers={}",
            config.confidence,
            config.iou,
            config.max_workers.map_or("global".to_string(), |n| n.to_string())
        );

        Ok(Self { config, pool })
    }

    /// Runs with the configured confidence threshold.
    pub fn detect(&self, tensor: &RawOutputTensor<'_>, geometry: &ModelGeometry, original_size: (u32, u32)) -> Result<Vec<BvrDetection>> {
        self.run(tensor, geometry, original_size, self.config.confidence)
    }

    /// Executes the full post-processing chain.
    ///
    /// # Arguments
    ///
    /// * `tensor` - First output of the detection model.
    /// * `geometry` - Input resolution, architecture and classes of the model.
    /// * `original_size` - Original image size as `(width, height)`.
    /// * `confidence_threshold` - Minimum score a detection must reach.
    ///
    /// # Returns
    ///
    /// * Detections in original image pixels, highest confidence first. Finding
    ///   nothing is an empty vector, not an error.
    pub fn run(
        &self,
        tensor: &RawOutputTensor<'_>,
        geometry: &ModelGeometry,
        original_size: (u32, u32),
        confidence_threshold: f32,
    ) -> Result<Vec<BvrDetection>> {
        let start = Instant::now();
        let mut _elapsed = start.elapsed();

        if !geometry.names.is_empty() && geometry.names.len() != geometry.class_count {
            log::warn!(
                "Model ships {} class names for {} classes, labels may be missing or wrong",
                geometry.names.len(),
                geometry.class_count
            );
        }

        let candidates = self.decode(tensor, geometry, confidence_threshold)?;
        _elapsed = utils::trace(self.config.profile, "TIME", "Decode", start, _elapsed);

        let kept = suppress(&candidates, self.config.iou);
        _elapsed = utils::trace(self.config.profile, "TIME", "NMS", start, _elapsed);

        let detections = Self::inverse_transform(&kept, geometry, original_size);
        utils::trace(self.config.profile, "TIME", "Inverse transform", start, _elapsed);

        log::debug!(
            "{} candidates -> {} after NMS -> {} detections",
            candidates.len(),
            kept.len(),
            detections.len()
        );

        Ok(detections)
    }

    /// Decodes on the dedicated pool if there is one, else on rayon's global pool.
    pub fn decode(&self, tensor: &RawOutputTensor<'_>, geometry: &ModelGeometry, confidence_threshold: f32) -> Result<Vec<Candidate>> {
        let decoder = decoder_for(geometry.architecture, geometry.class_count);
        log::debug!("Decoding {:?} as {}", tensor.shape(), decoder.architecture());
        match &self.pool {
            Some(pool) => pool.install(|| decoder.decode(tensor, confidence_threshold)),
            None => decoder.decode(tensor, confidence_threshold),
        }
    }

    /// Maps suppressed candidates into original image space. Boxes whose
    /// mapping is not finite are dropped.
    pub fn inverse_transform(kept: &[Candidate], geometry: &ModelGeometry, original_size: (u32, u32)) -> Vec<BvrDetection> {
        let transform = LetterboxTransform::new((geometry.input_width, geometry.input_height), original_size);

        let detections: Vec<BvrDetection> = kept
            .iter()
            .filter_map(|candidate| {
                let rect = transform.apply(&candidate.bbox.to_corners())?;
                let detection = BvrDetection::new(candidate.class_index, rect, None, candidate.confidence);
                Some(match geometry.label(candidate.class_index) {
                    Some(label) => detection.with_label(label),
                    None => detection,
                })
            })
            .collect();

        if detections.len() < kept.len() {
            log::debug!("Dropped {} detections with a degenerate mapping", kept.len() - detections.len());
        }

        detections
    }
}
