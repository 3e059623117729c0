//! Decoder for the anchor-free heads (v8, v9, v11): `[1, 4 + C, N]`, each
//! attribute stored as a plane of `N` values. There is no objectness field;
//! the raw class score is the confidence.

use crate::common::{BvrBox, Candidate, ModelArchitecture};
use crate::data::RawOutputTensor;
use crate::detection_runners::decoder::{collect_par, single_batch_dims, OutputDecoder};
use crate::error::PostprocessError;
use crate::Result;

const FIRST_CLASS: usize = 4;

#[derive(Debug, Clone, Copy, Default)]
pub struct V8Decoder {
    class_count: usize,
}

impl V8Decoder {
    pub fn new(class_count: usize) -> Self {
        Self { class_count }
    }

    /// Returns `(box_count, class_count)` for a valid channel-major output.
    fn layout(&self, tensor: &RawOutputTensor<'_>) -> Result<(usize, usize)> {
        let (channels, boxes) = single_batch_dims(tensor)?;

        let fits = channels > FIRST_CLASS && (self.class_count == 0 || channels == FIRST_CLASS + self.class_count);
        if !fits {
            return Err(PostprocessError::LayoutMismatch {
                layout: "YoloV8OrLater",
                shape: tensor.shape().to_vec(),
                class_count: self.class_count,
            });
        }

        Ok((boxes, channels - FIRST_CLASS))
    }
}

impl OutputDecoder for V8Decoder {
    fn decode(&self, tensor: &RawOutputTensor<'_>, confidence_threshold: f32) -> Result<Vec<Candidate>> {
        let (box_count, class_count) = self.layout(tensor)?;

        let candidates = collect_par(box_count, |i, out| {
            for class_index in 0..class_count {
                let confidence = tensor.at(FIRST_CLASS + class_index, i);
                if confidence.is_nan() || confidence < confidence_threshold {
                    continue;
                }

                let bbox = BvrBox::new(tensor.at(0, i), tensor.at(1, i), tensor.at(2, i), tensor.at(3, i));
                out.push(Candidate::new(class_index, bbox, confidence));
            }
        });

        log::debug!("YoloV8OrLater decode: {} boxes -> {} candidates", box_count, candidates.len());
        Ok(candidates)
    }

    fn architecture(&self) -> ModelArchitecture {
        ModelArchitecture::V8OrLater
    }
}
