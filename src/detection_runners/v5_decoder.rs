//! Decoder for the YOLOv5 head: `[1, N, 5 + C]`, one row per box laid out as
//! `cx, cy, w, h, objectness, class_0 .. class_{C-1}`.

use crate::common::{BvrBox, Candidate, ModelArchitecture};
use crate::data::RawOutputTensor;
use crate::detection_runners::decoder::{collect_par, single_batch_dims, OutputDecoder};
use crate::error::PostprocessError;
use crate::Result;

const OBJECTNESS: usize = 4;
const FIRST_CLASS: usize = 5;

#[derive(Debug, Clone, Copy, Default)]
pub struct V5Decoder {
    class_count: usize,
}

impl V5Decoder {
    pub fn new(class_count: usize) -> Self {
        Self { class_count }
    }

    /// Returns `(box_count, class_count)` for a valid v5 output.
    fn layout(&self, tensor: &RawOutputTensor<'_>) -> Result<(usize, usize)> {
        let (boxes, fields) = single_batch_dims(tensor)?;

        let fits = fields > FIRST_CLASS && (self.class_count == 0 || fields == FIRST_CLASS + self.class_count);
        if !fits {
            return Err(PostprocessError::LayoutMismatch {
                layout: "YoloV5",
                shape: tensor.shape().to_vec(),
                class_count: self.class_count,
            });
        }

        Ok((boxes, fields - FIRST_CLASS))
    }
}

impl OutputDecoder for V5Decoder {
    fn decode(&self, tensor: &RawOutputTensor<'_>, confidence_threshold: f32) -> Result<Vec<Candidate>> {
        let (box_count, class_count) = self.layout(tensor)?;

        let candidates = collect_par(box_count, |i, out| {
            // Objectness gates every class of the box.
            let objectness = tensor.at(i, OBJECTNESS);
            if objectness.is_nan() || objectness <= confidence_threshold {
                return;
            }

            let bbox = BvrBox::new(tensor.at(i, 0), tensor.at(i, 1), tensor.at(i, 2), tensor.at(i, 3));
            for class_index in 0..class_count {
                let confidence = objectness * tensor.at(i, FIRST_CLASS + class_index);
                if confidence > confidence_threshold {
                    out.push(Candidate::new(class_index, bbox, confidence));
                }
            }
        });

        log::debug!("YoloV5 decode: {} boxes -> {} candidates", box_count, candidates.len());
        Ok(candidates)
    }

    fn architecture(&self) -> ModelArchitecture {
        ModelArchitecture::V5
    }
}
