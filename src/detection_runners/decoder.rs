use rayon::prelude::*;

use crate::common::{Candidate, ModelArchitecture};
use crate::data::RawOutputTensor;
use crate::detection_runners::{V5Decoder, V8Decoder};
use crate::error::PostprocessError;
use crate::Result;

/// Turns a raw detection head output into center-form candidates in model
/// input pixels. Candidates below `confidence_threshold` are never emitted.
pub trait OutputDecoder: Send + Sync {
    fn decode(&self, tensor: &RawOutputTensor<'_>, confidence_threshold: f32) -> Result<Vec<Candidate>>;

    fn architecture(&self) -> ModelArchitecture;
}

/// Picks the decoder for `architecture`. `class_count == 0` lets the decoder
/// take the class count from the tensor shape.
pub fn decoder_for(architecture: ModelArchitecture, class_count: usize) -> Box<dyn OutputDecoder> {
    match architecture {
        ModelArchitecture::V5 => Box::new(V5Decoder::new(class_count)),
        ModelArchitecture::V8OrLater => Box::new(V8Decoder::new(class_count)),
    }
}

/// Checks a `[1, rows, cols]` output and returns `(rows, cols)`.
pub(crate) fn single_batch_dims(tensor: &RawOutputTensor<'_>) -> Result<(usize, usize)> {
    match tensor.shape() {
        &[1, rows, cols] => Ok((rows, cols)),
        &[batch, _, _] => Err(PostprocessError::BatchNotSupported(batch)),
        shape => Err(PostprocessError::RankMismatch {
            expected: 3,
            actual: shape.len(),
        }),
    }
}

/// Runs `emit` for every box index in parallel. Each worker fills its own
/// buffer over a contiguous index range; buffers are joined in index order.
pub(crate) fn collect_par<F>(box_count: usize, emit: F) -> Vec<Candidate>
where
    F: Fn(usize, &mut Vec<Candidate>) + Send + Sync,
{
    (0..box_count)
        .into_par_iter()
        .fold(Vec::new, |mut acc, i| {
            emit(i, &mut acc);
            acc
        })
        .reduce(Vec::new, |mut left, mut right| {
            left.append(&mut right);
            left
        })
}
