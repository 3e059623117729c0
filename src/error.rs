//! Error types for the post-processing stages.

use thiserror::Error;

/// Errors raised while validating or decoding a raw model output.
///
/// Degenerate boxes and empty results are not errors; they are filtered
/// silently by the stages that meet them.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PostprocessError {
    #[error("output tensor rank mismatch: expected {expected}, got {actual}")]
    RankMismatch { expected: usize, actual: usize },

    #[error("batched output is not supported (batch size {0})")]
    BatchNotSupported(usize),

    #[error("output shape {shape:?} does not match the {layout} layout for {class_count} classes")]
    LayoutMismatch {
        layout: &'static str,
        shape: Vec<usize>,
        class_count: usize,
    },

    #[error("tensor shape {0:?} overflows the addressable element count")]
    ShapeOverflow(Vec<i64>),

    #[error("tensor shape must not have negative dimensions: {0}")]
    NegativeDimension(i64),

    #[error("tensor has {shape} dimensions but {strides} strides")]
    StrideMismatch { shape: usize, strides: usize },

    #[error("tensor view is not contiguous in memory")]
    NonContiguous,

    #[error("tensor buffer too small: {required} elements addressable, {actual} available")]
    BufferTooSmall { required: usize, actual: usize },

    #[error("unable to determine model architecture: {0}")]
    UnknownArchitecture(String),

    #[error("invalid model metadata: {0}")]
    InvalidMetadata(String),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),
}
