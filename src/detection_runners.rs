pub mod decoder;
pub mod letterbox;
pub mod nms;
pub mod pipeline;
mod v5_decoder;
mod v8_decoder;

pub use decoder::{decoder_for, OutputDecoder};
pub use letterbox::LetterboxTransform;
pub use nms::{suppress, Nms};
pub use pipeline::DetectionPipeline;
pub use v5_decoder::V5Decoder;
pub use v8_decoder::V8Decoder;
