mod config_post;
mod raw_tensor;

pub use config_post::{ConfigPost, DEFAULT_CONFIDENCE, DEFAULT_IOU};
pub use raw_tensor::{RawOutputTensor, SessionIoShapes, TensorShape, ViewLayout};
