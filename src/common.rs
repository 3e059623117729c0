mod bvr_box;
mod bvr_detection;
mod model_config;
mod model_metadata;
mod model_version;

pub use bvr_box::*;
pub use bvr_detection::*;
pub use model_config::*;
pub use model_metadata::*;
pub use model_version::*;
