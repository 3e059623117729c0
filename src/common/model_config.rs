use serde::{Deserialize, Serialize};
use crate::common::model_version::ModelArchitecture;

/// Static description of the model a raw output came from.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelGeometry {
    pub input_width: u32,
    pub input_height: u32,
    pub architecture: ModelArchitecture,
    /// Zero when unknown; the decoders then take it from the output shape.
    pub class_count: usize,
    #[serde(default)]
    pub names: Vec<String>,
}

impl ModelGeometry {
    pub fn new(input_width: u32, input_height: u32, architecture: ModelArchitecture, class_count: usize) -> Self {
        Self {
            input_width,
            input_height,
            architecture,
            class_count,
            names: Vec::new(),
        }
    }

    pub fn with_names(mut self, names: &[&str]) -> Self {
        self.names = names.iter().map(|x| x.to_string()).collect::<Vec<String>>();
        self
    }

    pub fn with_class_count(mut self, class_count: usize) -> Self {
        self.class_count = class_count;
        self
    }

    /// Class name for `class_index`, if the model shipped one.
    pub fn label(&self, class_index: usize) -> Option<&str> {
        self.names.get(class_index).map(String::as_str)
    }
}
