//! Custom metadata exported alongside Ultralytics ONNX models.

use std::collections::HashMap;

use anyhow::{Context, Result};
use regex::Regex;

use crate::common::{ModelArchitecture, ModelGeometry};
use crate::data::SessionIoShapes;
use crate::error::PostprocessError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YoloName {
    pub id: usize,
    pub name: String,
}

impl std::fmt::Display for YoloName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: '{}'", self.id, self.name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelMetadata {
    pub author: String,
    pub description: String,
    pub version: String,
    pub batch_size: usize,
    /// Model input resolution as `(width, height)`.
    pub image_size: (u32, u32),
    pub names: Vec<YoloName>,
    /// Declared shape of the first output, negative where dynamic.
    pub output_shape: Vec<i64>,
}

impl ModelMetadata {
    /// Reads the session's custom metadata map.
    ///
    /// `imgsz` is `"[w, h]"`; without it the input shape `[N, C, H, W]` is used.
    /// `names` is the Python dict repr `"{0: 'person', 1: 'bicycle'}"`.
    pub fn from_map(metadata: &HashMap<String, String>, shapes: &SessionIoShapes) -> Result<Self> {
        let text = |key: &str| metadata.get(key).cloned().unwrap_or_default();

        let batch_size = match metadata.get("batch") {
            Some(batch) => batch
                .trim()
                .parse::<usize>()
                .with_context(|| format!("Invalid batch size in model metadata: '{batch}'"))?,
            None => 1,
        };
        if batch_size != 1 {
            log::warn!("Model declares batch size {}, only the first image of a batch is decoded", batch_size);
        }

        let image_size = match metadata.get("imgsz") {
            Some(imgsz) => Self::parse_size(imgsz)?,
            None => Self::size_from_input(shapes)?,
        };

        let names = match metadata.get("names") {
            Some(names) => Self::parse_names(names)?,
            None => Vec::new(),
        };

        let output_shape = shapes.output0.dims().to_vec();

        let metadata = Self {
            author: text("author"),
            description: text("description"),
            version: text("version"),
            batch_size,
            image_size,
            names,
            output_shape,
        };

        log::info!(
            "Model metadata: {} v{} | input {}x{} | {} classes",
            metadata.description,
            metadata.version,
            metadata.image_size.0,
            metadata.image_size.1,
            metadata.names.len()
        );

        Ok(metadata)
    }

    /// Builds the geometry handed to the pipeline, inferring the output layout.
    pub fn geometry(&self) -> Result<ModelGeometry, PostprocessError> {
        let class_count = self.names.len();
        let architecture = ModelArchitecture::infer_declared(&self.output_shape, class_count)?;

        let names: Vec<&str> = self.names.iter().map(|n| n.name.as_str()).collect();
        Ok(ModelGeometry::new(self.image_size.0, self.image_size.1, architecture, class_count).with_names(&names))
    }

    fn parse_size(text: &str) -> Result<(u32, u32)> {
        let values = text
            .trim()
            .trim_start_matches('[')
            .trim_end_matches(']')
            .split(',')
            .map(|x| x.trim().parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("Invalid imgsz in model metadata: '{text}'"))?;

        match values.as_slice() {
            &[width, height] => Ok((width, height)),
            &[side] => Ok((side, side)),
            _ => Err(PostprocessError::InvalidMetadata(format!("imgsz '{text}' is not [w, h]")).into()),
        }
    }

    fn size_from_input(shapes: &SessionIoShapes) -> Result<(u32, u32)> {
        let dims = shapes.input0.dims();
        match dims {
            &[_, _, h, w] if h > 0 && w > 0 => Ok((u32::try_from(w)?, u32::try_from(h)?)),
            _ => Err(PostprocessError::InvalidMetadata(format!(
                "no imgsz entry and input shape {dims:?} has no static [H, W]"
            ))
            .into()),
        }
    }

    fn parse_names(text: &str) -> Result<Vec<YoloName>> {
        // e.g. `{0: 'person', 1: 'bicycle', 27: "yellow_lady's_slipper"}`
        let re = Regex::new(r#"(\d+)\s*:\s*(?:'([^']*)'|"([^"]*)")"#)?;

        let mut names = re
            .captures_iter(text)
            .map(|caps| -> Result<YoloName> {
                let id = caps[1].parse::<usize>()?;
                let name = caps.get(2).or_else(|| caps.get(3)).map_or("", |m| m.as_str());
                Ok(YoloName {
                    id,
                    name: name.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()
            .with_context(|| format!("Invalid class names in model metadata: '{text}'"))?;

        names.sort_by_key(|n| n.id);
        if names.iter().enumerate().any(|(i, n)| n.id != i) {
            return Err(PostprocessError::InvalidMetadata("class ids are not 0..n".to_string()).into());
        }

        Ok(names)
    }
}
