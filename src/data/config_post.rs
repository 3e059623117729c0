//! Options for the post-processing pipeline.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIDENCE: f32 = 0.35;
pub const DEFAULT_IOU: f32 = 0.3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigPost {
    pub confidence: f32,
    pub iou: f32,
    /// Decoder worker threads. `None` shares rayon's global pool.
    pub max_workers: Option<usize>,
    pub profile: bool,
}

impl Default for ConfigPost {
    fn default() -> Self {
        Self {
            confidence: DEFAULT_CONFIDENCE,
            iou: DEFAULT_IOU,
            max_workers: None,
            profile: false,
        }
    }
}

impl ConfigPost {
    pub fn new() -> Self {
        Default::default()
    }

    /// Loads options from a JSON document; missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: ConfigPost = serde_json::from_str(json).context("Failed to parse post-processing config")?;
        if config.max_workers == Some(0) {
            anyhow::bail!("max_workers must be at least 1 when set");
        }
        Ok(config)
    }

    pub fn with_confidence(mut self, x: f32) -> Self {
        self.confidence = x;
        self
    }

    pub fn with_iou(mut self, x: f32) -> Self {
        self.iou = x;
        self
    }

    /// Pins decoding to a dedicated pool of `n` threads (at least one).
    pub fn with_max_workers(mut self, n: usize) -> Self {
        self.max_workers = Some(n.max(1));
        self
    }

    pub fn with_profile(mut self, profile: bool) -> Self {
        self.profile = profile;
        self
    }
}
