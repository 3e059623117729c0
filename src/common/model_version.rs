use serde::{Deserialize, Serialize};
use crate::error::PostprocessError;

/// Output layout family of a YOLO detection head.
///
/// * `V5` - `[1, N, 5 + C]`, per-box `cx, cy, w, h, objectness, class scores..`
/// * `V8OrLater` - `[1, 4 + C, N]`, channel-major planes, no objectness (v8, v9, v11)
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelArchitecture {
    V5,
    #[default] V8OrLater,
}

impl ModelArchitecture {
    pub fn name(&self) -> String {
        match self {
            Self::V5 => "YoloV5".to_string(),
            Self::V8OrLater => "YoloV8OrLater".to_string(),
        }
    }

    /// Parses the version spellings used in model configs (`yolov5`, `v11`, ...).
    pub fn from(version: &str) -> Result<ModelArchitecture, PostprocessError> {
        match version.trim().to_lowercase().as_str() {
            "yolov5" | "v5" => Ok(ModelArchitecture::V5),
            "yolov8" | "v8" | "yolov9" | "v9" | "yolov11" | "v11" | "yolo11" => {
                Ok(ModelArchitecture::V8OrLater)
            }
            other => Err(PostprocessError::UnknownArchitecture(format!(
                "unrecognised version tag '{other}'"
            ))),
        }
    }

    /// Determines the layout from the first output's shape.
    ///
    /// `class_count == 0` means the class count is unknown; the channel-major
    /// layout is then recognised by having fewer rows than columns.
    pub fn infer(output_shape: &[usize], class_count: usize) -> Result<ModelArchitecture, PostprocessError> {
        let [_, rows, cols] = output_shape else {
            return Err(PostprocessError::UnknownArchitecture(format!(
                "expected a rank 3 output, got shape {output_shape:?}"
            )));
        };
        Self::from_dims(Some(*rows), Some(*cols), class_count, &output_shape)
    }

    /// Same as [`ModelArchitecture::infer`] on a shape declared by the session,
    /// where negative dimensions are dynamic. Only the dimension a layout is
    /// recognised by has to be static.
    pub fn infer_declared(output_shape: &[i64], class_count: usize) -> Result<ModelArchitecture, PostprocessError> {
        let [_, rows, cols] = output_shape else {
            return Err(PostprocessError::UnknownArchitecture(format!(
                "expected a rank 3 output, got shape {output_shape:?}"
            )));
        };
        let known = |d: i64| usize::try_from(d).ok();
        Self::from_dims(known(*rows), known(*cols), class_count, &output_shape)
    }

    fn from_dims(rows: Option<usize>, cols: Option<usize>, class_count: usize,
                 shape: &dyn std::fmt::Debug) -> Result<ModelArchitecture, PostprocessError> {
        if class_count == 0 {
            return match (rows, cols) {
                (Some(r), Some(c)) if r > 4 && r < c => Ok(ModelArchitecture::V8OrLater),
                (Some(r), Some(c)) if c > 5 && c < r => Ok(ModelArchitecture::V5),
                _ => Err(PostprocessError::UnknownArchitecture(format!(
                    "ambiguous output shape {shape:?} without a class count"
                ))),
            };
        }

        if rows == Some(class_count + 4) {
            Ok(ModelArchitecture::V8OrLater)
        } else if cols == Some(class_count + 5) {
            Ok(ModelArchitecture::V5)
        } else {
            Err(PostprocessError::UnknownArchitecture(format!(
                "output shape {shape:?} fits no known layout for {class_count} classes"
            )))
        }
    }
}

impl std::fmt::Display for ModelArchitecture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name())
    }
}
