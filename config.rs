use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How decoded 8-bit channel values are mapped into the float input tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputScaling {
    /// Rescale 0..255 to 0.0..1.0.
    ZeroToOne,
    /// Feed raw 0.0..255.0 values (models exported from float TFLite
    /// pipelines without an embedded normalization op expect this).
    RawByte,
    /// Rescale 0..255 to -1.0..1.0.
    MinusOneToOne,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub model_path: PathBuf,
    pub input_width: u32,
    pub input_height: u32,
    #[serde(default = "default_scaling")]
    pub scaling: InputScaling,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("classifier.onnx"),
            input_width: 224,
            input_height: 224,
            scaling: InputScaling::ZeroToOne,
        }
    }
}

fn default_scaling() -> InputScaling {
    InputScaling::ZeroToOne
}

impl PipelineConfig {
    /// Tensor shape the engine is fed: NHWC with a batch of one.
    pub fn input_shape(&self) -> [usize; 4] {
        [1, self.input_height as usize, self.input_width as usize, 3]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelPaths {
    pub models_dir: PathBuf,
}

impl ModelPaths {
    pub fn discover() -> Self {
        let models_dir = std::env::var_os("IMAGE_CLASSIFIER_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("models"));
        Self { models_dir }
    }

    pub fn resolve_model(&self, name: &Path) -> PathBuf {
        if name.is_absolute() {
            name.to_path_buf()
        } else {
            self.models_dir.join(name)
        }
    }
}
