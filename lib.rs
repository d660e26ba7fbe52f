//! Image classification pipeline: decode a user-selected image, resize and
//! normalize it into the fixed tensor a bundled ONNX model expects, run the
//! model, and publish the arg-max class and score through an observable
//! single-slot state. The presentation layer supplies image references and
//! renders published snapshots; everything else lives here.

pub mod artifact;
pub mod config;
pub mod engine;
pub mod error;
pub mod interpret;
pub mod models;
pub mod pipeline;
pub mod preprocess;

pub use artifact::ModelArtifact;
pub use config::{InputScaling, ModelPaths, PipelineConfig};
pub use engine::{InferenceBackend, OrtEngine};
pub use error::{Error, Result};
pub use models::{ClassificationResult, ImageReference, PipelineState, StateSnapshot};
pub use pipeline::Pipeline;
