use crate::artifact::ModelArtifact;
use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use ndarray::Array4;
use ort::inputs;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;
use std::sync::Mutex;

/// Seam between the orchestrator and the numeric-inference runtime. A
/// backend takes the normalized input tensor and returns one raw score per
/// class; it has no other side effects.
pub trait InferenceBackend: Send + Sync + 'static {
    fn run(&self, input: &Array4<f32>) -> Result<Vec<f32>>;
}

/// ONNX Runtime backend over a memory-mapped model artifact. Constructed
/// exactly once; the session is shared read-only by all requests, with
/// `run` calls serialized internally.
pub struct OrtEngine {
    session: Mutex<Session>,
    input_name: String,
    output_name: String,
    expected_shape: [usize; 4],
}

impl OrtEngine {
    pub fn new(artifact: &ModelArtifact, config: &PipelineConfig) -> Result<Self> {
        let session = Session::builder()
            .map_err(|e| Error::ModelLoad(format!("{e}")))?
            .with_optimization_level(GraphOptimizationLevel::Level1)
            .map_err(|e| Error::ModelLoad(format!("{e}")))?
            .commit_from_memory(artifact.bytes())
            .map_err(|e| {
                Error::ModelLoad(format!("{}: {e}", artifact.path().display()))
            })?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .ok_or_else(|| Error::ModelLoad("model declares no inputs".into()))?;
        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| Error::ModelLoad("model declares no outputs".into()))?;
        log::info!(
            "Loaded model {} (input '{input_name}', output '{output_name}')",
            artifact.path().display()
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            output_name,
            expected_shape: config.input_shape(),
        })
    }
}

impl std::fmt::Debug for OrtEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrtEngine")
            .field("input_name", &self.input_name)
            .field("output_name", &self.output_name)
            .field("expected_shape", &self.expected_shape)
            .finish_non_exhaustive()
    }
}

impl InferenceBackend for OrtEngine {
    fn run(&self, input: &Array4<f32>) -> Result<Vec<f32>> {
        validate_shape(&self.expected_shape, input.shape())?;

        let tensor = Tensor::from_array(input.clone())?;
        let mut session = self.session.lock().unwrap();
        let outputs = session.run(inputs![self.input_name.as_str() => tensor])?;
        let scores = match outputs.get(self.output_name.as_str()) {
            Some(output) => output.try_extract_array::<f32>()?,
            None => {
                return Err(Error::ModelLoad(format!(
                    "model output '{}' missing from run results",
                    self.output_name
                )))
            }
        };
        Ok(scores.iter().copied().collect())
    }
}

/// Input shape is a contract, not a recoverable condition: the
/// preprocessor is supposed to produce exactly what the engine expects.
pub fn validate_shape(expected: &[usize], actual: &[usize]) -> Result<()> {
    if expected != actual {
        return Err(Error::ShapeMismatch {
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_shape_passes() {
        assert!(validate_shape(&[1, 224, 224, 3], &[1, 224, 224, 3]).is_ok());
    }

    #[test]
    fn mismatched_shape_is_a_contract_error() {
        let err = validate_shape(&[1, 224, 224, 3], &[1, 128, 128, 3]).unwrap_err();
        match err {
            Error::ShapeMismatch { expected, actual } => {
                assert_eq!(expected, vec![1, 224, 224, 3]);
                assert_eq!(actual, vec![1, 128, 128, 3]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn garbage_artifact_fails_engine_construction() {
        let path = std::env::temp_dir().join(format!("junk-{}.onnx", uuid::Uuid::new_v4()));
        std::fs::write(&path, b"definitely not protobuf").unwrap();
        let artifact = ModelArtifact::load(&path).unwrap();
        let err = OrtEngine::new(&artifact, &PipelineConfig::default()).unwrap_err();
        assert!(matches!(err, Error::ModelLoad(_)));
        drop(artifact);
        std::fs::remove_file(&path).unwrap();
    }
}
