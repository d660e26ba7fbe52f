use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Model not found: {}", .0.display())]
    ModelNotFound(PathBuf),

    #[error("Model IO Error reading {}: {source}", .path.display())]
    ModelIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Model Load Failed: {0}")]
    ModelLoad(String),

    #[error("Decode Error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Shape Mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("Inference Error: {0}")]
    Ort(#[from] ort::Error),

    #[error("Empty model output")]
    EmptyOutput,

    #[error("Busy: {0}")]
    Busy(String),
}
