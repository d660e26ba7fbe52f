use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Opaque handle to a user-selected image. Resolved to pixel data only
/// when a classification request runs; never retained afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageReference(PathBuf);

impl ImageReference {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl From<PathBuf> for ImageReference {
    fn from(path: PathBuf) -> Self {
        Self(path)
    }
}

impl From<&Path> for ImageReference {
    fn from(path: &Path) -> Self {
        Self(path.to_path_buf())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub class_index: usize,
    pub score: f32,
    pub display: String,
}

/// Lifecycle of the most recent classification request. `Failed` is a
/// distinct state rather than an absent result, so observers can tell
/// "never ran" from "ran and broke".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PipelineState {
    Idle,
    Running,
    Completed(ClassificationResult),
    Failed { message: String },
}

/// Single-slot published value. `seq` increases with every publication so
/// observers holding an old snapshot can detect staleness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub seq: u64,
    pub state: PipelineState,
}

impl StateSnapshot {
    pub fn initial() -> Self {
        Self {
            seq: 0,
            state: PipelineState::Idle,
        }
    }
}
