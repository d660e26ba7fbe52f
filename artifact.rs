use crate::error::{Error, Result};
use memmap2::Mmap;
use std::fs::File;
use std::path::{Path, PathBuf};

/// A pre-trained model artifact, memory-mapped read-only. The bytes are
/// never copied into ordinary memory and never mutated; one mapping is
/// shared by the engine for the lifetime of the process.
#[derive(Debug)]
pub struct ModelArtifact {
    path: PathBuf,
    map: Mmap,
}

impl ModelArtifact {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ModelNotFound(path.to_path_buf()));
        }
        let file = File::open(path).map_err(|source| Error::ModelIo {
            path: path.to_path_buf(),
            source,
        })?;
        // Safety: the artifact is bundled application data; nothing in this
        // process writes to it after load.
        let map = unsafe { Mmap::map(&file) }.map_err(|source| Error::ModelIo {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Mapped model artifact {} ({} bytes)", path.display(), map.len());
        Ok(Self {
            path: path.to_path_buf(),
            map,
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.map
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
