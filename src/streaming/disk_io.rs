//! Level chunk files on disk
//!
//! Chunks are stored one JSON document per file:
//! `base_dir/chunk_{x}_{y}.json`.

use std::io;
use std::path::{Path, PathBuf};

use crate::core::error::LoadError;
use crate::streaming::chunk::Chunk;
use crate::streaming::chunk_loader::{ChunkLoader, LoadFuture};
use crate::streaming::coord::ChunkCoord;

/// File extension for chunk files
pub const CHUNK_FILE_EXTENSION: &str = "json";

/// Get the file path for a chunk
pub fn chunk_path(base_dir: &Path, coord: ChunkCoord) -> PathBuf {
    base_dir.join(format!("chunk_{}_{}.{}", coord.x, coord.y, CHUNK_FILE_EXTENSION))
}

/// Save a chunk to disk
pub async fn save_chunk(base_dir: &Path, chunk: &Chunk) -> Result<(), io::Error> {
    let path = chunk_path(base_dir, chunk.coord);

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let json = chunk
        .to_json()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    tokio::fs::write(&path, json).await?;

    Ok(())
}

/// Load a chunk from disk (if it exists)
///
/// A missing file means there is no chunk at `coord`. Unreadable or malformed
/// files are errors.
pub async fn load_chunk(base_dir: &Path, coord: ChunkCoord) -> Result<Option<Chunk>, LoadError> {
    let path = chunk_path(base_dir, coord);

    let data = match tokio::fs::read(&path).await {
        Ok(data) => data,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    Ok(Some(Chunk::from_json(&data)?))
}

/// Delete a chunk from disk
pub async fn delete_chunk(base_dir: &Path, coord: ChunkCoord) -> Result<(), io::Error> {
    match tokio::fs::remove_file(chunk_path(base_dir, coord)).await {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

/// Loader reading chunk files from a level directory
#[derive(Debug, Clone)]
pub struct DirLoader {
    base_dir: PathBuf,
}

impl DirLoader {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

impl ChunkLoader for DirLoader {
    fn load(&self, coord: ChunkCoord) -> LoadFuture {
        let base_dir = self.base_dir.clone();
        Box::pin(async move { load_chunk(&base_dir, coord).await })
    }
}
