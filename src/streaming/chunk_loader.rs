//! Chunk loader capability
//!
//! The store does not know where chunks come from. A [`ChunkLoader`] fetches a
//! single chunk by coordinate and may take any amount of time to do so.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::core::error::LoadError;
use crate::streaming::chunk::Chunk;
use crate::streaming::coord::ChunkCoord;

/// Boxed future type used by loader methods for object safety.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Future returned by [`ChunkLoader::load`]
///
/// `Ok(None)` means no chunk exists at the coordinate (void space, world
/// edge). It is not an error and is never cached.
pub type LoadFuture = BoxFuture<'static, Result<Option<Chunk>, LoadError>>;

/// Asynchronous source of chunk data
///
/// Must be safe to call concurrently for distinct coordinates. The store may
/// also call it concurrently for the same coordinate when overlapping
/// `ensure` calls both miss it.
pub trait ChunkLoader: Send + Sync {
    /// Fetch the chunk at `coord`
    fn load(&self, coord: ChunkCoord) -> LoadFuture;
}

impl<L: ChunkLoader + ?Sized> ChunkLoader for Arc<L> {
    fn load(&self, coord: ChunkCoord) -> LoadFuture {
        (**self).load(coord)
    }
}

/// Outcome of one load issued by the store
#[derive(Debug, Clone, PartialEq)]
pub enum LoadResult {
    /// Chunk loaded and made resident
    Loaded(ChunkCoord),
    /// No chunk exists at this coordinate
    NotFound(ChunkCoord),
    /// Loader failed; coordinate stays non-resident
    Error(ChunkCoord, LoadError),
}

impl LoadResult {
    pub fn coord(&self) -> ChunkCoord {
        match self {
            LoadResult::Loaded(coord) => *coord,
            LoadResult::NotFound(coord) => *coord,
            LoadResult::Error(coord, _) => *coord,
        }
    }
}

/// Loader backed by an async closure
///
/// ```no_run
/// use chunk_stream::core::LoadError;
/// use chunk_stream::streaming::{Chunk, ChunkCoord, FnLoader};
///
/// async fn empty_chunk(coord: ChunkCoord) -> Result<Option<Chunk>, LoadError> {
///     Ok(Some(Chunk::new(coord)))
/// }
///
/// let loader = FnLoader::new(empty_chunk);
/// ```
pub struct FnLoader<F> {
    func: F,
}

impl<F> FnLoader<F> {
    pub fn new<Fut>(func: F) -> Self
    where
        F: Fn(ChunkCoord) -> Fut + Send + Sync,
        Fut: Future<Output = Result<Option<Chunk>, LoadError>> + Send + 'static,
    {
        Self { func }
    }
}

impl<F, Fut> ChunkLoader for FnLoader<F>
where
    F: Fn(ChunkCoord) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Option<Chunk>, LoadError>> + Send + 'static,
{
    fn load(&self, coord: ChunkCoord) -> LoadFuture {
        Box::pin((self.func)(coord))
    }
}
