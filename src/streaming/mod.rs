//! On-demand chunk loading and LRU residency

pub mod coord;
pub mod chunk;
pub mod cache;
pub mod chunk_loader;
pub mod config;
pub mod disk_io;
pub mod query;
pub mod store;

pub use coord::{ChunkCoord, ChunkRange};
pub use chunk::{Chunk, EntityRecord};
pub use cache::ChunkCache;
pub use chunk_loader::{BoxFuture, ChunkLoader, FnLoader, LoadFuture, LoadResult};
pub use config::{StoreConfig, DEFAULT_CACHE_LIMIT, DEFAULT_CHUNK_SIZE};
pub use disk_io::{chunk_path, delete_chunk, load_chunk, save_chunk, DirLoader};
pub use query::{EntitiesInRect, EntityRef};
pub use store::{ChunkStore, EnsureReport, StoreStats};
