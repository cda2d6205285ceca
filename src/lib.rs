//! Chunk Stream - spatial chunk streaming cache for 2D worlds
//!
//! Splits an unbounded world into fixed-size chunks, loads them on demand
//! through an injected [`ChunkLoader`](streaming::ChunkLoader), keeps a
//! bounded LRU working set in memory and answers rectangle queries over
//! whatever is resident.

pub mod core;
pub mod math;
pub mod streaming;

pub use crate::core::{Error, LoadError};
pub use streaming::{ChunkCoord, ChunkStore, EntityRecord, StoreConfig};
