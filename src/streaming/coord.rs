//! Chunk coordinates and coordinate ranges

use serde::{Deserialize, Serialize};

use crate::core::types::{IVec2, Vec2};
use crate::math::Rect;

/// Chunk coordinate in chunk space
///
/// The floor division of a world position by the chunk size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
}

impl ChunkCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chunk containing the world position `(wx, wy)`.
    ///
    /// Rounds toward negative infinity, so `-0.5` lands in chunk `-1`.
    pub fn from_world(wx: f32, wy: f32, chunk_size: f32) -> Self {
        Self {
            x: (wx / chunk_size).floor() as i32,
            y: (wy / chunk_size).floor() as i32,
        }
    }

    /// World-space rectangle covered by this chunk.
    ///
    /// The max edge belongs to the neighbouring chunk; [`Rect`] treats it as
    /// inclusive, so callers testing membership should use [`from_world`](Self::from_world).
    pub fn world_bounds(&self, chunk_size: f32) -> Rect {
        let min = Vec2::new(self.x as f32, self.y as f32) * chunk_size;
        Rect::new(min, min + Vec2::splat(chunk_size))
    }
}

impl From<IVec2> for ChunkCoord {
    fn from(v: IVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<ChunkCoord> for IVec2 {
    fn from(c: ChunkCoord) -> Self {
        IVec2::new(c.x, c.y)
    }
}

/// Inclusive rectangle of chunk coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkRange {
    pub min: ChunkCoord,
    pub max: ChunkCoord,
}

impl ChunkRange {
    pub fn new(min: ChunkCoord, max: ChunkCoord) -> Self {
        Self { min, max }
    }

    /// Range of chunks covering a world rectangle.
    ///
    /// Each edge is floor-divided by `chunk_size`. An inverted rectangle
    /// produces an empty range.
    pub fn covering(rect: &Rect, chunk_size: f32) -> Self {
        Self {
            min: ChunkCoord::from_world(rect.min.x, rect.min.y, chunk_size),
            max: ChunkCoord::from_world(rect.max.x, rect.max.y, chunk_size),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Number of coordinates in the range
    pub fn len(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        let w = (self.max.x as i64 - self.min.x as i64 + 1) as usize;
        let h = (self.max.y as i64 - self.min.y as i64 + 1) as usize;
        w.saturating_mul(h)
    }

    pub fn contains(&self, coord: ChunkCoord) -> bool {
        coord.x >= self.min.x && coord.x <= self.max.x &&
        coord.y >= self.min.y && coord.y <= self.max.y
    }

    /// Iterate coordinates row-major: y outer, x inner.
    pub fn iter(&self) -> impl Iterator<Item = ChunkCoord> + use<> {
        let range = *self;
        let (xs, ys) = if range.is_empty() {
            (1..=0, 1..=0)
        } else {
            (range.min.x..=range.max.x, range.min.y..=range.max.y)
        };
        ys.flat_map(move |y| xs.clone().map(move |x| ChunkCoord::new(x, y)))
    }
}
