//! Spatial queries over resident chunks

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use crate::math::Rect;
use crate::streaming::chunk::{Chunk, EntityRecord};
use crate::streaming::coord::ChunkCoord;

/// Shared handle to an entity inside a resident chunk
///
/// Keeps its chunk alive, so the entity stays readable even if the chunk is
/// evicted while the caller still holds the handle.
#[derive(Clone)]
pub struct EntityRef {
    chunk: Arc<Chunk>,
    index: usize,
}

impl EntityRef {
    /// Coordinate of the chunk the entity was loaded with
    pub fn chunk_coord(&self) -> ChunkCoord {
        self.chunk.coord
    }

    /// Owned copy of the entity
    pub fn to_record(&self) -> EntityRecord {
        (**self).clone()
    }
}

impl Deref for EntityRef {
    type Target = EntityRecord;

    fn deref(&self) -> &EntityRecord {
        &self.chunk.entities[self.index]
    }
}

impl fmt::Debug for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityRef")
            .field("chunk", &self.chunk.coord)
            .field("entity", &**self)
            .finish()
    }
}

/// Entities inside a rectangle, drawn from a snapshot of resident chunks
///
/// The set of chunks is fixed when the iterator is created: chunks loaded
/// afterwards are not visited, chunks evicted afterwards are still visited.
/// Chunks are visited in row-major order, entities in level order.
pub struct EntitiesInRect {
    rect: Rect,
    chunks: std::vec::IntoIter<Arc<Chunk>>,
    current: Option<Arc<Chunk>>,
    next_index: usize,
}

impl EntitiesInRect {
    pub(crate) fn new(rect: Rect, chunks: Vec<Arc<Chunk>>) -> Self {
        Self {
            rect,
            chunks: chunks.into_iter(),
            current: None,
            next_index: 0,
        }
    }

    /// Query that yields nothing
    pub(crate) fn empty(rect: Rect) -> Self {
        Self::new(rect, Vec::new())
    }

    /// The query rectangle (inclusive on all edges)
    pub fn rect(&self) -> Rect {
        self.rect
    }
}

impl Iterator for EntitiesInRect {
    type Item = EntityRef;

    fn next(&mut self) -> Option<EntityRef> {
        loop {
            if let Some(chunk) = &self.current {
                while self.next_index < chunk.entities.len() {
                    let index = self.next_index;
                    self.next_index += 1;
                    if self.rect.contains_point(chunk.entities[index].position()) {
                        return Some(EntityRef {
                            chunk: Arc::clone(chunk),
                            index,
                        });
                    }
                }
            }
            self.current = Some(self.chunks.next()?);
            self.next_index = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(x: i32, y: i32, entities: &[(&str, f32, f32)]) -> Arc<Chunk> {
        let records = entities
            .iter()
            .map(|&(id, ex, ey)| EntityRecord::new(id, "coin", ex, ey))
            .collect();
        Arc::new(Chunk::with_entities(ChunkCoord::new(x, y), records))
    }

    #[test]
    fn test_filters_by_rect() {
        let chunks = vec![
            chunk(0, 0, &[("a", 1.0, 1.0), ("b", 20.0, 20.0), ("c", 5.0, 9.0)]),
            chunk(1, 0, &[("d", 33.0, 2.0)]),
        ];
        let query = EntitiesInRect::new(Rect::from_xywh(0.0, 0.0, 10.0, 10.0), chunks);

        let ids: Vec<_> = query.map(|e| e.id.clone()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_skips_empty_chunks() {
        let chunks = vec![chunk(0, 0, &[]), chunk(1, 0, &[]), chunk(2, 0, &[("x", 70.0, 1.0)])];
        let query = EntitiesInRect::new(Rect::from_xywh(0.0, 0.0, 100.0, 100.0), chunks);
        assert_eq!(query.count(), 1);
    }

    #[test]
    fn test_empty_query() {
        let mut query = EntitiesInRect::empty(Rect::default());
        assert!(query.next().is_none());
        assert!(query.next().is_none());
    }

    #[test]
    fn test_entity_ref_outlives_source() {
        let source = chunk(3, 4, &[("keep", 100.0, 130.0)]);
        let entity = EntitiesInRect::new(Rect::from_xywh(96.0, 128.0, 32.0, 32.0), vec![source])
            .next()
            .expect("entity missing");

        assert_eq!(entity.chunk_coord(), ChunkCoord::new(3, 4));
        assert_eq!(entity.to_record(), EntityRecord::new("keep", "coin", 100.0, 130.0));
    }
}
