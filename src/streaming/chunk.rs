//! Chunk payloads and the entities they carry

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::types::Vec2;
use crate::streaming::coord::ChunkCoord;

/// An entity placed in the level
///
/// Immutable once loaded. Property values are kept as raw JSON because the
/// level format is owned by the level tooling, not the streaming layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    /// Stable identifier, unique within the level
    pub id: String,
    /// Free-form type tag (e.g. "coin", "spike", "spawn_point")
    #[serde(rename = "type")]
    pub kind: String,
    /// World-space position
    pub x: f32,
    pub y: f32,
    /// Open-ended per-entity properties
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub properties: Map<String, Value>,
}

impl EntityRecord {
    pub fn new(id: impl Into<String>, kind: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            x,
            y,
            properties: Map::new(),
        }
    }

    /// Builder-style property setter
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Runtime chunk: its coordinate plus the entities it owns, in level order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub coord: ChunkCoord,
    #[serde(default)]
    pub entities: Vec<EntityRecord>,
}

impl Chunk {
    /// Create an empty chunk
    pub fn new(coord: ChunkCoord) -> Self {
        Self {
            coord,
            entities: Vec::new(),
        }
    }

    pub fn with_entities(coord: ChunkCoord, entities: Vec<EntityRecord>) -> Self {
        Self { coord, entities }
    }

    /// Get chunk coordinate
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    pub fn entities(&self) -> &[EntityRecord] {
        &self.entities
    }

    /// Parse a chunk from its JSON document
    pub fn from_json(data: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(data)
    }

    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level_json() {
        let json = br#"{
            "coord": { "x": 2, "y": -1 },
            "entities": [
                { "id": "c1", "type": "coin", "x": 70.0, "y": -20.5 },
                { "id": "d1", "type": "door", "x": 80.0, "y": -4.0,
                  "properties": { "target": "level-2", "locked": true } }
            ]
        }"#;

        let chunk = Chunk::from_json(json).expect("parse failed");
        assert_eq!(chunk.coord, ChunkCoord::new(2, -1));
        assert_eq!(chunk.entities.len(), 2);
        assert_eq!(chunk.entities[0].kind, "coin");
        assert!(chunk.entities[0].properties.is_empty());
        assert_eq!(chunk.entities[1].properties["target"], "level-2");
        assert_eq!(chunk.entities[1].position(), Vec2::new(80.0, -4.0));
    }

    #[test]
    fn test_missing_entities_defaults_to_empty() {
        let chunk = Chunk::from_json(br#"{ "coord": { "x": 0, "y": 0 } }"#).expect("parse failed");
        assert!(chunk.entities().is_empty());
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(Chunk::from_json(br#"{ "coord": [0, 0] "#).is_err());
        assert!(Chunk::from_json(br#"{ "entities": [] }"#).is_err());
    }

    #[test]
    fn test_with_property() {
        let entity = EntityRecord::new("s1", "spring", 1.0, 2.0).with_property("power", 3);
        assert_eq!(entity.properties["power"], 3);
        assert_eq!(entity.id, "s1");
    }
}
