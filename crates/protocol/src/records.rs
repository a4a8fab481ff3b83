use serde::{Deserialize, Serialize};

use crate::types::{Color, DocumentId, Position};

/// The canonical visual asset shared by all sprites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteImage {
    /// Store-assigned document id.
    pub id: DocumentId,
    /// Reference to the binary image content.
    pub blob: DocumentId,
    /// Accessibility text.
    pub description: String,
    /// Creation time in seconds since epoch. Used to pick the canonical
    /// instance when concurrent clients each created one.
    pub timestamp: i64,
}

/// One placed sprite, fully resolved — the referenced image's fields are
/// carried inline so rendering needs no second lookup.
///
/// Never mutated or deleted; the store is append-only from this client's
/// perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteRecord {
    pub id: DocumentId,
    pub position: Position,
    pub color: Color,
    /// Creation time in seconds since epoch, doubling as draw (z-order)
    /// priority.
    pub timestamp: i64,
    pub image: SpriteImage,
}

/// Create-side field set for a sprite document. Field names match the
/// store schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpriteFields {
    pub pos_x: i64,
    pub pos_y: i64,
    pub colour: Color,
    pub timestamp: i64,
    /// Relation to the sprite image document.
    pub img: DocumentId,
}

impl SpriteFields {
    pub fn new(position: Position, colour: Color, timestamp: i64, img: DocumentId) -> Self {
        Self {
            pos_x: position.x,
            pos_y: position.y,
            colour,
            timestamp,
            img,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.pos_x, self.pos_y)
    }
}

/// Create-side field set for a sprite image document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpriteImageFields {
    pub timestamp: i64,
    pub description: String,
    /// Relation to the uploaded blob.
    pub blob: DocumentId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sprite_fields_wire_names() {
        let fields = SpriteFields::new(
            Position::new(120, 80),
            Color::hsl(234),
            1_700_000_000,
            DocumentId::from("0020img"),
        );
        let json = serde_json::to_value(&fields).expect("serialize");
        assert_eq!(json["pos_x"], 120);
        assert_eq!(json["pos_y"], 80);
        assert_eq!(json["colour"], "hsl(234, 95%, 50%)");
        assert_eq!(json["img"], "0020img");
    }

    #[test]
    fn sprite_fields_position_roundtrip() {
        let fields = SpriteFields::new(
            Position::new(3, 7),
            Color::hsl(0),
            0,
            DocumentId::from("0020img"),
        );
        assert_eq!(fields.position(), Position::new(3, 7));
    }
}
