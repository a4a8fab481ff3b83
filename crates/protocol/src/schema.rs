//! Schema identifiers of the two document kinds this client reads and
//! writes. These are opaque configuration constants — the id encodes the
//! schema name plus the hash of its definition as published on the node.

/// Schema of sprite documents (fields: `pos_x`, `pos_y`, `colour`,
/// `timestamp`, `img` relation).
pub const SPRITES_SCHEMA_ID: &str =
    "sprites_0020d542c271bf3b5fb8d419584219c8120946cd783a8e48398f831f958ba5ede995";

/// Schema of sprite image documents (fields: `timestamp`, `description`,
/// `blob` relation).
pub const SPRITE_IMAGES_SCHEMA_ID: &str =
    "sprite_images_002032604325c478c09ef9c60af330928f9e38a801d5941c3e0b87c5e13fe3ca629e";
