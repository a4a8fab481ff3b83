use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque, store-assigned document identifier.
///
/// Unique and immutable once assigned. The core never interprets its
/// contents — it only compares, hashes, and echoes it back in queries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Canvas position in pixel coordinates.
///
/// Non-negative by convention but not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: i64,
    pub y: i64,
}

impl Position {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// A presentation color in the fixed `hsl(<hue>, 95%, 50%)` format.
///
/// Stored as the literal string the schema carries, so values observed
/// from other clients pass through unchanged even if they used different
/// saturation or lightness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(String);

impl Color {
    /// Build a color at the fixed saturation/lightness used for sprites.
    pub fn hsl(hue: u16) -> Self {
        Self(format!("hsl({hue}, 95%, 50%)"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Hue component, if the value matches the `hsl(...)` format.
    pub fn hue(&self) -> Option<u16> {
        let inner = self.0.strip_prefix("hsl(")?;
        let (hue, _) = inner.split_once(',')?;
        hue.trim().parse().ok()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Color {
    fn from(value: String) -> Self {
        Self(value)
    }
}
