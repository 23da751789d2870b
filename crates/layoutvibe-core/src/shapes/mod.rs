//! Shape definitions for the floor plan.
//!
//! Every area is an axis-aligned rectangle. The kind tag only affects how an
//! area is painted; geometry is uniform across kinds.

mod rectangle;

pub use rectangle::{Geometry, Rectangle};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for areas. User-editable, so a plain string.
pub type ShapeId = String;

/// Generate a fresh identifier for a new area.
pub fn generate_id() -> ShapeId {
    Uuid::new_v4().to_string()
}

/// Classification of a floor-plan area.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum AreaKind {
    /// Usable floor area.
    #[default]
    Active,
    /// Floor area that is not actively used.
    Passive,
    /// Structural wall.
    Wall,
    /// Unusable space (rendered hatched).
    Dead,
    /// Any other tag, preserved verbatim.
    Other(String),
}

impl AreaKind {
    /// The serialized tag.
    pub fn as_str(&self) -> &str {
        match self {
            AreaKind::Active => "active",
            AreaKind::Passive => "passive",
            AreaKind::Wall => "wall",
            AreaKind::Dead => "dead",
            AreaKind::Other(tag) => tag,
        }
    }

    /// Parse a tag. Unknown tags are kept as `Other`.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "active" => AreaKind::Active,
            "passive" => AreaKind::Passive,
            "wall" => AreaKind::Wall,
            "dead" => AreaKind::Dead,
            other => AreaKind::Other(other.to_string()),
        }
    }

    /// The built-in kinds, in the order offered by the property inspector.
    pub fn builtin() -> [AreaKind; 4] {
        [AreaKind::Active, AreaKind::Passive, AreaKind::Wall, AreaKind::Dead]
    }
}

impl fmt::Display for AreaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AreaKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AreaKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(AreaKind::from_tag(&tag))
    }
}
