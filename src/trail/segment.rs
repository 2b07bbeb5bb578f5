//! Climb segment types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a segment within a [`ClimbPath`](crate::trail::ClimbPath).
///
/// Ids are issued by the path in increasing order and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentId(u32);

impl SegmentId {
    /// Wrap a raw id.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw id value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "segment #{}", self.0)
    }
}

/// Description of a segment to be placed on a path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Terrain {
    /// Display name.
    pub name: String,
    /// Terrain difficulty.
    pub difficulty: u32,
    /// Length of the climb in metres.
    #[serde(default)]
    pub length: u32,
    /// Whether entering this segment is hazardous.
    #[serde(default)]
    pub hazard: bool,
}

impl Terrain {
    /// Safe terrain with the given name and difficulty.
    #[must_use]
    pub fn new(name: impl Into<String>, difficulty: u32) -> Self {
        Self {
            name: name.into(),
            difficulty,
            length: 0,
            hazard: false,
        }
    }

    /// Hazardous terrain with the given name and difficulty.
    #[must_use]
    pub fn hazardous(name: impl Into<String>, difficulty: u32) -> Self {
        Self {
            hazard: true,
            ..Self::new(name, difficulty)
        }
    }

    /// Set the climb length.
    #[must_use]
    pub fn with_length(mut self, length: u32) -> Self {
        self.length = length;
        self
    }
}

/// One unit of the mountain route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClimbSegment {
    /// Unique id within the owning path.
    pub id: SegmentId,
    /// Display name.
    pub name: String,
    /// Terrain difficulty.
    pub difficulty: u32,
    /// Length of the climb in metres.
    pub length: u32,
    /// Whether entering this segment is hazardous.
    pub hazard: bool,
}

impl ClimbSegment {
    pub(crate) fn from_terrain(id: SegmentId, terrain: Terrain) -> Self {
        Self {
            id,
            name: terrain.name,
            difficulty: terrain.difficulty,
            length: terrain.length,
            hazard: terrain.hazard,
        }
    }
}
