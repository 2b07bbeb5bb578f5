//! Serializable view of an expedition for rendering.

use serde::Serialize;

use crate::expedition::Expedition;
use crate::registry::{ClimberId, KeyHasher};
use crate::trail::{ClimbSegment, SegmentId};

/// A climber as a renderer sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClimberView {
    /// Climber id.
    pub id: ClimberId,
    /// Display name.
    pub name: String,
    /// Current segment.
    pub segment: SegmentId,
    /// 0-based distance from the start.
    pub position: usize,
    /// Remaining stamina.
    pub stamina: i64,
    /// Accumulated score.
    pub score: i64,
    /// Moves made.
    pub moves: u32,
    /// Whether the climber stands on the summit.
    pub at_summit: bool,
}

/// Point-in-time state of an expedition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Current turn.
    pub turn: u32,
    /// Segments from start to summit.
    pub segments: Vec<ClimbSegment>,
    /// Climbers in join order.
    pub climbers: Vec<ClimberView>,
    /// Climber ids by score, highest first.
    pub leaderboard: Vec<ClimberId>,
}

impl Snapshot {
    /// Compact JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl<H: KeyHasher> Expedition<H> {
    /// Capture the current state for rendering.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let path = self.path();
        let positions = path.positions();
        let climbers = self
            .roster()
            .into_iter()
            .map(|c| ClimberView {
                id: c.id.clone(),
                name: c.name.clone(),
                segment: c.segment,
                position: positions.get(&c.segment).copied().unwrap_or(0),
                stamina: c.stamina,
                score: c.score,
                moves: c.moves,
                at_summit: path.is_summit(c.segment),
            })
            .collect();

        Snapshot {
            turn: self.turn(),
            segments: path.iter().cloned().collect(),
            climbers,
            leaderboard: self.leaderboard().into_iter().map(|c| c.id).collect(),
        }
    }
}
