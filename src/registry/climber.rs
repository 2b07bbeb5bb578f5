//! Climber state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::MoveOutcome;
use crate::trail::SegmentId;

/// Unique identifier of a climber.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClimberId(String);

impl ClimberId {
    /// Wrap an id string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ClimberId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ClimberId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ClimberId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for ClimberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A player on the mountain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Climber {
    /// Unique identifier.
    pub id: ClimberId,
    /// Display name.
    pub name: String,
    /// Segment the climber stands on. Not owning: resolved through the path.
    pub segment: SegmentId,
    /// Remaining stamina, never below zero once a move is applied.
    pub stamina: i64,
    /// Accumulated score.
    pub score: i64,
    /// Number of moves resolved.
    pub moves: u32,
    /// Join sequence number, used to order ties.
    pub joined: u64,
}

impl Climber {
    /// A fresh climber with zero score.
    #[must_use]
    pub fn new(
        id: impl Into<ClimberId>,
        name: impl Into<String>,
        segment: SegmentId,
        stamina: i64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            segment,
            stamina,
            score: 0,
            moves: 0,
            joined: 0,
        }
    }

    /// Apply a resolved move.
    pub fn apply(&mut self, outcome: &MoveOutcome) {
        self.segment = outcome.to;
        self.stamina = self.stamina.saturating_add(outcome.stamina_delta).max(0);
        self.score = self.score.saturating_add(outcome.score_delta);
        self.moves = self.moves.saturating_add(1);
    }

    /// Whether the climber has run out of stamina.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.stamina == 0
    }
}

#[cfg(test)]
mod tests {
    use crate::config::MovementConfig;
    use crate::engine::resolve_move;
    use crate::trail::{ClimbPath, Terrain};
    use super::*;

    #[test]
    fn test_apply_outcome() {
        let path = ClimbPath::new(vec![
            Terrain::new("a", 2),
            Terrain::hazardous("b", 3),
            Terrain::new("c", 4),
        ])
        .unwrap();
        let mut climber = Climber::new("k2", "Kay", path.start(), 15);
        let outcome = resolve_move(&path, climber.segment, 2, &MovementConfig::default()).unwrap();
        climber.apply(&outcome);

        assert_eq!(climber.segment, path.summit());
        assert_eq!(climber.stamina, 5);
        assert_eq!(climber.score, 7);
        assert_eq!(climber.moves, 1);
    }

    #[test]
    fn test_stamina_floors_at_zero() {
        let path = ClimbPath::new(vec![Terrain::new("a", 1), Terrain::hazardous("b", 1)]).unwrap();
        let mut climber = Climber::new("x", "X", path.start(), 3);
        let outcome = resolve_move(&path, climber.segment, 1, &MovementConfig::default()).unwrap();
        climber.apply(&outcome);
        assert_eq!(climber.stamina, 0);
        assert!(climber.is_exhausted());
    }

    #[test]
    fn test_id_conversions() {
        let id: ClimberId = "alice".into();
        assert_eq!(id.as_str(), "alice");
        assert_eq!(id.to_string(), "alice");
        assert_eq!(ClimberId::from(String::from("alice")), id);
    }
}
