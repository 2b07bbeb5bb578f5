//! Difficulty catalogue over a climb path.

use serde::Serialize;

use crate::engine::merge_sort_by_key;
use crate::trail::{ClimbPath, SegmentId};

/// Segments sharing one difficulty level, in path order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DifficultyGroup {
    /// The shared difficulty.
    pub difficulty: u32,
    /// Segments at this difficulty, start first.
    pub segments: Vec<SegmentId>,
}

impl ClimbPath {
    /// Segments with exactly this difficulty, in path order.
    #[must_use]
    pub fn with_difficulty(&self, difficulty: u32) -> Vec<SegmentId> {
        self.iter()
            .filter(|s| s.difficulty == difficulty)
            .map(|s| s.id)
            .collect()
    }

    /// All segments grouped by difficulty, easiest group first.
    #[must_use]
    pub fn group_by_difficulty(&self) -> Vec<DifficultyGroup> {
        let in_path_order: Vec<(u32, SegmentId)> =
            self.iter().map(|s| (s.difficulty, s.id)).collect();
        let sorted = merge_sort_by_key(in_path_order, |(difficulty, _)| *difficulty);

        let mut groups: Vec<DifficultyGroup> = Vec::new();
        for (difficulty, id) in sorted {
            match groups.last_mut() {
                Some(group) if group.difficulty == difficulty => group.segments.push(id),
                _ => groups.push(DifficultyGroup {
                    difficulty,
                    segments: vec![id],
                }),
            }
        }
        groups
    }
}
