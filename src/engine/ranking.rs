//! Incremental climber ranking with binary-search lookup.

use serde::{Deserialize, Serialize};

use crate::engine::sort::{lower_bound_by_key, merge_sort_by_key};
use crate::error::{ClimbError, ClimbResult};
use crate::registry::{Climber, ClimberId};

/// Statistic a [`Ranking`] orders by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankKey {
    /// Accumulated score.
    #[default]
    Score,
    /// Remaining stamina.
    Stamina,
    /// Number of moves made.
    Moves,
}

impl RankKey {
    /// The value of this statistic for `climber`.
    #[must_use]
    pub fn value(self, climber: &Climber) -> i64 {
        match self {
            Self::Score => climber.score,
            Self::Stamina => climber.stamina,
            Self::Moves => i64::from(climber.moves),
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    key: i64,
    id: ClimberId,
}

/// Climbers held in ascending order of one statistic.
///
/// Each climber is ranked by the value it had when it was added. Equal
/// values keep the order in which climbers were added.
#[derive(Debug, Clone, Default)]
pub struct Ranking {
    key: RankKey,
    entries: Vec<Entry>,
}

impl Ranking {
    /// Create an empty ranking on `key`.
    #[must_use]
    pub fn new(key: RankKey) -> Self {
        Self {
            key,
            entries: Vec::new(),
        }
    }

    /// The statistic this ranking orders by.
    #[must_use]
    pub const fn key(&self) -> RankKey {
        self.key
    }

    /// Number of ranked climbers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been ranked yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add climbers and re-sort. A climber added again replaces its old entry.
    pub fn add_climbers(&mut self, climbers: &[Climber]) {
        let key = self.key;
        self.entries
            .retain(|e| !climbers.iter().any(|c| c.id == e.id));
        self.entries.extend(climbers.iter().map(|c| Entry {
            key: key.value(c),
            id: c.id.clone(),
        }));
        self.entries = merge_sort_by_key(std::mem::take(&mut self.entries), |e| e.key);
    }

    /// 0-based rank of `climber`.
    ///
    /// # Errors
    ///
    /// Returns [`ClimbError::NotFound`] if the climber was never added, or
    /// if its statistic has changed since it was added.
    pub fn position(&self, climber: &Climber) -> ClimbResult<usize> {
        let key = self.key.value(climber);
        let first = lower_bound_by_key(&self.entries, &key, |e| e.key);
        self.entries[first..]
            .iter()
            .take_while(|e| e.key == key)
            .position(|e| e.id == climber.id)
            .map(|offset| first + offset)
            .ok_or_else(|| ClimbError::not_found(format!("climber {} in ranking", climber.id)))
    }

    /// Ranked climber ids, lowest value first.
    pub fn ids(&self) -> impl Iterator<Item = &ClimberId> {
        self.entries.iter().map(|e| &e.id)
    }
}

#[cfg(test)]
mod tests {
    use crate::trail::SegmentId;
    use super::*;

    fn climber(id: &str, score: i64) -> Climber {
        let mut c = Climber::new(id, id, SegmentId::new(0), 100);
        c.score = score;
        c
    }

    #[test]
    fn test_positions_after_batches() {
        let mut ranking = Ranking::new(RankKey::Score);
        let a = climber("a", 30);
        let b = climber("b", 10);
        let c = climber("c", 20);
        ranking.add_climbers(&[a.clone(), b.clone()]);
        ranking.add_climbers(&[c.clone()]);

        assert_eq!(ranking.position(&b).unwrap(), 0);
        assert_eq!(ranking.position(&c).unwrap(), 1);
        assert_eq!(ranking.position(&a).unwrap(), 2);
        assert_eq!(ranking.len(), 3);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut ranking = Ranking::new(RankKey::Score);
        let first = climber("first", 5);
        let second = climber("second", 5);
        ranking.add_climbers(&[first.clone()]);
        ranking.add_climbers(&[second.clone()]);
        assert_eq!(ranking.position(&first).unwrap(), 0);
        assert_eq!(ranking.position(&second).unwrap(), 1);
    }

    #[test]
    fn test_unknown_climber() {
        let mut ranking = Ranking::new(RankKey::Stamina);
        ranking.add_climbers(&[climber("a", 1)]);
        let missing = climber("ghost", 1);
        assert!(matches!(ranking.position(&missing), Err(ClimbError::NotFound(_))));
    }

    #[test]
    fn test_re_adding_replaces_entry() {
        let mut ranking = Ranking::new(RankKey::Score);
        let mut a = climber("a", 1);
        ranking.add_climbers(&[a.clone(), climber("b", 2)]);
        a.score = 3;
        ranking.add_climbers(&[a.clone()]);
        assert_eq!(ranking.len(), 2);
        assert_eq!(ranking.position(&a).unwrap(), 1);
        let ids: Vec<&str> = ranking.ids().map(ClimberId::as_str).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }
}
