//! Move resolution along a climb path.

use serde::Serialize;

use crate::config::MovementConfig;
use crate::error::ClimbResult;
use crate::trail::{ClimbPath, Direction, SegmentId};

/// Result of resolving one move request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoveOutcome {
    /// Segment the climber started on.
    pub from: SegmentId,
    /// Segment the climber ended on.
    pub to: SegmentId,
    /// Signed step count that was requested.
    pub requested_steps: i64,
    /// Steps actually walked.
    pub steps_taken: u64,
    /// Steps removed by hazards before they could be walked.
    pub steps_forfeited: u64,
    /// Steps left over when a terminal segment was reached.
    pub steps_discarded: u64,
    /// Number of hazardous segments entered.
    pub hazards_crossed: u32,
    /// Accumulated stamina change (never positive).
    pub stamina_delta: i64,
    /// Accumulated score change.
    pub score_delta: i64,
}

impl MoveOutcome {
    fn stationary(from: SegmentId, requested_steps: i64) -> Self {
        Self {
            from,
            to: from,
            requested_steps,
            steps_taken: 0,
            steps_forfeited: 0,
            steps_discarded: 0,
            hazards_crossed: 0,
            stamina_delta: 0,
            score_delta: 0,
        }
    }

    /// Whether the climber changed segment.
    #[must_use]
    pub fn moved(&self) -> bool {
        self.from != self.to
    }
}

/// Resolve a move of `requested_steps` starting from `from`.
///
/// The walk consumes one step at a time. Each step enters the neighbouring
/// segment, paying `difficulty * stamina_per_difficulty` stamina; ascending
/// also scores the entered segment's difficulty. Entering a hazard costs
/// `hazard_penalty` stamina and forfeits up to `hazard_step_loss` of the
/// remaining steps. The walk ends when no steps remain or the terminal in the
/// direction of travel is reached, in which case the rest are discarded.
///
/// # Errors
///
/// Returns [`ClimbError::NotFound`](crate::ClimbError::NotFound) if `from`
/// is not on the path. Step counts never cause an error.
pub fn resolve_move(
    path: &ClimbPath,
    from: SegmentId,
    requested_steps: i64,
    rules: &MovementConfig,
) -> ClimbResult<MoveOutcome> {
    path.get(from)?;

    let direction = Direction::from_steps(requested_steps);
    let mut outcome = MoveOutcome::stationary(from, requested_steps);
    let mut remaining = requested_steps.unsigned_abs();

    while remaining > 0 {
        let Some(next) = path.neighbour(outcome.to, direction)? else {
            break;
        };
        let segment = path.get(next)?;
        outcome.to = next;
        outcome.steps_taken += 1;
        remaining -= 1;

        let effort = i64::from(segment.difficulty).saturating_mul(rules.stamina_per_difficulty);
        outcome.stamina_delta = outcome.stamina_delta.saturating_sub(effort);
        if direction == Direction::Ascend {
            outcome.score_delta = outcome.score_delta.saturating_add(i64::from(segment.difficulty));
        }

        if segment.hazard {
            outcome.hazards_crossed += 1;
            outcome.stamina_delta = outcome.stamina_delta.saturating_sub(rules.hazard_penalty);
            let lost = remaining.min(u64::from(rules.hazard_step_loss));
            remaining -= lost;
            outcome.steps_forfeited += lost;
        }
    }

    outcome.steps_discarded = remaining;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use crate::error::ClimbError;
    use crate::trail::Terrain;
    use super::*;

    fn hazard_path() -> ClimbPath {
        ClimbPath::new(vec![
            Terrain::new("Start", 1),
            Terrain::hazardous("Mid", 2),
            Terrain::new("Summit", 1),
        ])
        .unwrap()
    }

    #[test]
    fn test_overshoot_stops_at_summit() {
        let path = hazard_path();
        let rules = MovementConfig::default();
        let outcome = resolve_move(&path, path.start(), 5, &rules).unwrap();

        assert_eq!(outcome.to, path.summit());
        assert_eq!(outcome.steps_taken, 2);
        assert_eq!(outcome.steps_discarded, 3);
        assert_eq!(outcome.hazards_crossed, 1);
        assert_eq!(outcome.stamina_delta, -rules.hazard_penalty);
        assert_eq!(outcome.score_delta, 3);
    }

    #[test]
    fn test_descent_stops_at_start() {
        let path = hazard_path();
        let rules = MovementConfig::default();
        let outcome = resolve_move(&path, path.summit(), -10, &rules).unwrap();

        assert_eq!(outcome.to, path.start());
        assert_eq!(outcome.steps_taken, 2);
        assert_eq!(outcome.steps_discarded, 8);
        assert_eq!(outcome.hazards_crossed, 1);
        assert_eq!(outcome.score_delta, 0);
    }

    #[test]
    fn test_hazard_forfeits_steps() {
        let path = ClimbPath::new(vec![
            Terrain::new("A", 1),
            Terrain::hazardous("B", 1),
            Terrain::new("C", 1),
            Terrain::new("D", 1),
            Terrain::new("E", 1),
        ])
        .unwrap();
        let rules = MovementConfig {
            hazard_penalty: 5,
            hazard_step_loss: 2,
            stamina_per_difficulty: 0,
        };
        let outcome = resolve_move(&path, path.start(), 4, &rules).unwrap();

        // One step into the hazard, two of the remaining three forfeited.
        assert_eq!(outcome.to, SegmentId::new(2));
        assert_eq!(outcome.steps_taken, 2);
        assert_eq!(outcome.steps_forfeited, 2);
        assert_eq!(outcome.steps_discarded, 0);
        assert_eq!(outcome.stamina_delta, -5);
    }

    #[test]
    fn test_difficulty_costs_stamina() {
        let path = hazard_path();
        let rules = MovementConfig {
            hazard_penalty: 0,
            hazard_step_loss: 0,
            stamina_per_difficulty: 3,
        };
        let outcome = resolve_move(&path, path.start(), 1, &rules).unwrap();
        assert_eq!(outcome.stamina_delta, -6);
    }

    #[test]
    fn test_zero_steps_is_stationary() {
        let path = hazard_path();
        let outcome =
            resolve_move(&path, SegmentId::new(1), 0, &MovementConfig::default()).unwrap();
        assert!(!outcome.moved());
        assert_eq!(outcome.stamina_delta, 0);
    }

    #[test]
    fn test_unknown_origin() {
        let path = hazard_path();
        let err = resolve_move(&path, SegmentId::new(9), 1, &MovementConfig::default());
        assert!(matches!(err, Err(ClimbError::NotFound(_))));
    }
}
