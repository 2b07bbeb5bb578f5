//! Headless dice-driven sessions.
//!
//! Provides a pure function interface: `(seed, session, rules) -> SessionResult`.
//! Every climber rolls once per turn, in join order, until all of them have
//! either reached the summit or run out of stamina, or the turn limit hits.

use log::{info, warn};
use serde::Serialize;

use crate::config::SimConfig;
use crate::error::{ClimbError, ClimbResult};
use crate::expedition::routegen::Rng;
use crate::expedition::{Expedition, RouteParams, check_invariants, generate_route};
use crate::registry::{Climber, ClimberId};

/// Shape of a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    /// Number of climbers that join.
    pub climbers: usize,
    /// Number of segments on the generated route.
    pub segments: usize,
    /// Turn limit.
    pub max_turns: u32,
    /// Dice rolls are drawn from `1..=max_roll`.
    pub max_roll: u32,
    /// Route generation parameters.
    pub route: RouteParams,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            climbers: 4,
            segments: 20,
            max_turns: 200,
            max_roll: 6,
            route: RouteParams::default(),
        }
    }
}

/// Final result of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionResult {
    /// The seed used for this session.
    pub seed: u64,
    /// Total turns played.
    pub turns_played: u32,
    /// Segments on the route.
    pub route_length: usize,
    /// Climbers in the order they reached the summit.
    pub summit_order: Vec<ClimberId>,
    /// Climbers that ran out of stamina before the summit, in the order they did.
    pub exhausted: Vec<ClimberId>,
    /// Final climber state in join order.
    pub climbers: Vec<Climber>,
    /// Climber ids by score, highest first.
    pub leaderboard: Vec<ClimberId>,
    /// Hazardous segments entered across all moves.
    pub hazards_crossed: u64,
    /// Invariant violations seen along the way.
    pub violations: usize,
}

impl SessionResult {
    /// Whether every climber reached the summit.
    #[must_use]
    pub fn all_summited(&self) -> bool {
        self.summit_order.len() == self.climbers.len()
    }
}

/// Run one session.
///
/// The route and every dice roll derive from `seed`, so the same inputs
/// always produce the same result.
///
/// # Errors
///
/// Returns [`ClimbError::InvalidArgument`] if the session has no climbers,
/// `max_roll` is zero, or the route or rules are invalid.
pub fn run_session(
    seed: u64,
    session: &SessionConfig,
    rules: &SimConfig,
) -> ClimbResult<SessionResult> {
    if session.climbers == 0 {
        return Err(ClimbError::InvalidArgument(
            "a session needs at least one climber".into(),
        ));
    }
    if session.max_roll == 0 {
        return Err(ClimbError::InvalidArgument(
            "max_roll must be at least 1".into(),
        ));
    }

    let path = generate_route(seed, session.segments, &session.route)?;
    let mut expedition = Expedition::new(path, *rules)?;
    let ids: Vec<ClimberId> = (1..=session.climbers)
        .map(|n| ClimberId::new(format!("climber-{n}")))
        .collect();
    for (n, id) in ids.iter().enumerate() {
        expedition.join(id.clone(), format!("Climber {}", n + 1))?;
    }
    info!(
        "session {seed}: {} climbers on a {}-segment route",
        ids.len(),
        session.segments
    );

    // Dice use their own stream so the route shape does not shift the rolls.
    let mut dice = Rng::new(seed.rotate_left(32) ^ 0x9E37_79B9_7F4A_7C15);
    let mut summit_order = Vec::new();
    let mut exhausted = Vec::new();
    let mut hazards_crossed = 0u64;
    let mut violations = 0usize;

    while expedition.turn() < session.max_turns
        && summit_order.len() + exhausted.len() < ids.len()
    {
        for id in &ids {
            if summit_order.contains(id) || exhausted.contains(id) {
                continue;
            }
            let roll = 1 + dice.next_u32(session.max_roll);
            let outcome = expedition.resolve_move(id, i64::from(roll))?;
            hazards_crossed += u64::from(outcome.hazards_crossed);

            if expedition.path().is_summit(outcome.to) {
                summit_order.push(id.clone());
            } else if expedition.climber(id)?.is_exhausted() {
                exhausted.push(id.clone());
            }
        }
        expedition.advance_turn();

        for violation in check_invariants(&expedition) {
            warn!("session {seed}, turn {}: {violation}", expedition.turn());
            violations += 1;
        }
    }

    info!(
        "session {seed} finished after {} turns: {} summited, {} exhausted",
        expedition.turn(),
        summit_order.len(),
        exhausted.len()
    );

    Ok(SessionResult {
        seed,
        turns_played: expedition.turn(),
        route_length: expedition.path().len(),
        summit_order,
        exhausted,
        climbers: expedition.roster().into_iter().cloned().collect(),
        leaderboard: expedition.leaderboard().into_iter().map(|c| c.id).collect(),
        hazards_crossed,
        violations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_per_seed() {
        let session = SessionConfig::default();
        let rules = SimConfig::default();
        let a = run_session(99, &session, &rules).unwrap();
        let b = run_session(99, &session, &rules).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.violations, 0);
    }

    #[test]
    fn test_everyone_summits_without_hazards() {
        let session = SessionConfig {
            climbers: 3,
            segments: 12,
            max_turns: 100,
            max_roll: 6,
            route: RouteParams {
                hazard_chance: 0.0,
                ..RouteParams::default()
            },
        };
        let result = run_session(5, &session, &SimConfig::default()).unwrap();

        assert!(result.all_summited());
        assert!(result.exhausted.is_empty());
        assert_eq!(result.hazards_crossed, 0);
        // Eleven steps at most six per turn.
        assert!(result.turns_played >= 2 && result.turns_played <= 11);
        assert!(result.climbers.iter().all(|c| c.stamina == 100));
    }

    #[test]
    fn test_turn_limit() {
        let session = SessionConfig {
            segments: 500,
            max_turns: 3,
            max_roll: 2,
            ..SessionConfig::default()
        };
        let result = run_session(1, &session, &SimConfig::default()).unwrap();
        assert_eq!(result.turns_played, 3);
        assert!(result.summit_order.is_empty());
        assert!(result.climbers.iter().all(|c| c.moves == 3));
    }

    #[test]
    fn test_exhaustion_stops_climbers() {
        let session = SessionConfig {
            climbers: 2,
            segments: 60,
            max_turns: 500,
            max_roll: 1,
            route: RouteParams {
                hazard_chance: 1.0,
                ..RouteParams::default()
            },
        };
        let mut rules = SimConfig::default();
        rules.starting_stamina = 25;
        let result = run_session(3, &session, &rules).unwrap();

        // Penalty 10 per hazard: three hazards exhaust a climber.
        assert_eq!(result.exhausted.len(), 2);
        assert!(result.climbers.iter().all(|c| c.stamina == 0 && c.moves == 3));
        assert_eq!(result.turns_played, 3);
    }

    #[test]
    fn test_rejects_empty_session() {
        let session = SessionConfig {
            climbers: 0,
            ..SessionConfig::default()
        };
        assert!(run_session(1, &session, &SimConfig::default()).is_err());
    }
}
