//! Deterministic route generation.

// RNG output is reduced with intentional casts.
#![allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]

use crate::error::{ClimbError, ClimbResult};
use crate::trail::{ClimbPath, Terrain};

/// Deterministic PRNG using xorshift64.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Rng {
    state: u64,
}

impl Rng {
    /// Create a new RNG with the given seed.
    pub(crate) const fn new(seed: u64) -> Self {
        // xorshift is stuck at zero.
        let state = if seed == 0 { 0x5555_5555_5555_5555 } else { seed };
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Random u32 in [0, max).
    pub(crate) fn next_u32(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        (self.next_u64() % u64::from(max)) as u32
    }

    /// Random f64 in (0, 1].
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() as f64) / (u64::MAX as f64)
    }
}

const FEATURES: [&str; 10] = [
    "Meadow", "Scree", "Ridge", "Couloir", "Glacier", "Arete", "Chimney", "Slab", "Cornice",
    "Icefall",
];

/// Shape of a generated route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteParams {
    /// Probability that an inner segment is hazardous.
    pub hazard_chance: f64,
    /// Difficulties are drawn from `1..=max_difficulty`.
    pub max_difficulty: u32,
    /// Lengths are drawn from `1..=max_length` metres. Zero leaves lengths unset.
    pub max_length: u32,
}

impl Default for RouteParams {
    fn default() -> Self {
        Self {
            hazard_chance: 0.2,
            max_difficulty: 5,
            max_length: 500,
        }
    }
}

/// Generate a route of `length` segments.
///
/// The same seed and parameters always produce the same route. The start
/// and the summit are never hazardous.
///
/// # Errors
///
/// Returns [`ClimbError::InvalidArgument`] if `length` is zero, the hazard
/// chance is outside `[0, 1]`, or `max_difficulty` is zero.
pub fn generate_route(seed: u64, length: usize, params: &RouteParams) -> ClimbResult<ClimbPath> {
    if length == 0 {
        return Err(ClimbError::InvalidArgument(
            "a route needs at least one segment".into(),
        ));
    }
    if !(0.0..=1.0).contains(&params.hazard_chance) {
        return Err(ClimbError::InvalidArgument(format!(
            "hazard_chance must be within [0, 1], got {}",
            params.hazard_chance
        )));
    }
    if params.max_difficulty == 0 {
        return Err(ClimbError::InvalidArgument(
            "max_difficulty must be at least 1".into(),
        ));
    }

    let mut rng = Rng::new(seed);
    let last = length - 1;
    let terrain = (0..length)
        .map(|i| {
            let difficulty = 1 + rng.next_u32(params.max_difficulty);
            let metres = if params.max_length == 0 {
                0
            } else {
                1 + rng.next_u32(params.max_length)
            };
            // Always draw so the stream does not depend on position.
            let roll = rng.next_f64();
            let hazard = i != 0 && i != last && roll <= params.hazard_chance;

            let name = if i == 0 {
                "Base Camp".to_string()
            } else if i == last {
                "Summit".to_string()
            } else {
                let feature = FEATURES[rng.next_u32(FEATURES.len() as u32) as usize];
                format!("{feature} {i}")
            };

            Terrain {
                name,
                difficulty,
                length: metres,
                hazard,
            }
        })
        .collect();

    ClimbPath::new(terrain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        let params = RouteParams::default();
        let a = generate_route(42, 30, &params).unwrap();
        let b = generate_route(42, 30, &params).unwrap();
        let c = generate_route(43, 30, &params).unwrap();

        let shape = |p: &ClimbPath| -> Vec<(String, u32, bool)> {
            p.iter()
                .map(|s| (s.name.clone(), s.difficulty, s.hazard))
                .collect()
        };
        assert_eq!(shape(&a), shape(&b));
        assert_ne!(shape(&a), shape(&c));
    }

    #[test]
    fn test_terminals_are_safe() {
        let params = RouteParams {
            hazard_chance: 1.0,
            ..RouteParams::default()
        };
        for seed in 0..20 {
            let path = generate_route(seed, 6, &params).unwrap();
            let segments: Vec<_> = path.iter().collect();
            assert!(!segments[0].hazard);
            assert!(!segments[5].hazard);
            assert!(segments[1..5].iter().all(|s| s.hazard));
        }
    }

    #[test]
    fn test_ranges() {
        let params = RouteParams {
            hazard_chance: 0.5,
            max_difficulty: 3,
            max_length: 10,
        };
        let path = generate_route(7, 50, &params).unwrap();
        assert_eq!(path.len(), 50);
        assert!(path.iter().all(|s| (1..=3).contains(&s.difficulty)));
        assert!(path.iter().all(|s| (1..=10).contains(&s.length)));
        assert!(path.validate().is_empty());
    }

    #[test]
    fn test_single_segment_route() {
        let path = generate_route(1, 1, &RouteParams::default()).unwrap();
        assert_eq!(path.start(), path.summit());
        assert!(!path.get(path.start()).unwrap().hazard);
    }

    #[test]
    fn test_rejects_bad_params() {
        let params = RouteParams::default();
        assert!(generate_route(1, 0, &params).is_err());
        let bad = RouteParams {
            hazard_chance: 1.5,
            ..params
        };
        assert!(generate_route(1, 5, &bad).is_err());
        let bad = RouteParams {
            max_difficulty: 0,
            ..params
        };
        assert!(generate_route(1, 5, &bad).is_err());
    }

    #[test]
    fn test_rng_zero_seed() {
        let mut rng = Rng::new(0);
        assert_ne!(rng.next_u64(), 0);
        assert!(rng.next_u32(6) < 6);
        assert_eq!(rng.next_u32(0), 0);
    }
}
