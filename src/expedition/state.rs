//! Expedition state management.

use std::cmp::Reverse;

use log::debug;

use crate::config::SimConfig;
use crate::engine::{MoveOutcome, SortAlgorithm, merge_sort_by_key, resolve_move, sort_by};
use crate::error::{ClimbError, ClimbResult};
use crate::registry::{Climber, ClimberId, ClimberRegistry, KeyHasher, PolynomialHasher};
use crate::trail::{ClimbPath, ClimbSegment, SegmentId, Terrain};

/// One game: a route, the climbers on it and the rules they play by.
///
/// This is the surface an interactive front end drives. Every mutation goes
/// through a method here so that climbers never point at a segment that is
/// no longer on the path.
#[derive(Debug, Clone)]
pub struct Expedition<H = PolynomialHasher> {
    path: ClimbPath,
    registry: ClimberRegistry<H>,
    config: SimConfig,
    turn: u32,
    next_join: u64,
}

impl Expedition<PolynomialHasher> {
    /// Create an expedition with the default registry hasher.
    ///
    /// # Errors
    ///
    /// Returns [`ClimbError::InvalidArgument`] if `config` is invalid.
    pub fn new(path: ClimbPath, config: SimConfig) -> ClimbResult<Self> {
        Self::with_hasher(path, config, PolynomialHasher)
    }
}

impl<H: KeyHasher> Expedition<H> {
    /// Create an expedition whose registry uses `hasher`.
    ///
    /// # Errors
    ///
    /// Returns [`ClimbError::InvalidArgument`] if `config` is invalid.
    pub fn with_hasher(path: ClimbPath, config: SimConfig, hasher: H) -> ClimbResult<Self> {
        config.validate()?;
        Ok(Self {
            path,
            registry: ClimberRegistry::with_hasher(&config.registry, hasher)?,
            config,
            turn: 0,
            next_join: 0,
        })
    }

    /// The route.
    #[must_use]
    pub const fn path(&self) -> &ClimbPath {
        &self.path
    }

    /// The climber registry.
    #[must_use]
    pub const fn registry(&self) -> &ClimberRegistry<H> {
        &self.registry
    }

    /// The rules in force.
    #[must_use]
    pub const fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Current turn number (0-indexed).
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// Look up a climber.
    ///
    /// # Errors
    ///
    /// Returns [`ClimbError::NotFound`] if no climber has this id.
    pub fn climber<Q: AsRef<str> + ?Sized>(&self, id: &Q) -> ClimbResult<&Climber> {
        self.registry.get(id)
    }

    /// All climbers in the order they joined.
    #[must_use]
    pub fn roster(&self) -> Vec<&Climber> {
        merge_sort_by_key(self.registry.iter().collect::<Vec<_>>(), |c| c.joined)
    }

    /// Place a new climber on the start segment.
    ///
    /// # Errors
    ///
    /// Returns [`ClimbError::InvalidOperation`] if the id is already taken.
    pub fn join(
        &mut self,
        id: impl Into<ClimberId>,
        name: impl Into<String>,
    ) -> ClimbResult<&Climber> {
        let id = id.into();
        if self.registry.contains(&id) {
            return Err(ClimbError::InvalidOperation(format!(
                "climber {id} has already joined"
            )));
        }
        let mut climber = Climber::new(
            id.clone(),
            name,
            self.path.start(),
            self.config.starting_stamina,
        );
        climber.joined = self.next_join;
        self.next_join += 1;
        self.registry.put(id.clone(), climber)?;
        debug!("{id} joined at {}", self.path.start());
        self.registry.get(&id)
    }

    /// Remove a climber from the expedition.
    ///
    /// # Errors
    ///
    /// Returns [`ClimbError::NotFound`] if no climber has this id.
    pub fn quit<Q: AsRef<str> + ?Sized>(&mut self, id: &Q) -> ClimbResult<Climber> {
        self.registry.remove(id)
    }

    /// Drop every climber and rewind the turn counter. The route is kept.
    pub fn reset(&mut self) {
        self.registry.clear();
        self.turn = 0;
        self.next_join = 0;
    }

    /// Move a climber by a signed step count and apply the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`ClimbError::NotFound`] if no climber has this id.
    pub fn resolve_move<Q: AsRef<str> + ?Sized>(
        &mut self,
        id: &Q,
        steps: i64,
    ) -> ClimbResult<MoveOutcome> {
        let from = self.registry.get(id)?.segment;
        let outcome = resolve_move(&self.path, from, steps, &self.config.movement)?;
        let climber = self.registry.get_mut(id)?;
        climber.apply(&outcome);
        debug!(
            "{} moved {} -> {} ({} taken, {} discarded, stamina {})",
            climber.id,
            outcome.from,
            outcome.to,
            outcome.steps_taken,
            outcome.steps_discarded,
            climber.stamina
        );
        Ok(outcome)
    }

    /// Finish the current turn. Returns the new turn number.
    pub fn advance_turn(&mut self) -> u32 {
        self.turn = self.turn.saturating_add(1);
        self.turn
    }

    /// Add a segment directly after `after`.
    ///
    /// # Errors
    ///
    /// Returns [`ClimbError::NotFound`] if `after` is not on the path.
    pub fn insert_segment_after(
        &mut self,
        after: SegmentId,
        terrain: Terrain,
    ) -> ClimbResult<SegmentId> {
        self.path.insert_after(after, terrain)
    }

    /// Add a segment directly before `before`.
    ///
    /// # Errors
    ///
    /// Returns [`ClimbError::NotFound`] if `before` is not on the path.
    pub fn insert_segment_before(
        &mut self,
        before: SegmentId,
        terrain: Terrain,
    ) -> ClimbResult<SegmentId> {
        self.path.insert_before(before, terrain)
    }

    /// Change a segment's terrain without moving anyone.
    ///
    /// Climbers on the segment stay on it and later moves use the new
    /// difficulty and hazard. Returns the segment as it was before.
    ///
    /// # Errors
    ///
    /// Returns [`ClimbError::NotFound`] if `id` is not on the path.
    pub fn edit_segment(&mut self, id: SegmentId, terrain: Terrain) -> ClimbResult<ClimbSegment> {
        self.path.edit(id, terrain)
    }

    /// Remove a segment from the route.
    ///
    /// Climbers standing on it step back to the previous segment, or forward
    /// to the new start if the start itself was removed.
    ///
    /// # Errors
    ///
    /// Returns [`ClimbError::NotFound`] if `id` is not on the path, or
    /// [`ClimbError::InvalidOperation`] if it is the only segment.
    pub fn remove_segment(&mut self, id: SegmentId) -> ClimbResult<ClimbSegment> {
        let fallback = match self.path.prev(id)? {
            Some(prev) => Some(prev),
            None => self.path.next(id)?,
        };
        let removed = self.path.remove(id)?;

        if let Some(fallback) = fallback {
            for climber in self.registry.iter_mut().filter(|c| c.segment == id) {
                climber.segment = fallback;
                debug!("{} relocated from removed {id} to {fallback}", climber.id);
            }
        }
        Ok(removed)
    }

    /// All climbers sorted ascending by `key_fn`.
    ///
    /// Climbers are taken in join order first, so with a stable algorithm
    /// ties go to whoever joined earlier. `None` uses the configured
    /// algorithm.
    pub fn ranked<K, F>(&self, key_fn: F, algorithm: Option<SortAlgorithm>) -> Vec<Climber>
    where
        K: Ord,
        F: FnMut(&Climber) -> K,
    {
        let in_join_order: Vec<Climber> = self.roster().into_iter().cloned().collect();
        sort_by(
            &in_join_order,
            key_fn,
            algorithm.unwrap_or(self.config.sort.algorithm),
        )
    }

    /// Climbers by score, highest first.
    #[must_use]
    pub fn leaderboard(&self) -> Vec<Climber> {
        self.ranked(|c| Reverse(c.score), None)
    }

    /// Climbers by distance from the start, furthest first.
    #[must_use]
    pub fn ranked_by_progress(&self) -> Vec<Climber> {
        let positions = self.path.positions();
        self.ranked(
            |c| Reverse(positions.get(&c.segment).copied().unwrap_or(0)),
            None,
        )
    }

    /// Climbers standing on the summit, in join order.
    #[must_use]
    pub fn at_summit(&self) -> Vec<&Climber> {
        let summit = self.path.summit();
        self.roster()
            .into_iter()
            .filter(|c| c.segment == summit)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_path() -> ClimbPath {
        ClimbPath::new(vec![
            Terrain::new("Base", 1),
            Terrain::hazardous("Scree", 2),
            Terrain::new("Summit", 1),
        ])
        .unwrap()
    }

    fn expedition() -> Expedition {
        Expedition::new(scenario_path(), SimConfig::default()).unwrap()
    }

    #[test]
    fn test_join_places_climber_at_start() {
        let mut exp = expedition();
        let start = exp.path().start();
        let climber = exp.join("ana", "Ana").unwrap();
        assert_eq!(climber.segment, start);
        assert_eq!(climber.stamina, 100);
        assert_eq!(exp.registry().len(), 1);
    }

    #[test]
    fn test_join_twice_fails() {
        let mut exp = expedition();
        exp.join("ana", "Ana").unwrap();
        assert!(matches!(
            exp.join("ana", "Another Ana"),
            Err(ClimbError::InvalidOperation(_))
        ));
    }

    #[test]
    fn test_overshooting_move() {
        let mut exp = expedition();
        exp.join("ana", "Ana").unwrap();
        let outcome = exp.resolve_move("ana", 5).unwrap();

        assert_eq!(outcome.steps_discarded, 3);
        let ana = exp.climber("ana").unwrap();
        assert_eq!(ana.segment, exp.path().summit());
        assert_eq!(ana.stamina, 90);
        assert_eq!(ana.moves, 1);
        assert_eq!(exp.at_summit().len(), 1);
    }

    #[test]
    fn test_move_unknown_climber() {
        let mut exp = expedition();
        assert!(matches!(
            exp.resolve_move("ghost", 1),
            Err(ClimbError::NotFound(_))
        ));
    }

    #[test]
    fn test_quit_and_reset() {
        let mut exp = expedition();
        exp.join("a", "A").unwrap();
        exp.join("b", "B").unwrap();
        exp.advance_turn();

        assert_eq!(exp.quit("a").unwrap().name, "A");
        assert!(matches!(exp.quit("a"), Err(ClimbError::NotFound(_))));

        exp.reset();
        assert!(exp.registry().is_empty());
        assert_eq!(exp.turn(), 0);
        assert_eq!(exp.path().len(), 3);
    }

    #[test]
    fn test_remove_segment_relocates_climbers() {
        let mut exp = expedition();
        exp.join("a", "A").unwrap();
        exp.resolve_move("a", 1).unwrap();
        let middle = SegmentId::new(1);
        assert_eq!(exp.climber("a").unwrap().segment, middle);

        exp.remove_segment(middle).unwrap();
        assert_eq!(exp.climber("a").unwrap().segment, SegmentId::new(0));
        assert!(crate::expedition::check_invariants(&exp).is_empty());
    }

    #[test]
    fn test_edit_segment_keeps_climbers_in_place() {
        let mut exp = expedition();
        exp.join("a", "A").unwrap();
        exp.resolve_move("a", 1).unwrap();
        let middle = SegmentId::new(1);

        let old = exp.edit_segment(middle, Terrain::new("Fixed ropes", 4)).unwrap();
        assert!(old.hazard);
        assert_eq!(exp.climber("a").unwrap().segment, middle);
        assert_eq!(exp.path().get(middle).unwrap().difficulty, 4);
        assert!(crate::expedition::check_invariants(&exp).is_empty());

        // The next climber through no longer pays the hazard penalty.
        exp.join("b", "B").unwrap();
        let outcome = exp.resolve_move("b", 1).unwrap();
        assert_eq!(outcome.hazards_crossed, 0);
        assert_eq!(exp.climber("b").unwrap().stamina, 100);
    }

    #[test]
    fn test_edit_unknown_segment() {
        let mut exp = expedition();
        assert!(matches!(
            exp.edit_segment(SegmentId::new(7), Terrain::new("x", 1)),
            Err(ClimbError::NotFound(_))
        ));
    }

    #[test]
    fn test_remove_start_moves_climbers_forward() {
        let mut exp = expedition();
        exp.join("a", "A").unwrap();
        exp.remove_segment(SegmentId::new(0)).unwrap();

        assert_eq!(exp.path().start(), SegmentId::new(1));
        assert_eq!(exp.climber("a").unwrap().segment, SegmentId::new(1));
    }

    #[test]
    fn test_remove_last_segment_fails() {
        let path = ClimbPath::new(vec![Terrain::new("Only", 1)]).unwrap();
        let mut exp = Expedition::new(path, SimConfig::default()).unwrap();
        exp.join("a", "A").unwrap();
        assert!(matches!(
            exp.remove_segment(SegmentId::new(0)),
            Err(ClimbError::InvalidOperation(_))
        ));
        assert_eq!(exp.climber("a").unwrap().segment, SegmentId::new(0));
    }

    #[test]
    fn test_leaderboard_ties_follow_join_order() {
        let mut exp = expedition();
        for id in ["c", "a", "b"] {
            exp.join(id, id.to_uppercase()).unwrap();
        }
        exp.resolve_move("b", 2).unwrap();

        let ids: Vec<String> = exp
            .leaderboard()
            .iter()
            .map(|c| c.id.to_string())
            .collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_ranked_by_progress() {
        let mut exp = expedition();
        exp.join("low", "Low").unwrap();
        exp.join("high", "High").unwrap();
        exp.join("mid", "Mid").unwrap();
        exp.resolve_move("high", 2).unwrap();
        exp.resolve_move("mid", 1).unwrap();

        let ids: Vec<String> = exp
            .ranked_by_progress()
            .iter()
            .map(|c| c.id.to_string())
            .collect();
        assert_eq!(ids, vec!["high", "mid", "low"]);
    }

    #[test]
    fn test_ranked_with_quicksort() {
        let mut exp = expedition();
        for (i, id) in ["a", "b", "c", "d"].into_iter().enumerate() {
            exp.join(id, id).unwrap();
            let steps = i64::try_from(i % 3).unwrap();
            exp.resolve_move(id, steps).unwrap();
        }
        let quick = exp.ranked(
            |c| c.score,
            Some(SortAlgorithm::Quick(crate::engine::PivotStrategy::First)),
        );
        let scores: Vec<i64> = quick.iter().map(|c| c.score).collect();
        assert!(scores.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(scores.len(), 4);
    }

    #[test]
    fn test_insert_segments() {
        let mut exp = expedition();
        let summit = exp.path().summit();
        let new_summit = exp
            .insert_segment_after(summit, Terrain::new("False Summit", 4))
            .unwrap();
        let start = exp.path().start();
        let new_start = exp
            .insert_segment_before(start, Terrain::new("Trailhead", 0))
            .unwrap();
        assert_eq!(exp.path().summit(), new_summit);
        assert_eq!(exp.path().start(), new_start);
        assert!(matches!(
            exp.insert_segment_after(SegmentId::new(99), Terrain::new("x", 1)),
            Err(ClimbError::NotFound(_))
        ));
    }
}
