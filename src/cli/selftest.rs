//! Selftest command implementation.
//!
//! Runs labelled scenario checks against the library. Labels take the form
//! `<section>.<n>`: 1 path, 2 registry, 3 movement, 4 sorting, 5 expedition.

use std::error::Error;

use mountain_climber::config::{MovementConfig, RegistryConfig};
use mountain_climber::engine::{
    PivotStrategy, RankKey, Ranking, SortAlgorithm, resolve_move, sort_by,
};
use mountain_climber::expedition::{SessionConfig, check_invariants, run_session};
use mountain_climber::{
    ClimbError, ClimbPath, Climber, ClimberRegistry, Expedition, SegmentId, SimConfig, Terrain,
};

use super::CliError;

type CheckResult = Result<(), Box<dyn Error>>;

struct Check {
    label: &'static str,
    name: &'static str,
    run: fn() -> CheckResult,
}

impl Check {
    const fn new(label: &'static str, name: &'static str, run: fn() -> CheckResult) -> Self {
        Self { label, name, run }
    }
}

fn ensure(condition: bool, what: &str) -> CheckResult {
    if condition { Ok(()) } else { Err(what.into()) }
}

fn three_segments() -> Result<ClimbPath, ClimbError> {
    ClimbPath::new(vec![
        Terrain::new("Base", 1),
        Terrain::hazardous("Scree", 2),
        Terrain::new("Summit", 1),
    ])
}

fn path_order() -> CheckResult {
    let path = three_segments()?;
    let ids: Vec<u32> = path.iter().map(|s| s.id.raw()).collect();
    ensure(ids == [0, 1, 2], "segments are not in start-to-summit order")?;
    ensure(path.validate().is_empty(), "fresh path fails validation")
}

fn path_insert_after_summit() -> CheckResult {
    let mut path = three_segments()?;
    let id = path.insert_after(path.summit(), Terrain::new("Peak", 5))?;
    ensure(path.summit() == id, "new segment did not become the summit")?;
    ensure(path.len() == 4, "length did not grow")
}

fn path_remove_relinks() -> CheckResult {
    let mut path = three_segments()?;
    path.remove(SegmentId::new(1))?;
    ensure(
        path.next(SegmentId::new(0))? == Some(SegmentId::new(2)),
        "neighbours were not re-linked",
    )?;
    ensure(path.validate().is_empty(), "path invalid after removal")
}

fn path_sole_segment() -> CheckResult {
    let mut path = ClimbPath::new(vec![Terrain::new("Only", 1)])?;
    ensure(
        matches!(path.remove(SegmentId::new(0)), Err(ClimbError::InvalidOperation(_))),
        "removing the only segment was allowed",
    )
}

fn path_traverse_clamps() -> CheckResult {
    let path = three_segments()?;
    ensure(path.traverse_from(path.start(), 99)? == path.summit(), "overshot the summit")?;
    ensure(path.traverse_from(path.summit(), -99)? == path.start(), "passed the start")
}

fn registry_put_get() -> CheckResult {
    let mut registry = ClimberRegistry::new();
    let climber = Climber::new("ana", "Ana", SegmentId::new(0), 100);
    registry.put("ana".into(), climber.clone())?;
    ensure(*registry.get("ana")? == climber, "get did not return the stored climber")
}

fn registry_collisions() -> CheckResult {
    let config = RegistryConfig {
        initial_buckets: 8,
        max_load_factor: 10.0,
    };
    let mut registry = ClimberRegistry::with_hasher(&config, |_: &str| 0)?;
    for id in ["A", "B", "C"] {
        registry.put(id.into(), Climber::new(id, id, SegmentId::new(0), 100))?;
    }
    registry.remove("B")?;
    ensure(registry.contains("A") && registry.contains("C"), "chain neighbours were lost")?;
    ensure(!registry.contains("B"), "removed climber still present")
}

fn registry_resize() -> CheckResult {
    let mut registry = ClimberRegistry::new();
    for i in 0..64 {
        let id = format!("c{i}");
        registry.put(id.clone().into(), Climber::new(id, "x", SegmentId::new(0), 1))?;
    }
    ensure(registry.bucket_count() > 8, "registry never grew")?;
    ensure(
        (0..64).all(|i| registry.contains(&format!("c{i}"))),
        "a mapping was lost on resize",
    )?;
    ensure(registry.check_buckets().is_empty(), "bucket check failed")
}

fn movement_overshoot() -> CheckResult {
    let path = three_segments()?;
    let rules = MovementConfig::default();
    let outcome = resolve_move(&path, path.start(), 5, &rules)?;
    ensure(outcome.to == path.summit(), "did not stop at the summit")?;
    ensure(outcome.stamina_delta == -rules.hazard_penalty, "hazard penalty not applied once")?;
    ensure(outcome.steps_discarded == 3, "wrong number of discarded steps")
}

fn movement_descent() -> CheckResult {
    let path = three_segments()?;
    let outcome = resolve_move(&path, path.summit(), -4, &MovementConfig::default())?;
    ensure(outcome.to == path.start(), "did not stop at the start")?;
    ensure(outcome.score_delta == 0, "descending scored points")
}

fn movement_unknown_climber() -> CheckResult {
    let mut expedition = Expedition::new(three_segments()?, SimConfig::default())?;
    ensure(
        matches!(expedition.resolve_move("ghost", 1), Err(ClimbError::NotFound(_))),
        "moving an unknown climber did not fail",
    )
}

fn sort_merge_stable() -> CheckResult {
    let items = [(2, 'a'), (1, 'b'), (2, 'c'), (1, 'd')];
    let sorted = sort_by(&items, |p| p.0, SortAlgorithm::Merge);
    ensure(
        sorted == [(1, 'b'), (1, 'd'), (2, 'a'), (2, 'c')],
        "merge sort is not stable",
    )
}

fn sort_quick_pivots() -> CheckResult {
    let items: Vec<i32> = (0..50).map(|i| (i * 37) % 23 - 11).collect();
    for pivot in [
        PivotStrategy::MedianOfThree,
        PivotStrategy::First,
        PivotStrategy::Middle,
        PivotStrategy::Last,
    ] {
        let sorted = sort_by(&items, |x| *x, SortAlgorithm::Quick(pivot));
        ensure(sorted.windows(2).all(|w| w[0] <= w[1]), "quicksort output unordered")?;
        ensure(sorted.len() == items.len(), "quicksort changed the length")?;
    }
    Ok(())
}

fn sort_ranking() -> CheckResult {
    let mut ranking = Ranking::new(RankKey::Score);
    let mut climbers = Vec::new();
    for (id, score) in [("a", 30), ("b", 10), ("c", 20)] {
        let mut c = Climber::new(id, id, SegmentId::new(0), 100);
        c.score = score;
        climbers.push(c);
    }
    ranking.add_climbers(&climbers);
    ensure(ranking.position(&climbers[1])? == 0, "lowest score not ranked first")?;
    ensure(ranking.position(&climbers[0])? == 2, "highest score not ranked last")
}

fn expedition_duplicate_join() -> CheckResult {
    let mut expedition = Expedition::new(three_segments()?, SimConfig::default())?;
    expedition.join("ana", "Ana")?;
    ensure(
        matches!(expedition.join("ana", "Ana"), Err(ClimbError::InvalidOperation(_))),
        "duplicate join was accepted",
    )
}

fn expedition_segment_removal() -> CheckResult {
    let mut expedition = Expedition::new(three_segments()?, SimConfig::default())?;
    expedition.join("ana", "Ana")?;
    expedition.resolve_move("ana", 1)?;
    expedition.remove_segment(SegmentId::new(1))?;
    ensure(
        expedition.climber("ana")?.segment == SegmentId::new(0),
        "climber was not moved off the removed segment",
    )?;
    ensure(check_invariants(&expedition).is_empty(), "invariants broken")
}

fn expedition_segment_edit() -> CheckResult {
    let mut expedition = Expedition::new(three_segments()?, SimConfig::default())?;
    expedition.join("ana", "Ana")?;
    expedition.resolve_move("ana", 1)?;
    let old = expedition.edit_segment(SegmentId::new(1), Terrain::new("Slab", 4))?;
    ensure(old.hazard, "edit did not return the previous terrain")?;
    ensure(
        expedition.climber("ana")?.segment == SegmentId::new(1),
        "climber moved off the edited segment",
    )?;
    ensure(
        expedition.path().get(SegmentId::new(1))?.difficulty == 4,
        "new terrain not applied",
    )
}

fn expedition_session_determinism() -> CheckResult {
    let session = SessionConfig::default();
    let rules = SimConfig::default();
    let a = run_session(2024, &session, &rules)?;
    let b = run_session(2024, &session, &rules)?;
    ensure(a == b, "same seed produced different sessions")?;
    ensure(a.violations == 0, "session reported invariant violations")
}

const CHECKS: &[Check] = &[
    Check::new("1.1", "path keeps start-to-summit order", path_order),
    Check::new("1.2", "insert after summit extends the path", path_insert_after_summit),
    Check::new("1.3", "remove re-links neighbours", path_remove_relinks),
    Check::new("1.4", "sole segment cannot be removed", path_sole_segment),
    Check::new("1.5", "traversal clamps at both ends", path_traverse_clamps),
    Check::new("2.1", "get returns what put stored", registry_put_get),
    Check::new("2.2", "chained removal keeps neighbours", registry_collisions),
    Check::new("2.3", "resize preserves every mapping", registry_resize),
    Check::new("3.1", "overshoot stops at the summit", movement_overshoot),
    Check::new("3.2", "descent stops at the start", movement_descent),
    Check::new("3.3", "unknown climber is not found", movement_unknown_climber),
    Check::new("4.1", "merge sort is stable", sort_merge_stable),
    Check::new("4.2", "quicksort orders for every pivot", sort_quick_pivots),
    Check::new("4.3", "ranking finds positions", sort_ranking),
    Check::new("5.1", "duplicate join is rejected", expedition_duplicate_join),
    Check::new("5.2", "segment removal relocates climbers", expedition_segment_removal),
    Check::new("5.3", "sessions are deterministic", expedition_session_determinism),
    Check::new("5.4", "segment edit keeps climbers in place", expedition_segment_edit),
];

/// Execute the selftest command.
///
/// # Errors
///
/// Returns an error if any selected check fails or the filter selects nothing.
pub(crate) fn execute(filter: Option<u32>) -> Result<(), CliError> {
    let prefix = filter.map(|n| format!("{n}."));
    let selected: Vec<&Check> = CHECKS
        .iter()
        .filter(|c| prefix.as_deref().is_none_or(|p| c.label.starts_with(p)))
        .collect();
    if selected.is_empty() {
        return Err(CliError::new(format!(
            "no checks match section {}",
            filter.unwrap_or_default()
        )));
    }

    let mut failures = 0usize;
    for check in &selected {
        match (check.run)() {
            Ok(()) => println!("  ✓ {} {}", check.label, check.name),
            Err(e) => {
                failures += 1;
                println!("  ✗ {} {}: {e}", check.label, check.name);
            }
        }
    }

    println!();
    println!("{} passed, {failures} failed", selected.len() - failures);
    if failures > 0 {
        return Err(CliError::new(format!("{failures} checks failed")));
    }
    Ok(())
}
