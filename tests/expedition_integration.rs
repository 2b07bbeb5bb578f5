//! End-to-end scenarios for expeditions and headless sessions.
//!
//! Run with: cargo test --release expedition_integration

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use mountain_climber::config::{ConfigError, SimConfig};
use mountain_climber::engine::{PivotStrategy, SortAlgorithm};
use mountain_climber::expedition::{
    Expedition, RouteParams, SessionConfig, assert_invariants, check_invariants, generate_route,
    run_session,
};
use mountain_climber::registry::{ClimberRegistry, KeyHasher};
use mountain_climber::{ClimbError, ClimbPath, Climber, SegmentId, Terrain};

fn hazard_path() -> ClimbPath {
    ClimbPath::new(vec![
        Terrain::new("Start", 1),
        Terrain::hazardous("Icefall", 2),
        Terrain::new("Summit", 1),
    ])
    .unwrap()
}

#[test]
fn test_overshoot_scenario() {
    let mut exp = Expedition::new(hazard_path(), SimConfig::default()).unwrap();
    exp.join("x", "X").unwrap();
    let before = exp.climber("x").unwrap().stamina;

    let outcome = exp.resolve_move("x", 5).unwrap();

    let x = exp.climber("x").unwrap();
    assert_eq!(x.segment, SegmentId::new(2));
    assert_eq!(before - x.stamina, exp.config().movement.hazard_penalty);
    assert_eq!(outcome.steps_discarded, 3);
    assert_eq!(outcome.hazards_crossed, 1);
}

#[test]
fn test_forced_collisions() {
    struct SameBucket;
    impl KeyHasher for SameBucket {
        fn hash_key(&self, _key: &str) -> u64 {
            7
        }
    }

    let config = SimConfig::default();
    let mut registry = ClimberRegistry::with_hasher(&config.registry, SameBucket).unwrap();
    for id in ["A", "B", "C"] {
        registry
            .put(id.into(), Climber::new(id, id, SegmentId::new(0), 100))
            .unwrap();
    }
    registry.remove("B").unwrap();

    assert_eq!(registry.get("A").unwrap().name, "A");
    assert_eq!(registry.get("C").unwrap().name, "C");
    assert!(matches!(registry.get("B"), Err(ClimbError::NotFound(_))));
}

#[test]
fn test_route_edits_during_play() {
    let path = generate_route(11, 15, &RouteParams::default()).unwrap();
    let mut exp = Expedition::new(path, SimConfig::default()).unwrap();
    for i in 0..8 {
        exp.join(format!("c{i}"), format!("Climber {i}")).unwrap();
        exp.resolve_move(&format!("c{i}"), i).unwrap();
    }

    // Remove every other segment while climbers stand on them.
    let ids: Vec<SegmentId> = exp.path().iter().map(|s| s.id).collect();
    for id in ids.iter().step_by(2) {
        exp.remove_segment(*id).unwrap();
        assert_invariants(&exp);
    }
    assert_eq!(exp.path().len(), 7);

    let summit = exp.path().summit();
    exp.insert_segment_after(summit, Terrain::new("New Summit", 9))
        .unwrap();
    assert!(exp.at_summit().is_empty());
    assert!(check_invariants(&exp).is_empty());
}

#[test]
fn test_leaderboard_with_each_algorithm() {
    let mut exp = Expedition::new(hazard_path(), SimConfig::default()).unwrap();
    for (id, steps) in [("a", 0), ("b", 2), ("c", 1), ("d", 2)] {
        exp.join(id, id).unwrap();
        exp.resolve_move(id, steps).unwrap();
    }

    let merge: Vec<String> = exp
        .ranked(|c| std::cmp::Reverse(c.score), Some(SortAlgorithm::Merge))
        .iter()
        .map(|c| c.id.to_string())
        .collect();
    assert_eq!(merge, vec!["b", "d", "c", "a"]);

    let quick = exp.ranked(
        |c| std::cmp::Reverse(c.score),
        Some(SortAlgorithm::Quick(PivotStrategy::MedianOfThree)),
    );
    let scores: Vec<i64> = quick.iter().map(|c| c.score).collect();
    assert_eq!(scores, vec![3, 3, 2, 0]);
}

#[test]
fn test_session_determinism() {
    let session = SessionConfig {
        climbers: 6,
        segments: 40,
        ..SessionConfig::default()
    };
    let rules = SimConfig::default();

    let a = run_session(123, &session, &rules).unwrap();
    let b = run_session(123, &session, &rules).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.climbers.len(), 6);
    assert_eq!(a.violations, 0);
    assert!(
        a.summit_order.len() + a.exhausted.len() <= 6,
        "a climber was counted twice"
    );
}

#[test]
fn test_sessions_with_quicksort_rules() {
    let mut rules = SimConfig::default();
    rules.sort.algorithm = SortAlgorithm::Quick(PivotStrategy::Last);
    rules.movement.hazard_step_loss = 1;
    for seed in 0..20 {
        let result = run_session(seed, &SessionConfig::default(), &rules).unwrap();
        let scores: Vec<i64> = result
            .leaderboard
            .iter()
            .map(|id| result.climbers.iter().find(|c| c.id == *id).unwrap().score)
            .collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }
}

#[test]
fn test_config_file_drives_expedition() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("rules.json");
    std::fs::write(
        &file,
        r#"{
            "starting_stamina": 40,
            "movement": { "hazard_penalty": 25, "stamina_per_difficulty": 1 },
            "registry": { "initial_buckets": 2 },
            "sort": { "algorithm": { "quick": "middle" } }
        }"#,
    )
    .unwrap();

    let rules = SimConfig::load(&file).unwrap();
    assert_eq!(rules.sort.algorithm, SortAlgorithm::Quick(PivotStrategy::Middle));

    let mut exp = Expedition::new(hazard_path(), rules).unwrap();
    exp.join("x", "X").unwrap();
    exp.resolve_move("x", 2).unwrap();
    // Difficulty 2 + 1 and one hazard.
    assert_eq!(exp.climber("x").unwrap().stamina, 40 - 3 - 25);
    assert_eq!(exp.registry().bucket_count(), 2);
}

#[test]
fn test_invalid_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("rules.json");
    std::fs::write(&file, r#"{ "registry": { "max_load_factor": -2.0 } }"#).unwrap();
    assert!(matches!(SimConfig::load(&file), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_snapshot_after_session_moves() {
    let path = generate_route(5, 10, &RouteParams::default()).unwrap();
    let mut exp = Expedition::new(path, SimConfig::default()).unwrap();
    exp.join("a", "A").unwrap();
    exp.join("b", "B").unwrap();
    exp.resolve_move("a", 3).unwrap();
    exp.advance_turn();

    let snap = exp.snapshot();
    assert_eq!(snap.turn, 1);
    assert_eq!(snap.segments.len(), 10);
    assert_eq!(snap.climbers.len(), 2);
    assert_eq!(snap.climbers[0].position, 3);

    let json: serde_json::Value = serde_json::from_str(&snap.to_json().unwrap()).unwrap();
    assert_eq!(json["climbers"][1]["id"], "b");
}
