#![no_main]

use std::collections::HashMap;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use mountain_climber::config::RegistryConfig;
use mountain_climber::registry::ClimberRegistry;
use mountain_climber::{Climber, SegmentId};

/// One registry operation.
#[derive(Arbitrary, Debug)]
enum Op {
    Put(String, i64),
    Remove(String),
    Get(String),
    Clear,
}

/// Structured input for registry fuzzing.
#[derive(Arbitrary, Debug)]
struct RegistryInput {
    /// Initial bucket count (reduced to 1..=64).
    buckets: u8,
    /// Hash collapse modulus, forcing collisions when small.
    collapse: u8,
    /// Operations to apply in order.
    ops: Vec<Op>,
}

fuzz_target!(|input: RegistryInput| {
    let config = RegistryConfig {
        initial_buckets: usize::from(input.buckets % 64) + 1,
        max_load_factor: 0.75,
    };
    let collapse = u64::from(input.collapse) + 1;
    let hasher = move |key: &str| key.bytes().map(u64::from).sum::<u64>() % collapse;
    let Ok(mut registry) = ClimberRegistry::with_hasher(&config, hasher) else {
        return;
    };
    let mut model: HashMap<String, i64> = HashMap::new();

    for op in input.ops.into_iter().take(512) {
        match op {
            Op::Put(id, score) => {
                let mut climber = Climber::new(id.as_str(), "fuzz", SegmentId::new(0), 0);
                climber.score = score;
                let previous = registry.put(id.as_str().into(), climber).ok().flatten();
                assert_eq!(previous.map(|c| c.score), model.insert(id, score));
            }
            Op::Remove(id) => {
                let removed = registry.remove(id.as_str()).ok().map(|c| c.score);
                assert_eq!(removed, model.remove(&id));
            }
            Op::Get(id) => {
                let found = registry.get(id.as_str()).ok().map(|c| c.score);
                assert_eq!(found, model.get(&id).copied());
            }
            Op::Clear => {
                registry.clear();
                model.clear();
            }
        }
        assert_eq!(registry.len(), model.len());
    }
    assert!(registry.check_buckets().is_empty());
});
