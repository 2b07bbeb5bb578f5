#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use mountain_climber::expedition::{Expedition, check_invariants};
use mountain_climber::{ClimbPath, SimConfig, Terrain};

/// One operation on an expedition.
#[derive(Arbitrary, Debug)]
enum Op {
    Join(u8),
    Quit(u8),
    Move(u8, i16),
    InsertAfter(u8, u8, bool),
    InsertBefore(u8, u8, bool),
    Retitle(u8, u8, bool),
    Remove(u8),
    AdvanceTurn,
}

/// Structured input for path edit fuzzing.
#[derive(Arbitrary, Debug)]
struct EditInput {
    /// Difficulties of the initial route (at least one segment is added).
    route: Vec<(u8, bool)>,
    /// Operations to apply in order.
    ops: Vec<Op>,
    /// Forfeited steps per hazard.
    hazard_step_loss: u8,
}

fn terrain(difficulty: u8, hazard: bool) -> Terrain {
    Terrain {
        name: format!("d{difficulty}"),
        difficulty: u32::from(difficulty),
        length: 0,
        hazard,
    }
}

fuzz_target!(|input: EditInput| {
    let mut route: Vec<Terrain> = input
        .route
        .iter()
        .take(64)
        .map(|&(d, h)| terrain(d, h))
        .collect();
    if route.is_empty() {
        route.push(terrain(1, false));
    }
    let Ok(path) = ClimbPath::new(route) else {
        return;
    };

    let mut config = SimConfig::default();
    config.movement.hazard_step_loss = u32::from(input.hazard_step_loss % 4);
    let Ok(mut exp) = Expedition::new(path, config) else {
        return;
    };

    for op in input.ops.into_iter().take(256) {
        let nth = |exp: &Expedition, n: u8| {
            let index = usize::from(n) % exp.path().len();
            exp.path().iter().nth(index).map(|s| s.id)
        };
        match op {
            Op::Join(c) => {
                let _ = exp.join(format!("c{}", c % 32), "fuzz");
            }
            Op::Quit(c) => {
                let _ = exp.quit(&format!("c{}", c % 32));
            }
            Op::Move(c, steps) => {
                let _ = exp.resolve_move(&format!("c{}", c % 32), i64::from(steps));
            }
            Op::InsertAfter(n, d, h) => {
                if let Some(at) = nth(&exp, n) {
                    let _ = exp.insert_segment_after(at, terrain(d, h));
                }
            }
            Op::InsertBefore(n, d, h) => {
                if let Some(at) = nth(&exp, n) {
                    let _ = exp.insert_segment_before(at, terrain(d, h));
                }
            }
            Op::Retitle(n, d, h) => {
                if let Some(at) = nth(&exp, n) {
                    let _ = exp.edit_segment(at, terrain(d, h));
                }
            }
            Op::Remove(n) => {
                if let Some(at) = nth(&exp, n) {
                    let _ = exp.remove_segment(at);
                }
            }
            Op::AdvanceTurn => {
                exp.advance_turn();
            }
        }

        let violations = check_invariants(&exp);
        assert!(violations.is_empty(), "invariant violations: {violations:?}");
    }
});
