//! Expedition layer.
//!
//! Ties a climb path, a climber registry and a rule set into one game:
//! - Joining, quitting and moving climbers
//! - Editing the route while climbers are on it
//! - Ranked views and render snapshots
//! - Invariant checks
//! - Deterministic route generation and headless sessions

mod invariants;
mod routegen;
mod session;
mod snapshot;
mod state;

pub use invariants::{InvariantViolation, assert_invariants, check_invariants};
pub use routegen::{RouteParams, generate_route};
pub use session::{SessionConfig, SessionResult, run_session};
pub use snapshot::{ClimberView, Snapshot};
pub use state::Expedition;
