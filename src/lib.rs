// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Mountain Climber: a deterministic turn-based climbing simulation core.
//!
//! Climbers move along a mutable route of segments, collecting score on the
//! way up and losing stamina to hazards. The crate provides:
//! - A doubly linked climb path with insertion and removal anywhere
//! - A separately chained hash table holding climber state
//! - Step-by-step move resolution that clamps at the start and summit
//! - Merge sort and quicksort for ranked views
//!
//! A front end drives an [`Expedition`] and renders its [`Snapshot`].
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Expedition (sessions, snapshots)  │
//! ├──────────────────┬──────────────────┤
//! │  Movement/Sort   │ Climber Registry │
//! ├──────────────────┴──────────────────┤
//! │            Climb Path               │
//! └─────────────────────────────────────┘
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod expedition;
pub mod registry;
pub mod trail;

pub use config::{ConfigError, SimConfig};
pub use error::{ClimbError, ClimbResult};

// Re-export key types at crate root for convenience
pub use engine::{MoveOutcome, SortAlgorithm};
pub use expedition::{Expedition, Snapshot};
pub use registry::{Climber, ClimberId, ClimberRegistry};
pub use trail::{ClimbPath, ClimbSegment, SegmentId, Terrain};
