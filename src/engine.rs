//! Movement and ordering engine.
//!
//! - Move resolution: stepwise walk with hazard penalties, clamped at the
//!   start and summit
//! - Sorting: stable merge sort and in-place quicksort over any key
//! - Ranking: merge-sorted climber order with binary-search lookup

mod movement;
mod ranking;
mod sort;

pub use movement::{MoveOutcome, resolve_move};
pub use ranking::{RankKey, Ranking};
pub use sort::{
    PivotStrategy, SortAlgorithm, lower_bound_by_key, merge_sort_by_key, quick_sort_by_key, sort_by,
};
