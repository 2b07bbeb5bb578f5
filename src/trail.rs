//! The climb path structure.
//!
//! A route is a doubly linked chain of [`ClimbSegment`]s from a single start
//! to a single summit. Segments can be spliced in or removed anywhere, and
//! traversal clamps at both ends.

mod catalog;
mod path;
mod segment;

pub use catalog::DifficultyGroup;
pub use path::{ClimbPath, Direction, Segments};
pub use segment::{ClimbSegment, SegmentId, Terrain};
