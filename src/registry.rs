//! Climber registry.
//!
//! A separately chained hash table keyed by [`ClimberId`]. The hash function
//! is pluggable through [`KeyHasher`]; the default is a deterministic
//! polynomial string hash so bucket placement is reproducible across runs.

mod climber;
mod hasher;
mod table;

pub use climber::{Climber, ClimberId};
pub use hasher::{KeyHasher, PolynomialHasher};
pub use table::ClimberRegistry;
