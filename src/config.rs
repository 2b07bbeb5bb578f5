//! Simulation rules, loadable from JSON.
//!
//! Every section carries `#[serde(default)]`, so a config file only needs
//! the fields it changes:
//!
//! ```json
//! { "starting_stamina": 60, "movement": { "hazard_step_loss": 1 } }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::SortAlgorithm;
use crate::error::{ClimbError, ClimbResult};

/// Costs and penalties applied while resolving a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Stamina lost on entering a hazardous segment.
    pub hazard_penalty: i64,
    /// Remaining steps forfeited on entering a hazardous segment.
    pub hazard_step_loss: u32,
    /// Stamina lost per point of difficulty of each entered segment.
    pub stamina_per_difficulty: i64,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            hazard_penalty: 10,
            hazard_step_loss: 0,
            stamina_per_difficulty: 0,
        }
    }
}

impl MovementConfig {
    /// Check that no cost is negative.
    ///
    /// # Errors
    ///
    /// Returns [`ClimbError::InvalidArgument`] naming the offending field.
    pub fn validate(&self) -> ClimbResult<()> {
        if self.hazard_penalty < 0 {
            return Err(ClimbError::InvalidArgument(format!(
                "hazard_penalty must not be negative, got {}",
                self.hazard_penalty
            )));
        }
        if self.stamina_per_difficulty < 0 {
            return Err(ClimbError::InvalidArgument(format!(
                "stamina_per_difficulty must not be negative, got {}",
                self.stamina_per_difficulty
            )));
        }
        Ok(())
    }
}

/// Smallest accepted [`RegistryConfig::max_load_factor`].
///
/// Lower thresholds double the bucket count on nearly every insert.
pub const MIN_LOAD_FACTOR: f64 = 0.1;

/// Hash table sizing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Bucket count of a fresh registry.
    pub initial_buckets: usize,
    /// Load factor above which the bucket count doubles.
    pub max_load_factor: f64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            initial_buckets: 8,
            max_load_factor: 0.75,
        }
    }
}

impl RegistryConfig {
    /// Check bucket count and load factor.
    ///
    /// # Errors
    ///
    /// Returns [`ClimbError::InvalidArgument`] for zero buckets or a load
    /// factor that is infinite, NaN or below [`MIN_LOAD_FACTOR`].
    pub fn validate(&self) -> ClimbResult<()> {
        if self.initial_buckets == 0 {
            return Err(ClimbError::InvalidArgument(
                "initial_buckets must be at least 1".into(),
            ));
        }
        if !self.max_load_factor.is_finite() || self.max_load_factor < MIN_LOAD_FACTOR {
            return Err(ClimbError::InvalidArgument(format!(
                "max_load_factor must be finite and at least {MIN_LOAD_FACTOR}, got {}",
                self.max_load_factor
            )));
        }
        Ok(())
    }
}

/// Algorithm used for ranked views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SortConfig {
    /// Sort algorithm for leaderboards.
    pub algorithm: SortAlgorithm,
}

/// Full rule set of an expedition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Stamina a climber starts with.
    pub starting_stamina: i64,
    /// Movement costs.
    pub movement: MovementConfig,
    /// Registry sizing.
    pub registry: RegistryConfig,
    /// Ranking algorithm.
    pub sort: SortConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            starting_stamina: 100,
            movement: MovementConfig::default(),
            registry: RegistryConfig::default(),
            sort: SortConfig::default(),
        }
    }
}

/// Errors from loading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// The contents are not valid JSON for [`SimConfig`].
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
    /// The values parsed but break a rule.
    #[error("invalid config: {0}")]
    Invalid(#[from] ClimbError),
}

impl SimConfig {
    /// Check every section.
    ///
    /// # Errors
    ///
    /// Returns [`ClimbError::InvalidArgument`] for the first bad value.
    pub fn validate(&self) -> ClimbResult<()> {
        if self.starting_stamina < 0 {
            return Err(ClimbError::InvalidArgument(format!(
                "starting_stamina must not be negative, got {}",
                self.starting_stamina
            )));
        }
        self.movement.validate()?;
        self.registry.validate()
    }

    /// Parse and validate a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] on a parse failure and
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`SimConfig::from_json_str`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
