//! Separately chained hash table of climbers.

// Bucket indices and load factors convert between u64, usize and f64.
#![allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]

use log::debug;

use crate::config::RegistryConfig;
use crate::error::{ClimbError, ClimbResult};
use crate::registry::{Climber, ClimberId, KeyHasher, PolynomialHasher};

type Bucket = Vec<(ClimberId, Climber)>;

/// Key-indexed climber store.
///
/// Colliding keys share a bucket chain; lookups compare full keys. When an
/// insert pushes the load factor past the configured threshold, the bucket
/// count doubles and every entry is rehashed.
#[derive(Debug, Clone)]
pub struct ClimberRegistry<H = PolynomialHasher> {
    buckets: Vec<Bucket>,
    len: usize,
    max_load_factor: f64,
    hasher: H,
}

impl ClimberRegistry<PolynomialHasher> {
    /// Empty registry with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        let config = RegistryConfig::default();
        Self {
            buckets: empty_buckets(config.initial_buckets),
            len: 0,
            max_load_factor: config.max_load_factor,
            hasher: PolynomialHasher,
        }
    }
}

impl Default for ClimberRegistry<PolynomialHasher> {
    fn default() -> Self {
        Self::new()
    }
}

fn empty_buckets(count: usize) -> Vec<Bucket> {
    std::iter::repeat_with(Vec::new).take(count).collect()
}

impl<H: KeyHasher> ClimberRegistry<H> {
    /// Empty registry with a custom configuration and hasher.
    ///
    /// # Errors
    ///
    /// Returns [`ClimbError::InvalidArgument`] if the configuration is invalid.
    pub fn with_hasher(config: &RegistryConfig, hasher: H) -> ClimbResult<Self> {
        config.validate()?;
        Ok(Self {
            buckets: empty_buckets(config.initial_buckets),
            len: 0,
            max_load_factor: config.max_load_factor,
            hasher,
        })
    }

    fn bucket_of(&self, key: &str) -> usize {
        (self.hasher.hash_key(key) % self.buckets.len() as u64) as usize
    }

    /// Number of climbers stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the registry holds no climbers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current number of buckets.
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Entries per bucket.
    #[must_use]
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.buckets.len() as f64
    }

    /// Insert or overwrite the climber stored under `id`.
    ///
    /// Returns the climber previously stored under `id`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ClimbError::InvalidArgument`] if `climber.id` differs from `id`.
    pub fn put(&mut self, id: ClimberId, climber: Climber) -> ClimbResult<Option<Climber>> {
        if climber.id != id {
            return Err(ClimbError::InvalidArgument(format!(
                "climber {} stored under mismatched key {id}",
                climber.id
            )));
        }

        let b = self.bucket_of(id.as_str());
        if let Some((_, existing)) = self.buckets[b].iter_mut().find(|(k, _)| *k == id) {
            return Ok(Some(std::mem::replace(existing, climber)));
        }

        self.buckets[b].push((id, climber));
        self.len += 1;
        if self.load_factor() > self.max_load_factor {
            self.grow();
        }
        Ok(None)
    }

    /// Look up a climber.
    ///
    /// # Errors
    ///
    /// Returns [`ClimbError::NotFound`] if no climber is stored under `id`.
    pub fn get<Q: AsRef<str> + ?Sized>(&self, id: &Q) -> ClimbResult<&Climber> {
        let id = id.as_ref();
        self.buckets[self.bucket_of(id)]
            .iter()
            .find(|(k, _)| k.as_str() == id)
            .map(|(_, c)| c)
            .ok_or_else(|| ClimbError::not_found(format!("climber {id}")))
    }

    /// Look up a climber for modification.
    ///
    /// # Errors
    ///
    /// Returns [`ClimbError::NotFound`] if no climber is stored under `id`.
    pub fn get_mut<Q: AsRef<str> + ?Sized>(&mut self, id: &Q) -> ClimbResult<&mut Climber> {
        let id = id.as_ref();
        let b = self.bucket_of(id);
        self.buckets[b]
            .iter_mut()
            .find(|(k, _)| k.as_str() == id)
            .map(|(_, c)| c)
            .ok_or_else(|| ClimbError::not_found(format!("climber {id}")))
    }

    /// Whether a climber is stored under `id`.
    #[must_use]
    pub fn contains<Q: AsRef<str> + ?Sized>(&self, id: &Q) -> bool {
        self.get(id).is_ok()
    }

    /// Remove and return a climber.
    ///
    /// # Errors
    ///
    /// Returns [`ClimbError::NotFound`] if no climber is stored under `id`.
    pub fn remove<Q: AsRef<str> + ?Sized>(&mut self, id: &Q) -> ClimbResult<Climber> {
        let id = id.as_ref();
        let b = self.bucket_of(id);
        let slot = self.buckets[b]
            .iter()
            .position(|(k, _)| k.as_str() == id)
            .ok_or_else(|| ClimbError::not_found(format!("climber {id}")))?;
        self.len -= 1;
        Ok(self.buckets[b].remove(slot).1)
    }

    /// Remove every climber, keeping the current bucket count.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.len = 0;
    }

    /// `(bucket, position in chain)` where `id` is stored.
    ///
    /// # Errors
    ///
    /// Returns [`ClimbError::NotFound`] if no climber is stored under `id`.
    pub fn locate<Q: AsRef<str> + ?Sized>(&self, id: &Q) -> ClimbResult<(usize, usize)> {
        let id = id.as_ref();
        let b = self.bucket_of(id);
        self.buckets[b]
            .iter()
            .position(|(k, _)| k.as_str() == id)
            .map(|slot| (b, slot))
            .ok_or_else(|| ClimbError::not_found(format!("climber {id}")))
    }

    /// All climbers, in bucket order.
    pub fn iter(&self) -> impl Iterator<Item = &Climber> {
        self.buckets.iter().flatten().map(|(_, c)| c)
    }

    /// All climbers for modification, in bucket order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Climber> {
        self.buckets.iter_mut().flatten().map(|(_, c)| c)
    }

    /// Check bucket placement and key uniqueness.
    ///
    /// Returns a description of every problem found.
    #[must_use]
    pub fn check_buckets(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let mut seen = std::collections::HashSet::new();
        let mut count = 0usize;

        for (b, bucket) in self.buckets.iter().enumerate() {
            for (key, climber) in bucket {
                count += 1;
                let expected = self.bucket_of(key.as_str());
                if expected != b {
                    problems.push(format!("{key} sits in bucket {b}, hashes to {expected}"));
                }
                if climber.id != *key {
                    problems.push(format!("{key} stores climber {}", climber.id));
                }
                if !seen.insert(key) {
                    problems.push(format!("{key} is stored more than once"));
                }
            }
        }
        if count != self.len {
            problems.push(format!("{count} entries stored but length is {}", self.len));
        }
        problems
    }

    fn grow(&mut self) {
        let new_count = self.buckets.len() * 2;
        let old = std::mem::replace(&mut self.buckets, empty_buckets(new_count));
        for (key, climber) in old.into_iter().flatten() {
            let b = self.bucket_of(key.as_str());
            self.buckets[b].push((key, climber));
        }
        debug!("registry grew to {new_count} buckets holding {} climbers", self.len);
    }
}
