//! Expedition invariants: structural checks that detect bugs.
//!
//! None of these should ever fire after a sequence of public operations.
//! The session runner checks them every turn and logs anything it finds.

use thiserror::Error;

use crate::expedition::Expedition;
use crate::registry::KeyHasher;

/// A broken structural invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invariant violation: {message}")]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl InvariantViolation {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Check every expedition invariant.
///
/// Covers the path link structure, registry bucket placement, and that
/// every climber stands on a live segment with non-negative stamina.
#[must_use]
pub fn check_invariants<H: KeyHasher>(expedition: &Expedition<H>) -> Vec<InvariantViolation> {
    let path = expedition.path();
    let registry = expedition.registry();

    let mut violations: Vec<InvariantViolation> = path
        .validate()
        .into_iter()
        .chain(registry.check_buckets())
        .map(InvariantViolation::new)
        .collect();

    for climber in registry.iter() {
        if !path.contains(climber.segment) {
            violations.push(InvariantViolation::new(format!(
                "{} stands on {}, which is not on the path",
                climber.id, climber.segment
            )));
        }
        if climber.stamina < 0 {
            violations.push(InvariantViolation::new(format!(
                "{} has negative stamina {}",
                climber.id, climber.stamina
            )));
        }
    }

    violations
}

/// Assert all invariants hold.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics listing every violation if any invariant is broken.
#[cfg(debug_assertions)]
pub fn assert_invariants<H: KeyHasher>(expedition: &Expedition<H>) {
    let violations = check_invariants(expedition);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("expedition invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants<H: KeyHasher>(_expedition: &Expedition<H>) {}
