//! Key hashing for the climber registry.

/// Deterministic string hash used to place keys in buckets.
pub trait KeyHasher {
    /// Hash a key. Equal keys must produce equal hashes.
    fn hash_key(&self, key: &str) -> u64;
}

/// Polynomial rolling hash over the key's characters.
///
/// Starts with a multiplier of 31415 and scales it by 31 after every
/// character, in wrapping 64-bit arithmetic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PolynomialHasher;

const SEED: u64 = 31_415;
const BASE: u64 = 31;

impl KeyHasher for PolynomialHasher {
    fn hash_key(&self, key: &str) -> u64 {
        let mut value = 0u64;
        let mut a = SEED;
        for ch in key.chars() {
            value = u64::from(ch).wrapping_add(a.wrapping_mul(value));
            a = a.wrapping_mul(BASE);
        }
        value
    }
}

impl<F> KeyHasher for F
where
    F: Fn(&str) -> u64,
{
    fn hash_key(&self, key: &str) -> u64 {
        self(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polynomial_is_deterministic() {
        let h = PolynomialHasher;
        assert_eq!(h.hash_key("alice"), h.hash_key("alice"));
        assert_ne!(h.hash_key("alice"), h.hash_key("bob"));
        assert_eq!(h.hash_key(""), 0);
    }

    #[test]
    fn test_polynomial_known_value() {
        // 'a' -> 97, then 'b' -> 98 + (31415 * 31) * 97
        assert_eq!(PolynomialHasher.hash_key("ab"), 98 + 31_415 * 31 * 97);
    }

    #[test]
    fn test_closure_hasher() {
        let constant = |_: &str| 7u64;
        assert_eq!(constant.hash_key("anything"), 7);
    }
}
