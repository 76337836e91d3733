//! Per-instance seed derivation.
//!
//! Seeds are a pure function of `(base_seed, template_name, index)`: the
//! SHA-256 digest of `"{base}_{name}_{index}"` read as a big-endian integer and
//! reduced modulo 2^32. Reduction modulo 2^32 keeps exactly the last four
//! digest bytes, so no big-integer arithmetic is needed.
use sha2::{Digest, Sha256};

/// Seed used in identical-params mode when no base seed was given.
pub const FIXED_SEED: u64 = 123;

pub fn derive_seed(base_seed: u64, template_name: &str, index: usize) -> u64 {
    let digest = Sha256::digest(format!("{base_seed}_{template_name}_{index}").as_bytes());
    let mut tail = [0u8; 4];
    tail.copy_from_slice(&digest[28..32]);
    u64::from(u32::from_be_bytes(tail))
}

/// Resolve the seed for instance `index` of `template_name`.
///
/// Returns `None` only when there is no base seed and identical params were
/// not requested; the caller then generates with ambient randomness.
pub fn instance_seed(
    base_seed: Option<u64>,
    template_name: &str,
    index: usize,
    use_identical_params: bool,
) -> Option<u64> {
    match (base_seed, use_identical_params) {
        (Some(base), true) => Some(derive_seed(base, template_name, 0)),
        (Some(base), false) => Some(derive_seed(base, template_name, index)),
        (None, true) => Some(FIXED_SEED),
        (None, false) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_seed_matches_reference_values() {
        assert_eq!(derive_seed(42, "Foo", 0), 2_967_886_867);
        assert_eq!(derive_seed(42, "Foo", 1), 844_409_655);
        assert_eq!(derive_seed(7, "Bar", 0), 4_047_881_370);
    }

    #[test]
    fn derive_seed_is_stable_and_index_sensitive() {
        let a = derive_seed(42, "Foo", 3);
        assert_eq!(a, derive_seed(42, "Foo", 3));
        assert_ne!(a, derive_seed(42, "Foo", 4));
        assert_ne!(a, derive_seed(42, "Bar", 3));
        assert_ne!(a, derive_seed(43, "Foo", 3));
        assert!(a < (1 << 32));
    }

    #[test]
    fn instance_seed_fallbacks() {
        assert_eq!(instance_seed(Some(42), "Foo", 1, false), Some(844_409_655));
        assert_eq!(instance_seed(Some(42), "Foo", 1, true), Some(2_967_886_867));
        assert_eq!(instance_seed(None, "Foo", 5, true), Some(FIXED_SEED));
        assert_eq!(instance_seed(None, "Foo", 5, false), None);
    }
}
