//! Property-based tests for code token generation.

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::generator::{CODE_ALPHABET, generate_code, normalize_code, validate_prefix};

proptest! {
    /// Generated tokens always have the shape `PREFIX-SUFFIX` with the
    /// requested suffix length, drawn from the unambiguous alphabet.
    #[test]
    fn test_token_shape(
        seed in any::<u64>(),
        suffix_length in 4usize..16,
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let token = generate_code(&mut rng, "GIFT", suffix_length);

        let (prefix, suffix) = token.split_once('-').expect("token has a dash");
        prop_assert_eq!(prefix, "GIFT");
        prop_assert_eq!(suffix.len(), suffix_length);
        prop_assert!(suffix.bytes().all(|b| CODE_ALPHABET.contains(&b)));
    }

    /// Normalization is idempotent and generated tokens survive it
    /// unchanged (they are already canonical).
    #[test]
    fn test_generated_tokens_are_canonical(seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let token = generate_code(&mut rng, "CONF2026", 8);

        prop_assert_eq!(normalize_code(&token), token.clone());
        prop_assert_eq!(normalize_code(&normalize_code(&token)), token);
    }

    /// Tokens never contain the ambiguous characters 0, O, 1, I, L.
    #[test]
    fn test_no_ambiguous_characters(seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let token = generate_code(&mut rng, "AB", 32);
        let suffix = token.split_once('-').unwrap().1;

        for forbidden in ['0', 'O', '1', 'I', 'L'] {
            prop_assert!(!suffix.contains(forbidden));
        }
    }

    /// Prefix validation accepts exactly 2-12 chars of A-Z0-9.
    #[test]
    fn test_prefix_acceptance(prefix in "[A-Z0-9]{2,12}") {
        prop_assert!(validate_prefix(&prefix).is_ok());
    }

    /// Any prefix containing a non-alphanumeric-uppercase byte is rejected.
    #[test]
    fn test_prefix_rejection(prefix in "[A-Z0-9]{0,5}[a-z_ -][A-Z0-9]{0,5}") {
        prop_assert!(validate_prefix(&prefix).is_err());
    }
}
