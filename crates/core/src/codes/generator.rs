//! Redemption code token generation.
//!
//! Tokens look like `GIFT-7KQ4M2XR`: an admin-chosen prefix, a dash, and a
//! random suffix drawn from an alphabet with the ambiguous characters
//! (`0/O`, `1/I/L`) removed, since codes are read aloud and typed from print.

use rand::Rng;

use super::error::CodeError;

/// Suffix alphabet: uppercase alphanumerics minus `0 O 1 I L`.
pub const CODE_ALPHABET: &[u8] = b"23456789ABCDEFGHJKMNPQRSTUVWXYZ";

/// Prefix length bounds.
const PREFIX_MIN_LEN: usize = 2;
const PREFIX_MAX_LEN: usize = 12;

/// Validates a batch prefix: 2-12 characters, `A-Z` or `0-9` only.
///
/// # Errors
///
/// Returns `CodeError::InvalidPrefix` if the prefix is malformed.
pub fn validate_prefix(prefix: &str) -> Result<(), CodeError> {
    let len_ok = (PREFIX_MIN_LEN..=PREFIX_MAX_LEN).contains(&prefix.len());
    let chars_ok = prefix
        .bytes()
        .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit());

    if len_ok && chars_ok {
        Ok(())
    } else {
        Err(CodeError::InvalidPrefix)
    }
}

/// Generates one code token with the given prefix and suffix length.
///
/// Uniqueness is not guaranteed here; the caller inserts with a conflict
/// guard and regenerates on collision.
pub fn generate_code<R: Rng + ?Sized>(rng: &mut R, prefix: &str, suffix_length: usize) -> String {
    let mut token = String::with_capacity(prefix.len() + 1 + suffix_length);
    token.push_str(prefix);
    token.push('-');
    for _ in 0..suffix_length {
        let index = rng.random_range(0..CODE_ALPHABET.len());
        token.push(char::from(CODE_ALPHABET[index]));
    }
    token
}

/// Normalizes user input before lookup: trims whitespace and uppercases.
///
/// Users paste codes from emails and PDFs; leading whitespace and lowercase
/// typing must not make a valid code unredeemable.
#[must_use]
pub fn normalize_code(input: &str) -> String {
    input.trim().to_ascii_uppercase()
}
