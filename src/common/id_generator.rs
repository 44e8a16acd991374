// src/common/id_generator.rs
//! Crockford Base32 ID Generator
//!
//! Generates prefixed user ids using Crockford Base32 encoding.
//! Format: U_XXXXXXXXXX
//!
//! The alphabet excludes I, L, O, U so ids are unambiguous when read aloud.

use rand::Rng;

/// Crockford Base32 alphabet (excludes I, L, O, U to avoid confusion)
const CROCKFORD_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Number of random characters in a user id (32^10 combinations)
const USER_ID_LENGTH: usize = 10;

const USER_PREFIX: &str = "U";

/// Generate a random Crockford Base32 string of specified length
fn generate_crockford_string(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..32);
            CROCKFORD_ALPHABET[idx] as char
        })
        .collect()
}

/// Generate a User ID (U_XXXXXXXXXX)
pub fn generate_user_id() -> String {
    format!(
        "{}_{}",
        USER_PREFIX,
        generate_crockford_string(USER_ID_LENGTH)
    )
}
