//! Password hashing.
//!
//! Credentials are PBKDF2-HMAC-SHA256 PHC strings
//! (`$pbkdf2-sha256$i=<rounds>,l=32$<salt>$<hash>`), so the iteration count
//! travels with the credential.

use pbkdf2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use pbkdf2::{pbkdf2_hmac, Params, Pbkdf2};
use sha2::Sha256;
use thiserror::Error;

pub const DEFAULT_ITERATIONS: u32 = 600_000;

const SALT_LEN: usize = 16;
const HASH_LEN: usize = 32;

#[derive(Debug, Error)]
pub enum HashError {
    #[error("iteration count must be at least 1")]
    ZeroIterations,

    #[error("salt generation failed: {0}")]
    Salt(String),

    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str, iterations: u32) -> Result<String, HashError> {
    if iterations == 0 {
        return Err(HashError::ZeroIterations);
    }
    let mut bytes = [0u8; SALT_LEN];
    getrandom::getrandom(&mut bytes).map_err(|e| HashError::Salt(e.to_string()))?;
    let salt = SaltString::encode_b64(&bytes).map_err(|e| HashError::Salt(e.to_string()))?;

    let params = Params {
        rounds: iterations,
        output_length: HASH_LEN,
    };
    let hash = Pbkdf2
        .hash_password_customized(password.as_bytes(), None, None, params, &salt)
        .map_err(|e| HashError::Hash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a password against a PHC string. Malformed strings never match.
pub fn verify_password(password: &str, encoded: &str) -> bool {
    match PasswordHash::new(encoded) {
        Ok(parsed) => Pbkdf2.verify_password(password.as_bytes(), &parsed).is_ok(),
        Err(_) => false,
    }
}

/// Spend the work of one verification at `iterations`, then fail.
///
/// Login calls this when the username is unknown so that a missing user
/// costs the same as a wrong password.
pub fn verify_unknown_user(password: &str, iterations: u32) -> bool {
    let mut out = [0u8; HASH_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &[0u8; SALT_LEN], iterations.max(1), &mut out);
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAST: u32 = 1_000;

    #[test]
    fn hash_then_verify() {
        let encoded = hash_password("secret", FAST).unwrap();
        assert!(encoded.starts_with("$pbkdf2-sha256$"), "{encoded}");
        assert!(encoded.contains("i=1000"), "{encoded}");
        assert!(verify_password("secret", &encoded));
        assert!(!verify_password("Secret", &encoded));
    }

    #[test]
    fn salts_differ_between_hashes() {
        let a = hash_password("secret", FAST).unwrap();
        let b = hash_password("secret", FAST).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn zero_iterations_are_refused() {
        assert!(matches!(hash_password("secret", 0), Err(HashError::ZeroIterations)));
    }

    #[test]
    fn malformed_encodings_never_match() {
        assert!(!verify_password("secret", ""));
        assert!(!verify_password("secret", "secret"));
        assert!(!verify_password("secret", "pbkdf2-sha256$1$00$00"));
        assert!(!verify_password("secret", "$md5$i=1000$AAAA$AAAA"));
    }

    #[test]
    fn unknown_users_never_verify() {
        assert!(!verify_unknown_user("secret", FAST));
        assert!(!verify_unknown_user("", 0));
    }
}
