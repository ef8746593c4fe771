//! Password hashing and bearer-token primitives for login sessions.

use base64::Engine;
use thiserror::Error;

use crate::config::PASSWORD_HASH_ROUNDS;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("password hashing failed")]
    Hash,
    #[error("invalid credentials")]
    InvalidCredentials,
}

/// Hash a password for storage (PBKDF2-HMAC-SHA256, salted, PHC string).
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    pbkdf2::pbkdf2_simple(password, PASSWORD_HASH_ROUNDS).map_err(|_| AuthError::Hash)
}

/// Verify a password against a stored hash.
pub fn verify_password(password: &str, stored: &str) -> Result<(), AuthError> {
    pbkdf2::pbkdf2_check(password, stored).map_err(|_| AuthError::InvalidCredentials)
}

/// Generate a random bearer token (URL-safe base64, 32 bytes of entropy).
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::random();
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// Hash a bearer token for storage using SHA-256, hex encoded.
pub fn hash_token(token: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_round_trip() {
        let hash = hash_password("secret-pw").unwrap();
        assert!(verify_password("secret-pw", &hash).is_ok());
        assert!(verify_password("wrong-pw", &hash).is_err());
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("secret-pw").unwrap();
        let b = hash_password("secret-pw").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn tokens_are_unique_and_url_safe() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
        assert!(!a.contains('+'));
        assert!(!a.contains('/'));
    }

    #[test]
    fn token_hash_is_stable_hex() {
        let h1 = hash_token("some-token");
        let h2 = hash_token("some-token");
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 64);
        assert!(h1.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
