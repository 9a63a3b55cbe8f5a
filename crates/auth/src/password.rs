//! Salted credential digests for stored passwords.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::Rng;
use sha2::{Digest, Sha256};

use crate::{AuthError, AuthResult};

/// Number of random salt bytes per credential.
const SALT_BYTES: usize = 16;

/// Hashes a password with a fresh random salt.
///
/// The result encodes salt and digest as `<salt>$<digest>`, both
/// URL-safe base64.
pub fn hash_password(password: &str) -> String {
    let mut rng = rand::rng();
    let salt: Vec<u8> = (0..SALT_BYTES).map(|_| rng.random::<u8>()).collect();
    let digest = salted_digest(&salt, password);

    format!(
        "{}${}",
        URL_SAFE_NO_PAD.encode(&salt),
        URL_SAFE_NO_PAD.encode(digest)
    )
}

/// Verifies a password against a stored `<salt>$<digest>` credential.
pub fn verify_password(password: &str, stored: &str) -> AuthResult<bool> {
    let (salt, expected) = stored.split_once('$').ok_or(AuthError::MalformedDigest)?;
    let salt = URL_SAFE_NO_PAD
        .decode(salt)
        .map_err(|_| AuthError::MalformedDigest)?;
    let expected = URL_SAFE_NO_PAD
        .decode(expected)
        .map_err(|_| AuthError::MalformedDigest)?;

    Ok(salted_digest(&salt, password) == expected)
}

fn salted_digest(salt: &[u8], password: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_round_trip() {
        let stored = hash_password("hunter2");
        assert!(verify_password("hunter2", &stored).unwrap());
        assert!(!verify_password("hunter3", &stored).unwrap());
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        assert_ne!(hash_password("hunter2"), hash_password("hunter2"));
    }

    #[test]
    fn test_malformed_digest_is_rejected() {
        let err = verify_password("hunter2", "not-a-digest").unwrap_err();
        assert!(matches!(err, AuthError::MalformedDigest));
    }
}
