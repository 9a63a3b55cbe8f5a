//! Opaque bearer and invitation token generation.

use rand::Rng;

/// Number of random bytes in a generated token (256 bits of entropy).
const TOKEN_BYTES: usize = 32;

/// Generates a cryptographically random token, hex-encoded.
///
/// Used for both user access tokens and workspace invitation tokens.
pub fn generate_token() -> String {
    let mut rng = rand::rng();
    let bytes: Vec<u8> = (0..TOKEN_BYTES).map(|_| rng.random::<u8>()).collect();
    hex::encode(bytes)
}

/// Extracts the bearer token from an `Authorization` header value.
///
/// Accepts both `Bearer <token>` and a raw token.
pub fn parse_bearer(header: &str) -> &str {
    header.strip_prefix("Bearer ").unwrap_or(header)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_is_hex_of_expected_length() {
        let token = generate_token();
        assert_eq!(token.len(), TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_tokens_are_unique() {
        assert_ne!(generate_token(), generate_token());
    }

    #[test]
    fn test_parse_bearer_with_scheme() {
        assert_eq!(parse_bearer("Bearer abc123"), "abc123");
    }

    #[test]
    fn test_parse_bearer_raw_token() {
        assert_eq!(parse_bearer("abc123"), "abc123");
    }
}
