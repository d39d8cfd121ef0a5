/// Session tokens and cookie signatures
///
/// # Format
///
/// ```text
/// cookie value = <token>.<signature>
/// token        = 64 hex chars (32 random bytes from the OS RNG)
/// signature    = hex(HMAC-SHA256(secret, token))
/// stored hash  = hex(SHA-256(token))
/// ```
///
/// The signature lets the server reject forged or truncated cookies without a
/// database round trip. Only the SHA-256 of the token is persisted.

use hmac::{Hmac, Mac};
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Random bytes per token
const TOKEN_BYTES: usize = 32;

/// Hex length of a token
pub const TOKEN_LENGTH: usize = TOKEN_BYTES * 2;

/// Hex length of a signature
const SIGNATURE_LENGTH: usize = 64;

/// Generates a new random session token
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// SHA-256 of a token, hex encoded, as stored in the sessions table
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

fn mac(secret: &str, token: &str) -> HmacSha256 {
    // HMAC accepts keys of any length
    let mut mac = <HmacSha256 as Mac>::new_from_slice(secret.as_bytes())
        .unwrap_or_else(|_| unreachable!("HMAC-SHA256 accepts any key length"));
    mac.update(token.as_bytes());
    mac
}

/// Builds the signed cookie value for `token`
pub fn sign(token: &str, secret: &str) -> String {
    let signature = hex::encode(mac(secret, token).finalize().into_bytes());
    format!("{}.{}", token, signature)
}

/// Verifies a signed cookie value and returns the embedded token
///
/// Returns `None` for anything malformed or signed with another secret. The
/// signature comparison is constant time.
///
/// # Example
///
/// ```
/// use ticklist_shared::auth::token::{generate_token, sign, verify};
///
/// let token = generate_token();
/// let cookie = sign(&token, "a-secret-key-that-is-long-enough!");
///
/// assert_eq!(verify(&cookie, "a-secret-key-that-is-long-enough!"), Some(token.as_str()));
/// assert_eq!(verify(&cookie, "some-other-secret-key-entirely!!!"), None);
/// ```
pub fn verify<'a>(value: &'a str, secret: &str) -> Option<&'a str> {
    let (token, signature) = value.split_once('.')?;

    if token.len() != TOKEN_LENGTH || signature.len() != SIGNATURE_LENGTH {
        return None;
    }

    if !token.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let signature = hex::decode(signature).ok()?;
    mac(secret, token).verify_slice(&signature).ok()?;

    Some(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_generate_token_shape() {
        let token = generate_token();
        assert_eq!(token.len(), TOKEN_LENGTH);
        assert!(token.bytes().all(|b| b.is_ascii_hexdigit()));
        assert_ne!(token, generate_token());
    }

    #[test]
    fn test_hash_token_is_deterministic() {
        let token = generate_token();
        assert_eq!(hash_token(&token), hash_token(&token));
        assert_eq!(hash_token(&token).len(), 64);
        assert_ne!(hash_token(&token), token);
    }

    #[test]
    fn test_sign_and_verify() {
        let token = generate_token();
        let value = sign(&token, SECRET);

        assert_eq!(verify(&value, SECRET), Some(token.as_str()));
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let token = generate_token();
        let value = sign(&token, SECRET);

        assert_eq!(verify(&value, "another-secret-key-at-least-32-bytes"), None);
    }

    #[test]
    fn test_verify_rejects_tampered_token() {
        let token = generate_token();
        let value = sign(&token, SECRET);
        let (_, signature) = value.split_once('.').unwrap();

        let forged = format!("{}.{}", generate_token(), signature);
        assert_eq!(verify(&forged, SECRET), None);
    }

    #[test]
    fn test_verify_rejects_malformed_values() {
        let token = generate_token();

        assert_eq!(verify("", SECRET), None);
        assert_eq!(verify(&token, SECRET), None);
        assert_eq!(verify(&format!("{}.", token), SECRET), None);
        assert_eq!(verify(&format!("{}.{}", token, "zz".repeat(32)), SECRET), None);
        assert_eq!(verify("not.a-session", SECRET), None);
    }
}
