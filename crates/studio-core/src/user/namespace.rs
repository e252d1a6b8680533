//! Storage namespace tokens.
//!
//! Every persisted key is prefixed by a short token derived from the display
//! name of the logged-in identity. The derivation is deterministic, so the same
//! name always lands in the same partition across sessions.
//!
//! The token is NOT collision-free: it keeps only the first
//! [`TOKEN_LENGTH`] characters of a lowercased base64 string, so two distinct
//! names can share a partition and therefore share data.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Token used when nobody is logged in.
pub const GUEST_TOKEN: &str = "guest";

/// Number of characters kept from the encoded display name.
pub const TOKEN_LENGTH: usize = 12;

/// Short string identifying one partition of persisted storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamespaceToken(String);

impl NamespaceToken {
    /// The shared partition used when no identity is active.
    pub fn guest() -> Self {
        Self(GUEST_TOKEN.to_string())
    }

    /// Derives the token for a display name.
    ///
    /// Base64 over the UTF-8 bytes of the name (what percent-encoding followed
    /// by byte reinterpretation yields), truncated and lowercased.
    pub fn derive(display_name: &str) -> Self {
        Self(encode_bytes(display_name.as_bytes()))
    }

    /// Derives the token from raw bytes of unknown provenance.
    ///
    /// Bytes that are not valid UTF-8 cannot be percent-encoded as text, so
    /// they fall back to [`rolling_hash_token`].
    pub fn derive_bytes(raw: &[u8]) -> Self {
        match std::str::from_utf8(raw) {
            Ok(name) => Self::derive(name),
            Err(_) => {
                tracing::debug!("Display name is not valid UTF-8, using hash token");
                Self(rolling_hash_token(raw))
            }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_guest(&self) -> bool {
        self.0 == GUEST_TOKEN
    }
}

impl fmt::Display for NamespaceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn encode_bytes(bytes: &[u8]) -> String {
    BASE64_STANDARD
        .encode(bytes)
        .chars()
        .take(TOKEN_LENGTH)
        .collect::<String>()
        .to_lowercase()
}

/// 32-bit polynomial rolling hash (`h = h * 31 + b`, wrapping) in base 36.
pub fn rolling_hash_token(bytes: &[u8]) -> String {
    let hash = bytes.iter().fold(0i32, |hash, &byte| {
        hash.wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(byte))
    });
    to_base36(hash.unsigned_abs())
}

fn to_base36(mut value: u32) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_name_same_token() {
        let first = NamespaceToken::derive("张伟");
        let second = NamespaceToken::derive("张伟");
        assert_eq!(first, second);
        assert_eq!(first.as_str(), "5byg5lyf");
    }

    #[test]
    fn test_token_is_truncated_and_lowercase() {
        let token = NamespaceToken::derive("A rather long display name");
        assert_eq!(token.as_str().chars().count(), TOKEN_LENGTH);
        assert_eq!(token.as_str(), token.as_str().to_lowercase());
    }

    #[test]
    fn test_distinct_names_can_collide() {
        // Only the first 12 base64 characters survive, i.e. the first 9 bytes.
        let a = NamespaceToken::derive("abcdefghi-alice");
        let b = NamespaceToken::derive("abcdefghi-bob");
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_utf8_uses_hash_fallback() {
        let token = NamespaceToken::derive_bytes(&[0xff, 0xfe, 0x41]);
        assert_eq!(token.as_str(), rolling_hash_token(&[0xff, 0xfe, 0x41]));
        assert!(token.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_valid_utf8_bytes_match_text_derivation() {
        assert_eq!(
            NamespaceToken::derive_bytes("Mei".as_bytes()),
            NamespaceToken::derive("Mei")
        );
    }

    #[test]
    fn test_rolling_hash_known_values() {
        assert_eq!(rolling_hash_token(b""), "0");
        // 'a' = 97 -> "2p" in base 36
        assert_eq!(rolling_hash_token(b"a"), "2p");
    }

    #[test]
    fn test_guest() {
        assert!(NamespaceToken::guest().is_guest());
        assert!(!NamespaceToken::derive("guest").is_guest());
    }
}
