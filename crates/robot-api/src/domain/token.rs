//! The shared bearer secret.

use rand::rngs::OsRng;
use rand::RngCore;
use std::fmt;

/// Bytes of entropy in a generated token.
pub const TOKEN_ENTROPY_BYTES: usize = 32;

/// Length of a generated token once hex encoded.
pub const TOKEN_HEX_LEN: usize = TOKEN_ENTROPY_BYTES * 2;

/// Long-lived shared secret required from untrusted peers.
///
/// Immutable once loaded. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    /// Wrap an existing secret as-is. No format or strength checks.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Fresh token from the OS CSPRNG, rendered as lowercase hex.
    pub fn generate() -> Self {
        let mut bytes = [0u8; TOKEN_ENTROPY_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(<redacted>)")
    }
}

/// Constant-time string comparison.
///
/// Runs in time independent of how many leading bytes match, and does not
/// short-circuit on a length mismatch.
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    use subtle::ConstantTimeEq;

    let max_len = std::cmp::max(a.len(), b.len());

    // Different pad bytes guarantee a mismatch when lengths differ
    let mut a_padded = vec![0u8; max_len];
    let mut b_padded = vec![0xFFu8; max_len];

    a_padded[..a.len()].copy_from_slice(a.as_bytes());
    b_padded[..b.len()].copy_from_slice(b.as_bytes());

    let lengths_equal = a.len().ct_eq(&b.len());
    let contents_equal = a_padded.ct_eq(&b_padded);

    (lengths_equal & contents_equal).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_token_shape() {
        let token = ApiToken::generate();
        assert_eq!(token.as_str().len(), TOKEN_HEX_LEN);
        assert!(token
            .as_str()
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_generated_tokens_differ() {
        assert_ne!(ApiToken::generate(), ApiToken::generate());
    }

    #[test]
    fn test_debug_is_redacted() {
        let token = ApiToken::new("s3cr3t-value");
        assert!(!format!("{:?}", token).contains("s3cr3t"));
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("secret", "secret"));
        assert!(constant_time_compare("", ""));
        assert!(!constant_time_compare("secret", "Secret"));
        assert!(!constant_time_compare("secret", "secre"));
        assert!(!constant_time_compare("secret", "secrets"));
        assert!(!constant_time_compare("", "x"));
    }
}
