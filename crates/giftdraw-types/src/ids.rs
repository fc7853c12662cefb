//! Identifiers used throughout giftdraw.
//!
//! Entity IDs use UUIDv7 for time-ordered lexicographic sorting.
//! [`AccessToken`] is the exception: it is a participant's only credential,
//! so it uses UUIDv4 (122 random bits) and carries no timestamp.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::{GiftdrawError, constants};

// ---------------------------------------------------------------------------
// ExchangeId
// ---------------------------------------------------------------------------

/// Unique identifier for one gift exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ExchangeId(pub Uuid);

impl ExchangeId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for ExchangeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ExchangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "exchange:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// ParticipantId
// ---------------------------------------------------------------------------

/// Unique identifier for a participant. Stable for the participant's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ParticipantId(pub Uuid);

impl ParticipantId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for ParticipantId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// AssignmentId
// ---------------------------------------------------------------------------

/// Unique identifier for a single giver → recipient record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct AssignmentId(pub Uuid);

impl AssignmentId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for AssignmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AssignmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// OrganizerId
// ---------------------------------------------------------------------------

/// Identity of the organizer who owns an exchange.
///
/// Passed explicitly into every ownership-checked operation; there is no
/// ambient "current caller".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct OrganizerId(pub Uuid);

impl OrganizerId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for OrganizerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrganizerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "organizer:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// AccessToken
// ---------------------------------------------------------------------------

/// Unguessable per-participant secret, the sole credential for looking up
/// one's own assignment.
///
/// `Debug` is redacted so tokens never end up in logs by accident.
/// `Display` prints the full token because organizers hand it out.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccessToken(Uuid);

impl AccessToken {
    /// Generate a fresh random token.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a token presented by a participant.
    ///
    /// # Errors
    /// Returns [`GiftdrawError::InvalidAccessToken`] if `raw` is not a
    /// well-formed token.
    pub fn parse(raw: &str) -> crate::Result<Self> {
        Ok(Self(Uuid::parse_str(raw.trim())?))
    }

    /// SHA-256 digest of the token, used as the lookup index key.
    #[must_use]
    pub fn digest(&self) -> TokenDigest {
        let mut hasher = Sha256::new();
        hasher.update(constants::TOKEN_DIGEST_DOMAIN);
        hasher.update(self.0.as_bytes());
        let hash = hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&hash);
        TokenDigest(out)
    }
}

impl FromStr for AccessToken {
    type Err = GiftdrawError;

    fn from_str(s: &str) -> crate::Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Domain-separated SHA-256 digest of an [`AccessToken`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenDigest(pub [u8; 32]);

impl TokenDigest {
    /// Short hex prefix, safe to log.
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for TokenDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn participant_id_uniqueness() {
        let a = ParticipantId::new();
        let b = ParticipantId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn exchange_id_ordering() {
        let a = ExchangeId::new();
        let b = ExchangeId::new();
        assert!(a < b);
    }

    #[test]
    fn access_tokens_are_unique() {
        let a = AccessToken::generate();
        let b = AccessToken::generate();
        assert_ne!(a, b);
        assert_ne!(a.digest(), b.digest());
    }

    #[test]
    fn access_token_parse_accepts_display_form() {
        let token = AccessToken::generate();
        let parsed = AccessToken::parse(&token.to_string()).unwrap();
        assert_eq!(token, parsed);

        let padded = format!("  {token}\n");
        assert_eq!(padded.parse::<AccessToken>().unwrap(), token);
    }

    #[test]
    fn access_token_parse_rejects_garbage() {
        for raw in ["", "not-a-token", "1234", "zzzzzzzz-zzzz-zzzz-zzzz-zzzzzzzzzzzz"] {
            let err = AccessToken::parse(raw).unwrap_err();
            assert!(
                matches!(err, GiftdrawError::InvalidAccessToken),
                "expected InvalidAccessToken for {raw:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn access_token_debug_is_redacted() {
        let token = AccessToken::generate();
        let dbg = format!("{token:?}");
        assert!(!dbg.contains(&token.to_string()));
        assert!(dbg.contains("redacted"));
    }

    #[test]
    fn token_digest_is_stable() {
        let token = AccessToken::generate();
        assert_eq!(token.digest(), token.digest());
        assert_eq!(token.digest().to_string().len(), 64);
        assert_eq!(token.digest().short().len(), 8);
    }

    #[test]
    fn exchange_id_display_prefix() {
        let id = ExchangeId::new();
        assert!(id.to_string().starts_with("exchange:"));
    }
}
