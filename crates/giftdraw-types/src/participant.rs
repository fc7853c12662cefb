//! Participant model.
//!
//! A participant belongs to exactly one exchange and is immutable after
//! creation. Its [`AccessToken`] is minted once, here, and never reused.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AccessToken, ExchangeId, GiftdrawError, ParticipantId, Result, constants};

/// A person taking part in one exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub exchange_id: ExchangeId,
    pub name: String,
    /// Contact address (email). Unique within the exchange, compared
    /// case-insensitively.
    pub contact: String,
    pub access_token: AccessToken,
    pub created_at: DateTime<Utc>,
}

impl Participant {
    /// Register a new participant with a freshly generated access token.
    ///
    /// # Errors
    /// Returns [`GiftdrawError::InvalidInput`] on a blank or overlong name
    /// or contact, or a contact that is not an address.
    pub fn new(
        exchange_id: ExchangeId,
        name: impl Into<String>,
        contact: impl Into<String>,
    ) -> Result<Self> {
        let name = name.into().trim().to_string();
        let contact = contact.into().trim().to_string();
        validate_name(&name)?;
        validate_contact(&contact)?;
        Ok(Self {
            id: ParticipantId::new(),
            exchange_id,
            name,
            contact,
            access_token: AccessToken::generate(),
            created_at: Utc::now(),
        })
    }

    /// Normalized contact key for uniqueness checks.
    #[must_use]
    pub fn contact_key(&self) -> String {
        normalize_contact(&self.contact)
    }
}

/// Normalize a contact address for duplicate detection.
#[must_use]
pub fn normalize_contact(contact: &str) -> String {
    contact.trim().to_lowercase()
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(GiftdrawError::invalid_input("participant name is required"));
    }
    if name.chars().count() > constants::MAX_NAME_LEN {
        return Err(GiftdrawError::invalid_input(format!(
            "participant name exceeds {} characters",
            constants::MAX_NAME_LEN
        )));
    }
    Ok(())
}

fn validate_contact(contact: &str) -> Result<()> {
    if contact.is_empty() {
        return Err(GiftdrawError::invalid_input("contact is required"));
    }
    if contact.chars().count() > constants::MAX_CONTACT_LEN {
        return Err(GiftdrawError::invalid_input(format!(
            "contact exceeds {} characters",
            constants::MAX_CONTACT_LEN
        )));
    }
    match contact.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(GiftdrawError::invalid_input(format!(
            "contact is not a valid address: {contact}"
        ))),
    }
}

/// Organizer-facing view of a participant.
///
/// Includes the access token so the organizer can deliver it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantView {
    pub id: ParticipantId,
    pub exchange_id: ExchangeId,
    pub name: String,
    pub contact: String,
    pub access_token: AccessToken,
    pub has_assignment: bool,
    pub created_at: DateTime<Utc>,
}

impl ParticipantView {
    #[must_use]
    pub fn from_participant(participant: &Participant, has_assignment: bool) -> Self {
        Self {
            id: participant.id,
            exchange_id: participant.exchange_id,
            name: participant.name.clone(),
            contact: participant.contact.clone(),
            access_token: participant.access_token,
            has_assignment,
            created_at: participant.created_at,
        }
    }
}

/// Dummy participant for testing. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl Participant {
    /// Create a participant named `name` with a derived contact address.
    pub fn dummy(exchange_id: ExchangeId, name: &str) -> Self {
        Self {
            id: ParticipantId::new(),
            exchange_id,
            name: name.to_string(),
            contact: format!("{}@example.com", name.to_lowercase()),
            access_token: AccessToken::generate(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_participant_trims_fields() {
        let p = Participant::new(ExchangeId::new(), "  Alice ", " alice@example.com ").unwrap();
        assert_eq!(p.name, "Alice");
        assert_eq!(p.contact, "alice@example.com");
    }

    #[test]
    fn each_participant_gets_own_token() {
        let ex = ExchangeId::new();
        let a = Participant::new(ex, "Alice", "alice@example.com").unwrap();
        let b = Participant::new(ex, "Bob", "bob@example.com").unwrap();
        assert_ne!(a.access_token, b.access_token);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn rejects_blank_name() {
        let err = Participant::new(ExchangeId::new(), "  ", "a@example.com").unwrap_err();
        assert!(matches!(err, GiftdrawError::InvalidInput { .. }));
    }

    #[test]
    fn rejects_bad_contact() {
        for contact in ["", "no-at-sign", "@example.com", "alice@"] {
            let err = Participant::new(ExchangeId::new(), "Alice", contact).unwrap_err();
            assert!(
                matches!(err, GiftdrawError::InvalidInput { .. }),
                "contact {contact:?} should be rejected"
            );
        }
    }

    #[test]
    fn contact_key_is_case_insensitive() {
        let ex = ExchangeId::new();
        let a = Participant::new(ex, "Alice", "Alice@Example.com").unwrap();
        assert_eq!(a.contact_key(), normalize_contact(" alice@example.COM "));
    }

    #[test]
    fn view_carries_assignment_flag() {
        let p = Participant::dummy(ExchangeId::new(), "Carol");
        let view = ParticipantView::from_participant(&p, true);
        assert!(view.has_assignment);
        assert_eq!(view.access_token, p.access_token);
        assert_eq!(view.contact, "carol@example.com");
    }
}
