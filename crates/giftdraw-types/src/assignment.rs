//! Assignment model and the views built from it.
//!
//! An assignment is one (giver → recipient) pair scoped to an exchange.
//! Assignments are only created by a draw, always as a complete set, and
//! never updated in place.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AssignmentId, Exchange, ExchangeId, GiftdrawError, Participant, ParticipantId, Result};

/// One giver → recipient record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: AssignmentId,
    pub exchange_id: ExchangeId,
    pub giver: ParticipantId,
    pub recipient: ParticipantId,
    pub assigned_at: DateTime<Utc>,
}

impl Assignment {
    /// Create an assignment, refusing self-assignment.
    ///
    /// # Errors
    /// Returns [`GiftdrawError::SelfAssignment`] if `giver == recipient`.
    pub fn new(
        exchange_id: ExchangeId,
        giver: ParticipantId,
        recipient: ParticipantId,
        assigned_at: DateTime<Utc>,
    ) -> Result<Self> {
        if giver == recipient {
            return Err(GiftdrawError::SelfAssignment(giver));
        }
        Ok(Self {
            id: AssignmentId::new(),
            exchange_id,
            giver,
            recipient,
            assigned_at,
        })
    }
}

// ---------------------------------------------------------------------------
// AssignmentView: what a participant sees through their token
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiverInfo {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientInfo {
    pub name: String,
    pub contact: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeInfo {
    pub name: String,
    pub target_date: NaiveDate,
    pub budget: Option<Decimal>,
    pub description: Option<String>,
}

/// A participant's own outgoing assignment, and nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentView {
    pub giver: GiverInfo,
    pub recipient: RecipientInfo,
    pub exchange: ExchangeInfo,
    pub message: String,
}

impl AssignmentView {
    #[must_use]
    pub fn new(giver: &Participant, recipient: &Participant, exchange: &Exchange) -> Self {
        Self {
            giver: GiverInfo {
                name: giver.name.clone(),
            },
            recipient: RecipientInfo {
                name: recipient.name.clone(),
                contact: recipient.contact.clone(),
            },
            exchange: ExchangeInfo {
                name: exchange.metadata.name.clone(),
                target_date: exchange.metadata.target_date,
                budget: exchange.metadata.budget,
                description: exchange.metadata.description.clone(),
            },
            message: format!("You are the secret gift giver for {}!", recipient.name),
        }
    }
}

// ---------------------------------------------------------------------------
// Operation outcomes
// ---------------------------------------------------------------------------

/// Result of a successful draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawOutcome {
    pub exchange_id: ExchangeId,
    pub assignment_count: usize,
    pub drawn_at: DateTime<Utc>,
    pub message: String,
}

/// Result of a lock / unlock request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockOutcome {
    pub exchange_id: ExchangeId,
    pub locked: bool,
    pub message: String,
}

impl LockOutcome {
    #[must_use]
    pub fn new(exchange_id: ExchangeId, locked: bool) -> Self {
        let message = if locked {
            "Exchange locked successfully"
        } else {
            "Exchange unlocked successfully"
        };
        Self {
            exchange_id,
            locked,
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ExchangeMetadata, OrganizerId};

    #[test]
    fn self_assignment_rejected() {
        let p = ParticipantId::new();
        let err = Assignment::new(ExchangeId::new(), p, p, Utc::now()).unwrap_err();
        assert!(matches!(err, GiftdrawError::SelfAssignment(id) if id == p));
    }

    #[test]
    fn distinct_pair_accepted() {
        let ex = ExchangeId::new();
        let (a, b) = (ParticipantId::new(), ParticipantId::new());
        let asg = Assignment::new(ex, a, b, Utc::now()).unwrap();
        assert_eq!(asg.giver, a);
        assert_eq!(asg.recipient, b);
        assert_eq!(asg.exchange_id, ex);
    }

    #[test]
    fn view_reveals_only_the_pair() {
        let exchange = Exchange::new(OrganizerId::new(), ExchangeMetadata::dummy()).unwrap();
        let alice = Participant::dummy(exchange.id, "Alice");
        let bob = Participant::dummy(exchange.id, "Bob");
        let view = AssignmentView::new(&alice, &bob, &exchange);

        assert_eq!(view.giver.name, "Alice");
        assert_eq!(view.recipient.name, "Bob");
        assert_eq!(view.recipient.contact, "bob@example.com");
        assert_eq!(view.exchange.name, "Office party");
        assert!(view.message.contains("Bob"));

        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains(&alice.access_token.to_string()));
        assert!(!json.contains(&bob.access_token.to_string()));
    }

    #[test]
    fn lock_outcome_message() {
        let ex = ExchangeId::new();
        assert!(LockOutcome::new(ex, true).message.contains("locked"));
        assert!(LockOutcome::new(ex, false).message.contains("unlocked"));
    }
}
