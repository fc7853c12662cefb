//! Exchange model: metadata, lock state, and organizer-facing views.
//!
//! An exchange moves between two states:
//! **OPEN ⇄ LOCKED**
//!
//! While OPEN, participants and metadata may change and draws may run.
//! While LOCKED, the draw result is final and everything is read-only.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{ExchangeId, GiftdrawError, OrganizerId, ParticipantView, Result, constants};

/// Lifecycle state of an exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LockState {
    /// Mutable: participants, metadata, and draws are allowed.
    #[default]
    Open,
    /// Finalized: all mutations and draws are rejected.
    Locked,
}

impl LockState {
    #[must_use]
    pub fn from_locked(locked: bool) -> Self {
        if locked { Self::Locked } else { Self::Open }
    }

    #[must_use]
    pub fn is_locked(self) -> bool {
        self == Self::Locked
    }
}

impl fmt::Display for LockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::Locked => write!(f, "LOCKED"),
        }
    }
}

// ---------------------------------------------------------------------------
// ExchangeMetadata
// ---------------------------------------------------------------------------

/// Display metadata for an exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeMetadata {
    pub name: String,
    pub description: Option<String>,
    /// The date gifts are exchanged.
    pub target_date: NaiveDate,
    /// Suggested spend per gift.
    pub budget: Option<Decimal>,
}

impl ExchangeMetadata {
    #[must_use]
    pub fn new(name: impl Into<String>, target_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            description: None,
            target_date,
            budget: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_budget(mut self, budget: Decimal) -> Self {
        self.budget = Some(budget);
        self
    }

    /// Check field bounds.
    ///
    /// # Errors
    /// Returns [`GiftdrawError::InvalidInput`] on a blank or overlong name,
    /// an overlong description, or a negative budget.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(GiftdrawError::invalid_input("exchange name is required"));
        }
        if self.name.chars().count() > constants::MAX_NAME_LEN {
            return Err(GiftdrawError::invalid_input(format!(
                "exchange name exceeds {} characters",
                constants::MAX_NAME_LEN
            )));
        }
        if let Some(desc) = &self.description {
            if desc.chars().count() > constants::MAX_DESCRIPTION_LEN {
                return Err(GiftdrawError::invalid_input(format!(
                    "description exceeds {} characters",
                    constants::MAX_DESCRIPTION_LEN
                )));
            }
        }
        if let Some(budget) = self.budget {
            if budget < Decimal::ZERO {
                return Err(GiftdrawError::invalid_input("budget must not be negative"));
            }
        }
        Ok(())
    }
}

/// Partial metadata update. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub target_date: Option<NaiveDate>,
    pub budget: Option<Decimal>,
}

impl ExchangeUpdate {
    /// Produce the metadata that results from applying this update.
    ///
    /// # Errors
    /// Returns [`GiftdrawError::InvalidInput`] if the result fails validation.
    pub fn apply_to(&self, current: &ExchangeMetadata) -> Result<ExchangeMetadata> {
        let mut next = current.clone();
        if let Some(name) = &self.name {
            next.name.clone_from(name);
        }
        if let Some(desc) = &self.description {
            next.description = Some(desc.clone());
        }
        if let Some(date) = self.target_date {
            next.target_date = date;
        }
        if let Some(budget) = self.budget {
            next.budget = Some(budget);
        }
        next.validate()?;
        Ok(next)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.target_date.is_none()
            && self.budget.is_none()
    }
}

// ---------------------------------------------------------------------------
// Exchange
// ---------------------------------------------------------------------------

/// One gift exchange, owned by a single organizer.
///
/// Participants and assignments reference the exchange by [`ExchangeId`];
/// the exchange itself holds no links to them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exchange {
    pub id: ExchangeId,
    pub owner: OrganizerId,
    pub metadata: ExchangeMetadata,
    pub state: LockState,
    pub created_at: DateTime<Utc>,
}

impl Exchange {
    /// Create a new OPEN exchange.
    ///
    /// # Errors
    /// Returns [`GiftdrawError::InvalidInput`] if the metadata is invalid.
    pub fn new(owner: OrganizerId, metadata: ExchangeMetadata) -> Result<Self> {
        metadata.validate()?;
        Ok(Self {
            id: ExchangeId::new(),
            owner,
            metadata,
            state: LockState::Open,
            created_at: Utc::now(),
        })
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.state.is_locked()
    }

    #[must_use]
    pub fn is_owned_by(&self, organizer: OrganizerId) -> bool {
        self.owner == organizer
    }

    /// Guard for any mutation of the exchange or its participants.
    ///
    /// # Errors
    /// Returns [`GiftdrawError::ExchangeLocked`] while locked.
    pub fn ensure_mutable(&self) -> Result<()> {
        if self.is_locked() {
            Err(GiftdrawError::ExchangeLocked(self.id))
        } else {
            Ok(())
        }
    }
}

/// Organizer-facing summary of an exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeSummary {
    pub id: ExchangeId,
    pub owner: OrganizerId,
    pub metadata: ExchangeMetadata,
    pub locked: bool,
    pub participant_count: usize,
    pub drawn: bool,
    pub created_at: DateTime<Utc>,
}

impl ExchangeSummary {
    #[must_use]
    pub fn from_exchange(exchange: &Exchange, participant_count: usize, drawn: bool) -> Self {
        Self {
            id: exchange.id,
            owner: exchange.owner,
            metadata: exchange.metadata.clone(),
            locked: exchange.is_locked(),
            participant_count,
            drawn,
            created_at: exchange.created_at,
        }
    }
}

/// Organizer-facing detail view, including participants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeDetail {
    pub id: ExchangeId,
    pub owner: OrganizerId,
    pub metadata: ExchangeMetadata,
    pub locked: bool,
    pub participants: Vec<ParticipantView>,
    pub created_at: DateTime<Utc>,
}

/// Dummy metadata for testing. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl ExchangeMetadata {
    pub fn dummy() -> Self {
        Self::new(
            "Office party",
            NaiveDate::from_ymd_opt(2026, 12, 24).unwrap_or_default(),
        )
        .with_budget(Decimal::new(2500, 2))
    }
}
