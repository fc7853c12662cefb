//! Exchange lifecycle: OPEN ⇄ LOCKED and the delete guard.
//!
//! ```text
//!            lock (needs assignments)
//!   OPEN ─────────────────────────────► LOCKED
//!    ▲                                    │
//!    └──────────── unlock (always) ───────┘
//! ```
//!
//! The transition rules are pure functions so they can be checked without
//! a store; the engine methods apply them under the exchange guard.

use giftdraw_registry::Store;
use giftdraw_types::{ExchangeId, GiftdrawError, LockOutcome, LockState, OrganizerId, Result};
use tracing::{info, warn};

use crate::engine::GiftExchangeEngine;

/// Check whether an exchange may move to `desired`.
///
/// Locking requires a drawn assignment set; unlocking is always allowed.
/// Requesting the current state is a no-op, not an error.
///
/// # Errors
/// `NoDrawPerformed` when locking an exchange without assignments.
pub fn check_lock_transition(desired: LockState, has_assignments: bool) -> Result<()> {
    match desired {
        LockState::Locked if !has_assignments => Err(GiftdrawError::NoDrawPerformed),
        LockState::Locked | LockState::Open => Ok(()),
    }
}

/// Check whether an exchange may be deleted.
///
/// # Errors
/// `LockedWithAssignments` if the exchange is locked and drawn.
pub fn check_delete(state: LockState, has_assignments: bool) -> Result<()> {
    if state.is_locked() && has_assignments {
        return Err(GiftdrawError::LockedWithAssignments);
    }
    Ok(())
}

impl<S: Store> GiftExchangeEngine<S> {
    /// Lock or unlock an exchange.
    ///
    /// # Errors
    /// - `ExchangeNotFound` if the exchange is missing or foreign
    /// - `NoDrawPerformed` when locking before a draw
    pub fn set_locked(
        &self,
        caller: OrganizerId,
        exchange_id: ExchangeId,
        locked: bool,
    ) -> Result<LockOutcome> {
        self.serialized(exchange_id, || {
            let exchange = self.owned_exchange(caller, exchange_id)?;
            let desired = LockState::from_locked(locked);
            let has_assignments = self.store.exists_any(exchange_id)?;

            check_lock_transition(desired, has_assignments).inspect_err(|_| {
                warn!(exchange = %exchange_id, "Lock refused: no draw performed");
            })?;

            if exchange.state != desired {
                self.store.set_lock_state(exchange_id, desired)?;
                info!(exchange = %exchange_id, from = %exchange.state, to = %desired, "Exchange lock state changed");
            }

            Ok(LockOutcome::new(exchange_id, locked))
        })
    }

    /// Delete an exchange with its participants and assignments.
    ///
    /// # Errors
    /// - `ExchangeNotFound` if the exchange is missing or foreign
    /// - `LockedWithAssignments` if the exchange is locked and drawn
    pub fn delete_exchange(&self, caller: OrganizerId, exchange_id: ExchangeId) -> Result<()> {
        self.serialized(exchange_id, || {
            let exchange = self.owned_exchange(caller, exchange_id)?;
            let has_assignments = self.store.exists_any(exchange_id)?;
            check_delete(exchange.state, has_assignments)?;

            self.store.delete_exchange(exchange_id)?;
            info!(exchange = %exchange_id, drawn = has_assignments, "Exchange deleted");
            Ok(())
        })?;
        self.locks.forget(exchange_id)
    }
}
