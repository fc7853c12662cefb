//! Token-based assignment lookup.
//!
//! A participant's access token is the only credential needed to read
//! that participant's own assignment. Nothing else is reachable through
//! it, and an unknown token is indistinguishable from a known one whose
//! exchange has not been drawn yet.

use giftdraw_registry::Store;
use giftdraw_types::{AccessToken, AssignmentView, GiftdrawError, Result};
use tracing::debug;

use crate::engine::GiftExchangeEngine;

impl<S: Store> GiftExchangeEngine<S> {
    /// Resolve an access token to the holder's assignment.
    ///
    /// Read-only; needs no exchange guard since assignment sets are
    /// replaced atomically.
    ///
    /// # Errors
    /// - `InvalidAccessToken` if `token` is not a well-formed token
    /// - `AssignmentNotFound` if the token is unknown or no draw has
    ///   been performed for its exchange
    pub fn resolve_assignment(&self, token: &str) -> Result<AssignmentView> {
        let digest = AccessToken::parse(token)?.digest();

        let assignment = self
            .store
            .find_by_giver_token(&digest)?
            .ok_or(GiftdrawError::AssignmentNotFound)?;

        // A concurrent delete can remove the records between reads; treat
        // that the same as a missing assignment.
        let giver = self
            .store
            .get_participant(assignment.giver)?
            .ok_or(GiftdrawError::AssignmentNotFound)?;
        let recipient = self
            .store
            .get_participant(assignment.recipient)?
            .ok_or(GiftdrawError::AssignmentNotFound)?;
        let exchange = self
            .store
            .get_exchange(assignment.exchange_id)?
            .ok_or(GiftdrawError::AssignmentNotFound)?;

        debug!(token = %digest.short(), exchange = %exchange.id, "Assignment resolved");
        Ok(AssignmentView::new(&giver, &recipient, &exchange))
    }

    /// Whether the token's holder has an assignment.
    ///
    /// # Errors
    /// `InvalidAccessToken` if `token` is malformed.
    pub fn has_assignment(&self, token: &str) -> Result<bool> {
        let digest = AccessToken::parse(token)?.digest();
        Ok(self.store.find_by_giver_token(&digest)?.is_some())
    }
}
