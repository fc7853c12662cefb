//! Draw orchestration.
//!
//! ```text
//! guard(exchange) ─► owned? ─► open? ─► drawn && !redraw? ─► ≥ min?
//!                                                               │
//!         replace_all ◄── verify ◄── derange(snapshot ids) ◄────┘
//! ```
//!
//! Preconditions are checked in this exact order and the first failure
//! wins. The previous set (if any) stays in place until the new one is
//! fully generated, then the two are swapped in one store call.

use chrono::Utc;
use giftdraw_derange::{derange, verify_derangement};
use giftdraw_registry::Store;
use giftdraw_types::{
    Assignment, DrawOutcome, ExchangeId, GiftdrawError, OrganizerId, ParticipantId, Result,
};
use rand::Rng;
use tracing::{debug, info, warn};

use crate::engine::GiftExchangeEngine;

impl<S: Store> GiftExchangeEngine<S> {
    /// Draw (or redraw) the assignment set of an exchange.
    ///
    /// # Errors
    /// - `ExchangeNotFound` if the exchange is missing or not owned by `caller`
    /// - `ExchangeLocked` if the exchange is locked
    /// - `AlreadyDrawn` if a set exists and `allow_redraw` is false
    /// - `InsufficientParticipants` below the configured minimum
    /// - `DrawExhausted` if the attempt cap was reached; nothing changed
    pub fn perform_draw(
        &self,
        caller: OrganizerId,
        exchange_id: ExchangeId,
        allow_redraw: bool,
    ) -> Result<DrawOutcome> {
        self.perform_draw_with_rng(caller, exchange_id, allow_redraw, &mut rand::thread_rng())
    }

    /// [`perform_draw`](Self::perform_draw) with a caller-supplied RNG.
    ///
    /// # Errors
    /// Same as [`perform_draw`](Self::perform_draw).
    pub fn perform_draw_with_rng<R: Rng + ?Sized>(
        &self,
        caller: OrganizerId,
        exchange_id: ExchangeId,
        allow_redraw: bool,
        rng: &mut R,
    ) -> Result<DrawOutcome> {
        self.serialized(exchange_id, || {
            let exchange = self.owned_exchange(caller, exchange_id)?;
            exchange.ensure_mutable()?;

            let redraw = self.store.exists_any(exchange_id)?;
            if redraw && !allow_redraw {
                return Err(GiftdrawError::AlreadyDrawn);
            }

            let participants = self.store.list_participants(exchange_id)?;
            if participants.len() < self.config.min_participants {
                return Err(GiftdrawError::InsufficientParticipants {
                    required: self.config.min_participants,
                    actual: participants.len(),
                });
            }

            let ids: Vec<ParticipantId> = participants.iter().map(|p| p.id).collect();
            let pairs = derange(&ids, rng, &self.config).inspect_err(|err| {
                warn!(
                    exchange = %exchange_id,
                    participants = ids.len(),
                    error = %err,
                    "Draw failed; existing assignments kept"
                );
            })?;
            verify_derangement(&ids, &pairs)?;

            let drawn_at = Utc::now();
            let assignments = pairs
                .into_iter()
                .map(|(giver, recipient)| Assignment::new(exchange_id, giver, recipient, drawn_at))
                .collect::<Result<Vec<_>>>()?;
            let assignment_count = assignments.len();

            self.store.replace_all(exchange_id, assignments)?;

            debug!(exchange = %exchange_id, strategy = %self.config.strategy, "Assignment set replaced");
            info!(
                exchange = %exchange_id,
                participants = assignment_count,
                redraw,
                "Gift draw completed"
            );

            Ok(DrawOutcome {
                exchange_id,
                assignment_count,
                drawn_at,
                message: "Gift draw completed successfully".to_string(),
            })
        })
    }
}
