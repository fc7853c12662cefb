//! Participant registry operations.
//!
//! Adding and removing participants is only allowed while the exchange is
//! open. Removing someone who is part of a drawn set invalidates the whole
//! set; the organizer has to draw again.

use giftdraw_registry::Store;
use giftdraw_types::{
    ExchangeId, GiftdrawError, OrganizerId, Participant, ParticipantId, ParticipantView, Result,
};
use tracing::{info, warn};

use crate::engine::GiftExchangeEngine;

impl<S: Store> GiftExchangeEngine<S> {
    /// Register a participant and issue their access token.
    ///
    /// # Errors
    /// - `ExchangeNotFound` if the exchange is missing or foreign
    /// - `ExchangeLocked` while locked
    /// - `InvalidInput` on a bad name or contact
    /// - `DuplicateContact` if the contact is already registered here
    pub fn add_participant(
        &self,
        caller: OrganizerId,
        exchange_id: ExchangeId,
        name: impl Into<String>,
        contact: impl Into<String>,
    ) -> Result<ParticipantView> {
        let participant = Participant::new(exchange_id, name, contact)?;
        self.serialized(exchange_id, || {
            let exchange = self.owned_exchange(caller, exchange_id)?;
            exchange.ensure_mutable()?;

            self.store.insert_participant(participant.clone())?;
            info!(
                exchange = %exchange_id,
                participant = %participant.id,
                token = %participant.access_token.digest().short(),
                "Participant added"
            );
            Ok(ParticipantView::from_participant(&participant, false))
        })
    }

    /// Participants of an exchange in registration order.
    ///
    /// # Errors
    /// `ExchangeNotFound` if the exchange is missing or foreign.
    pub fn list_participants(
        &self,
        caller: OrganizerId,
        exchange_id: ExchangeId,
    ) -> Result<Vec<ParticipantView>> {
        self.owned_exchange(caller, exchange_id)?;
        self.participant_views(exchange_id)
    }

    /// Remove a participant from an open exchange.
    ///
    /// # Errors
    /// - `ParticipantNotFound` if no such participant exists
    /// - `NotOwner` if `caller` does not own the participant's exchange
    /// - `ExchangeLocked` while locked
    pub fn remove_participant(&self, caller: OrganizerId, participant_id: ParticipantId) -> Result<()> {
        let exchange_id = self
            .store
            .get_participant(participant_id)?
            .ok_or(GiftdrawError::ParticipantNotFound(participant_id))?
            .exchange_id;

        self.serialized(exchange_id, || {
            let exchange = self
                .store
                .get_exchange(exchange_id)?
                .ok_or(GiftdrawError::ParticipantNotFound(participant_id))?;
            if !exchange.is_owned_by(caller) {
                return Err(GiftdrawError::NotOwner);
            }
            exchange.ensure_mutable()?;

            let was_drawn = self.store.exists_any(exchange_id)?;
            self.store.remove_participant(participant_id)?;
            info!(exchange = %exchange_id, participant = %participant_id, "Participant removed");

            if was_drawn && !self.store.exists_any(exchange_id)? {
                warn!(exchange = %exchange_id, "Assignment set dropped; draw again");
            }
            Ok(())
        })
        .map_err(|err| match err {
            GiftdrawError::ExchangeNotFound(_) => GiftdrawError::ParticipantNotFound(participant_id),
            other => other,
        })
    }
}

#[cfg(test)]
mod tests {
    use giftdraw_registry::{AssignmentStore, MemoryStore};
    use giftdraw_types::ExchangeMetadata;

    use super::*;

    fn setup() -> (GiftExchangeEngine<MemoryStore>, OrganizerId, ExchangeId) {
        let engine = GiftExchangeEngine::with_defaults(MemoryStore::new());
        let owner = OrganizerId::new();
        let exchange = engine
            .create_exchange(owner, ExchangeMetadata::dummy())
            .unwrap()
            .id;
        (engine, owner, exchange)
    }

    fn add(engine: &GiftExchangeEngine<MemoryStore>, owner: OrganizerId, exchange: ExchangeId, name: &str) -> ParticipantView {
        engine
            .add_participant(owner, exchange, name, format!("{}@example.com", name.to_lowercase()))
            .unwrap()
    }

    #[test]
    fn add_issues_distinct_tokens() {
        let (engine, owner, exchange) = setup();
        let a = add(&engine, owner, exchange, "Alice");
        let b = add(&engine, owner, exchange, "Bob");
        assert_ne!(a.access_token, b.access_token);
        assert!(!a.has_assignment);

        let listed = engine.list_participants(owner, exchange).unwrap();
        let names: Vec<&str> = listed.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Alice", "Bob"]);
    }

    #[test]
    fn add_rejects_duplicate_contact() {
        let (engine, owner, exchange) = setup();
        add(&engine, owner, exchange, "Alice");
        let err = engine
            .add_participant(owner, exchange, "Alice Two", "  ALICE@example.com ")
            .unwrap_err();
        assert!(matches!(err, GiftdrawError::DuplicateContact { .. }));
    }

    #[test]
    fn add_to_foreign_exchange_fails() {
        let (engine, _, exchange) = setup();
        let err = engine
            .add_participant(OrganizerId::new(), exchange, "Mallory", "m@example.com")
            .unwrap_err();
        assert!(matches!(err, GiftdrawError::ExchangeNotFound(_)));
    }

    #[test]
    fn add_blocked_while_locked() {
        let (engine, owner, exchange) = setup();
        for name in ["Alice", "Bob", "Carol"] {
            add(&engine, owner, exchange, name);
        }
        engine.perform_draw(owner, exchange, false).unwrap();
        engine.set_locked(owner, exchange, true).unwrap();

        let err = engine
            .add_participant(owner, exchange, "Dave", "dave@example.com")
            .unwrap_err();
        assert!(matches!(err, GiftdrawError::ExchangeLocked(_)));
    }

    #[test]
    fn late_joiner_has_no_assignment_until_redraw() {
        let (engine, owner, exchange) = setup();
        for name in ["Alice", "Bob", "Carol"] {
            add(&engine, owner, exchange, name);
        }
        engine.perform_draw(owner, exchange, false).unwrap();
        let dave = add(&engine, owner, exchange, "Dave");

        assert!(!engine.has_assignment(&dave.access_token.to_string()).unwrap());
        assert_eq!(engine.store().count_assignments(exchange).unwrap(), 3);

        engine.perform_draw(owner, exchange, true).unwrap();
        assert!(engine.has_assignment(&dave.access_token.to_string()).unwrap());
    }

    #[test]
    fn remove_from_drawn_exchange_drops_set() {
        let (engine, owner, exchange) = setup();
        let people: Vec<_> = ["Alice", "Bob", "Carol", "Dave"]
            .iter()
            .map(|n| add(&engine, owner, exchange, n))
            .collect();
        engine.perform_draw(owner, exchange, false).unwrap();

        engine.remove_participant(owner, people[0].id).unwrap();
        assert!(!engine.store().exists_any(exchange).unwrap());
        assert_eq!(engine.list_participants(owner, exchange).unwrap().len(), 3);
    }

    #[test]
    fn remove_checks_ownership_and_lock() {
        let (engine, owner, exchange) = setup();
        let people: Vec<_> = ["Alice", "Bob", "Carol"]
            .iter()
            .map(|n| add(&engine, owner, exchange, n))
            .collect();

        let err = engine
            .remove_participant(OrganizerId::new(), people[0].id)
            .unwrap_err();
        assert!(matches!(err, GiftdrawError::NotOwner));

        engine.perform_draw(owner, exchange, false).unwrap();
        engine.set_locked(owner, exchange, true).unwrap();
        let err = engine.remove_participant(owner, people[0].id).unwrap_err();
        assert!(matches!(err, GiftdrawError::ExchangeLocked(_)));
        assert_eq!(engine.store().count_assignments(exchange).unwrap(), 3);
    }

    #[test]
    fn remove_unknown_participant() {
        let (engine, owner, _) = setup();
        let err = engine
            .remove_participant(owner, ParticipantId::new())
            .unwrap_err();
        assert!(matches!(err, GiftdrawError::ParticipantNotFound(_)));
    }
}
