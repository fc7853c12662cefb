//! Exchange registry operations.

use std::collections::HashSet;

use giftdraw_registry::Store;
use giftdraw_types::{
    Exchange, ExchangeDetail, ExchangeId, ExchangeMetadata, ExchangeSummary, ExchangeUpdate,
    GiftdrawError, OrganizerId, ParticipantId, ParticipantView, Result,
};
use tracing::{debug, info};

use crate::engine::GiftExchangeEngine;

impl<S: Store> GiftExchangeEngine<S> {
    /// Create a new, open exchange owned by `caller`.
    ///
    /// # Errors
    /// `InvalidInput` if the metadata fails validation.
    pub fn create_exchange(
        &self,
        caller: OrganizerId,
        metadata: ExchangeMetadata,
    ) -> Result<ExchangeSummary> {
        let exchange = Exchange::new(caller, metadata)?;
        self.store.insert_exchange(exchange.clone())?;
        info!(exchange = %exchange.id, owner = %caller, "Exchange created");
        Ok(ExchangeSummary::from_exchange(&exchange, 0, false))
    }

    /// Apply a partial metadata update.
    ///
    /// # Errors
    /// - `ExchangeNotFound` if the exchange is missing or foreign
    /// - `ExchangeLocked` while locked
    /// - `InvalidInput` if the update is empty or the result is invalid
    pub fn update_exchange(
        &self,
        caller: OrganizerId,
        exchange_id: ExchangeId,
        update: &ExchangeUpdate,
    ) -> Result<ExchangeSummary> {
        if update.is_empty() {
            return Err(GiftdrawError::invalid_input("no fields to update"));
        }
        self.serialized(exchange_id, || {
            let mut exchange = self.owned_exchange(caller, exchange_id)?;
            exchange.ensure_mutable()?;

            exchange.metadata = update.apply_to(&exchange.metadata)?;
            self.store
                .update_metadata(exchange_id, exchange.metadata.clone())?;
            debug!(exchange = %exchange_id, "Exchange metadata updated");
            self.summarize(&exchange)
        })
    }

    /// Full organizer view of one exchange.
    ///
    /// # Errors
    /// `ExchangeNotFound` if the exchange is missing or foreign.
    pub fn exchange_detail(
        &self,
        caller: OrganizerId,
        exchange_id: ExchangeId,
    ) -> Result<ExchangeDetail> {
        let exchange = self.owned_exchange(caller, exchange_id)?;
        let participants = self.participant_views(exchange_id)?;
        Ok(ExchangeDetail {
            id: exchange.id,
            owner: exchange.owner,
            locked: exchange.is_locked(),
            metadata: exchange.metadata,
            participants,
            created_at: exchange.created_at,
        })
    }

    /// Exchanges owned by `caller`, newest first.
    pub fn list_exchanges(&self, caller: OrganizerId) -> Result<Vec<ExchangeSummary>> {
        self.store
            .list_by_owner(caller)?
            .iter()
            .map(|exchange| self.summarize(exchange))
            .collect()
    }

    fn summarize(&self, exchange: &Exchange) -> Result<ExchangeSummary> {
        Ok(ExchangeSummary::from_exchange(
            exchange,
            self.store.count_participants(exchange.id)?,
            self.store.exists_any(exchange.id)?,
        ))
    }

    pub(crate) fn participant_views(&self, exchange_id: ExchangeId) -> Result<Vec<ParticipantView>> {
        let givers: HashSet<ParticipantId> = self
            .store
            .list_assignments(exchange_id)?
            .iter()
            .map(|a| a.giver)
            .collect();
        Ok(self
            .store
            .list_participants(exchange_id)?
            .iter()
            .map(|p| ParticipantView::from_participant(p, givers.contains(&p.id)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use giftdraw_registry::MemoryStore;

    use super::*;

    fn engine() -> GiftExchangeEngine<MemoryStore> {
        GiftExchangeEngine::with_defaults(MemoryStore::new())
    }

    #[test]
    fn create_starts_open_and_empty() {
        let engine = engine();
        let owner = OrganizerId::new();
        let summary = engine
            .create_exchange(owner, ExchangeMetadata::dummy())
            .unwrap();
        assert_eq!(summary.owner, owner);
        assert!(!summary.locked);
        assert!(!summary.drawn);
        assert_eq!(summary.participant_count, 0);
    }

    #[test]
    fn create_rejects_blank_name() {
        let engine = engine();
        let mut meta = ExchangeMetadata::dummy();
        meta.name = "   ".to_string();
        let err = engine.create_exchange(OrganizerId::new(), meta).unwrap_err();
        assert!(matches!(err, GiftdrawError::InvalidInput { .. }));
    }

    #[test]
    fn list_is_scoped_to_owner_newest_first() {
        let engine = engine();
        let (alice, bob) = (OrganizerId::new(), OrganizerId::new());
        let first = engine
            .create_exchange(alice, ExchangeMetadata::dummy())
            .unwrap();
        let second = engine
            .create_exchange(alice, ExchangeMetadata::new("Family", NaiveDate::MAX))
            .unwrap();
        engine
            .create_exchange(bob, ExchangeMetadata::dummy())
            .unwrap();

        let listed: Vec<ExchangeId> = engine
            .list_exchanges(alice)
            .unwrap()
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(listed, vec![second.id, first.id]);
        assert_eq!(engine.list_exchanges(bob).unwrap().len(), 1);
        assert!(engine.list_exchanges(OrganizerId::new()).unwrap().is_empty());
    }

    #[test]
    fn update_changes_only_given_fields() {
        let engine = engine();
        let owner = OrganizerId::new();
        let id = engine
            .create_exchange(owner, ExchangeMetadata::dummy())
            .unwrap()
            .id;

        let update = ExchangeUpdate {
            name: Some("Winter swap".to_string()),
            ..ExchangeUpdate::default()
        };
        let summary = engine.update_exchange(owner, id, &update).unwrap();
        assert_eq!(summary.metadata.name, "Winter swap");
        assert_eq!(
            summary.metadata.budget,
            ExchangeMetadata::dummy().budget
        );
    }

    #[test]
    fn update_rejects_empty_patch() {
        let engine = engine();
        let owner = OrganizerId::new();
        let id = engine
            .create_exchange(owner, ExchangeMetadata::dummy())
            .unwrap()
            .id;
        let err = engine
            .update_exchange(owner, id, &ExchangeUpdate::default())
            .unwrap_err();
        assert!(matches!(err, GiftdrawError::InvalidInput { .. }));
    }

    #[test]
    fn update_blocked_while_locked() {
        let engine = engine();
        let owner = OrganizerId::new();
        let id = engine
            .create_exchange(owner, ExchangeMetadata::dummy())
            .unwrap()
            .id;
        for name in ["Alice", "Bob", "Carol"] {
            engine
                .add_participant(owner, id, name, format!("{name}@example.com"))
                .unwrap();
        }
        engine.perform_draw(owner, id, false).unwrap();
        engine.set_locked(owner, id, true).unwrap();

        let update = ExchangeUpdate {
            description: Some("late change".to_string()),
            ..ExchangeUpdate::default()
        };
        let err = engine.update_exchange(owner, id, &update).unwrap_err();
        assert!(matches!(err, GiftdrawError::ExchangeLocked(_)));
    }

    #[test]
    fn detail_marks_drawn_participants() {
        let engine = engine();
        let owner = OrganizerId::new();
        let id = engine
            .create_exchange(owner, ExchangeMetadata::dummy())
            .unwrap()
            .id;
        for name in ["Alice", "Bob", "Carol"] {
            engine
                .add_participant(owner, id, name, format!("{name}@example.com"))
                .unwrap();
        }

        let detail = engine.exchange_detail(owner, id).unwrap();
        assert_eq!(detail.participants.len(), 3);
        assert!(detail.participants.iter().all(|p| !p.has_assignment));

        engine.perform_draw(owner, id, false).unwrap();
        let detail = engine.exchange_detail(owner, id).unwrap();
        assert!(detail.participants.iter().all(|p| p.has_assignment));
        assert_eq!(detail.participants[0].name, "Alice");

        let err = engine.exchange_detail(OrganizerId::new(), id).unwrap_err();
        assert!(matches!(err, GiftdrawError::ExchangeNotFound(_)));
    }
}
