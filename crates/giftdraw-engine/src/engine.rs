//! The engine facade shared by every operation module.

use giftdraw_registry::Store;
use giftdraw_types::{
    DrawConfig, EngineConfig, Exchange, ExchangeId, GiftdrawError, OrganizerId, Result, constants,
};
use tracing::info;

use crate::serial::ExchangeLocks;

/// Gift exchange engine over a storage backend.
///
/// Operations live in sibling modules (`draw`, `lifecycle`, `lookup`,
/// `exchanges`, `participants`); this type only owns the shared state.
/// It is `Send + Sync` whenever the store is, and is meant to be shared
/// behind an `Arc`.
pub struct GiftExchangeEngine<S> {
    pub(crate) store: S,
    pub(crate) config: DrawConfig,
    pub(crate) locks: ExchangeLocks,
}

impl<S: Store> GiftExchangeEngine<S> {
    /// Create an engine with a validated configuration.
    ///
    /// # Errors
    /// Returns `Configuration` if `config` is out of range.
    pub fn new(store: S, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        info!(
            engine = constants::ENGINE_NAME,
            version = constants::VERSION,
            strategy = %config.draw.strategy,
            min_participants = config.draw.min_participants,
            max_draw_attempts = config.draw.max_draw_attempts,
            "Engine configured"
        );
        Ok(Self {
            store,
            config: config.draw,
            locks: ExchangeLocks::new(),
        })
    }

    /// Create an engine with the default draw policy.
    pub fn with_defaults(store: S) -> Self {
        Self {
            store,
            config: DrawConfig::default(),
            locks: ExchangeLocks::new(),
        }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn config(&self) -> &DrawConfig {
        &self.config
    }

    /// Run `f` under the guard of an existing exchange.
    ///
    /// No guard slot is created for an id the store does not know, and a
    /// slot is dropped again if the exchange is gone once `f` fails (for
    /// example after a concurrent delete). Slots therefore never outlive
    /// their exchange.
    pub(crate) fn serialized<T>(
        &self,
        exchange_id: ExchangeId,
        f: impl FnOnce() -> Result<T>,
    ) -> Result<T> {
        if self.store.get_exchange(exchange_id)?.is_none() {
            return Err(GiftdrawError::ExchangeNotFound(exchange_id));
        }
        let result = self.locks.serialize(exchange_id, f);
        if result.is_err() && self.store.get_exchange(exchange_id)?.is_none() {
            self.locks.forget(exchange_id)?;
        }
        result
    }

    /// Load an exchange the caller owns.
    ///
    /// A foreign exchange is reported exactly like a missing one so ids
    /// cannot be enumerated.
    pub(crate) fn owned_exchange(&self, caller: OrganizerId, id: ExchangeId) -> Result<Exchange> {
        self.store
            .get_exchange(id)?
            .filter(|ex| ex.is_owned_by(caller))
            .ok_or(GiftdrawError::ExchangeNotFound(id))
    }
}
