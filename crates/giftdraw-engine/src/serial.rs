//! Per-exchange serialization.
//!
//! Each exchange gets its own mutex, created on first use. Work on one
//! exchange runs one-at-a-time; work on different exchanges only shares
//! the brief lookup of the slot map.
//!
//! The registry does not know which ids exist. The engine only asks for
//! slots of stored exchanges and forgets them on delete.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use giftdraw_types::{ExchangeId, Result};

/// Single-writer guard keyed by exchange identity.
#[derive(Default)]
pub struct ExchangeLocks {
    slots: Mutex<HashMap<ExchangeId, Arc<Mutex<()>>>>,
}

impl ExchangeLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, id: ExchangeId) -> Result<Arc<Mutex<()>>> {
        let mut slots = self.slots.lock()?;
        Ok(Arc::clone(slots.entry(id).or_default()))
    }

    /// Run `f` while holding the guard for `id`.
    ///
    /// # Errors
    /// Returns `Internal` if a guard was poisoned, otherwise whatever `f`
    /// returns.
    pub fn serialize<T>(&self, id: ExchangeId, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let slot = self.slot(id)?;
        let _guard = slot.lock()?;
        f()
    }

    /// Drop the slot for a deleted exchange.
    ///
    /// Exchange ids are never reused, so a caller still waiting on the old
    /// slot simply finds the exchange gone.
    pub fn forget(&self, id: ExchangeId) -> Result<()> {
        self.slots.lock()?.remove(&id);
        Ok(())
    }

    /// Number of exchanges with a live slot.
    pub fn len(&self) -> Result<usize> {
        Ok(self.slots.lock()?.len())
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{
            Barrier,
            atomic::{AtomicUsize, Ordering},
        },
        thread,
        time::Duration,
    };

    use super::*;

    #[test]
    fn same_exchange_never_overlaps() {
        let locks = ExchangeLocks::new();
        let id = ExchangeId::new();
        let active = AtomicUsize::new(0);
        let max_seen = AtomicUsize::new(0);

        thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    for _ in 0..20 {
                        locks
                            .serialize(id, || {
                                let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                                max_seen.fetch_max(now, Ordering::SeqCst);
                                thread::sleep(Duration::from_micros(200));
                                active.fetch_sub(1, Ordering::SeqCst);
                                Ok(())
                            })
                            .unwrap();
                    }
                });
            }
        });

        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn different_exchanges_run_concurrently() {
        let locks = ExchangeLocks::new();
        let barrier = Barrier::new(2);
        let (a, b) = (ExchangeId::new(), ExchangeId::new());

        // Both closures must be inside their guards at the same time for
        // the barrier to release.
        thread::scope(|s| {
            for id in [a, b] {
                let locks = &locks;
                let barrier = &barrier;
                s.spawn(move || {
                    locks
                        .serialize(id, || {
                            barrier.wait();
                            Ok(())
                        })
                        .unwrap();
                });
            }
        });
        assert_eq!(locks.len().unwrap(), 2);
    }

    #[test]
    fn serialize_passes_through_result() {
        let locks = ExchangeLocks::new();
        let id = ExchangeId::new();
        assert_eq!(locks.serialize(id, || Ok(42)).unwrap(), 42);
        let err = locks
            .serialize::<()>(id, || Err(giftdraw_types::GiftdrawError::AlreadyDrawn))
            .unwrap_err();
        assert!(matches!(err, giftdraw_types::GiftdrawError::AlreadyDrawn));
    }

    #[test]
    fn forget_removes_slot() {
        let locks = ExchangeLocks::new();
        let id = ExchangeId::new();
        locks.serialize(id, || Ok(())).unwrap();
        assert_eq!(locks.len().unwrap(), 1);
        locks.forget(id).unwrap();
        assert_eq!(locks.len().unwrap(), 0);
    }
}
