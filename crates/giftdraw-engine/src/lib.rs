//! # giftdraw-engine
//!
//! **Draw engine**: turns a registered set of participants into a secret
//! gift assignment and guards it afterwards.
//!
//! ## Architecture
//!
//! [`GiftExchangeEngine`] sits on top of any [`Store`](giftdraw_registry::Store):
//! 1. **Registry operations**: exchange and participant CRUD, rejected while locked
//! 2. **Draw orchestration**: precondition checks, derangement, atomic replace
//! 3. **Lifecycle**: OPEN ⇄ LOCKED transitions and the delete guard
//! 4. **Lookup**: access token → the holder's own assignment, nothing more
//!
//! ## Serialization
//!
//! Every state transition on one exchange runs under that exchange's
//! guard in [`ExchangeLocks`], so a check and the write that depends on it
//! can never interleave with another writer. Different exchanges never
//! wait on each other.
//!
//! ```text
//! add_participant* → perform_draw → set_locked(true) → resolve_assignment*
//! ```

pub mod draw;
pub mod engine;
pub mod exchanges;
pub mod lifecycle;
pub mod lookup;
pub mod participants;
pub mod serial;

pub use engine::GiftExchangeEngine;
pub use lifecycle::{check_delete, check_lock_transition};
pub use serial::ExchangeLocks;
