//! # giftdraw-registry
//!
//! **Participant registry and storage plane**: the ports the draw engine
//! consumes, plus an in-memory arena implementation.
//!
//! ## Architecture
//!
//! Exchanges, participants, and assignments live in independent
//! collections keyed by id. Children refer to their exchange by
//! [`ExchangeId`](giftdraw_types::ExchangeId); nothing holds a pointer
//! back to its owner.
//!
//! 1. **ExchangeStateStore / ExchangeStore**: exchange records, lock flag, ownership
//! 2. **ParticipantProvider / ParticipantStore**: ordered participant sets, token index
//! 3. **AssignmentStore**: whole-set atomic replace, giver lookup
//! 4. **MemoryStore**: all of the above behind one `RwLock`
//!
//! A store enforces data invariants (unique contact per exchange, unique
//! giver per exchange, no self-assignment). Lifecycle rules such as the
//! lock guard belong to the engine.

pub mod memory;
pub mod ports;

pub use memory::MemoryStore;
pub use ports::{
    AssignmentStore, ExchangeStateStore, ExchangeStore, ParticipantProvider, ParticipantStore,
    Store,
};
