//! Storage ports consumed by the engine.
//!
//! Every method takes `&self`: implementations are shared between worker
//! threads and manage their own interior locking.

use giftdraw_types::{
    Assignment, Exchange, ExchangeId, ExchangeMetadata, LockState, OrganizerId, Participant,
    ParticipantId, Result, TokenDigest,
};

/// Exchange records: lock flag and ownership.
pub trait ExchangeStateStore {
    fn get_exchange(&self, id: ExchangeId) -> Result<Option<Exchange>>;

    /// # Errors
    /// `ExchangeNotFound` if the exchange does not exist.
    fn get_lock_state(&self, id: ExchangeId) -> Result<LockState>;

    /// # Errors
    /// `ExchangeNotFound` if the exchange does not exist.
    fn set_lock_state(&self, id: ExchangeId, state: LockState) -> Result<()>;

    /// `false` for a missing exchange.
    fn is_owned_by(&self, id: ExchangeId, owner: OrganizerId) -> Result<bool>;
}

/// Exchange create / update / delete.
pub trait ExchangeStore: ExchangeStateStore {
    fn insert_exchange(&self, exchange: Exchange) -> Result<()>;

    fn update_metadata(&self, id: ExchangeId, metadata: ExchangeMetadata) -> Result<()>;

    /// Delete the exchange together with its participants and assignments.
    fn delete_exchange(&self, id: ExchangeId) -> Result<()>;

    /// Exchanges owned by `owner`, newest first.
    fn list_by_owner(&self, owner: OrganizerId) -> Result<Vec<Exchange>>;
}

/// Read side of the participant registry.
pub trait ParticipantProvider {
    /// Participants of `exchange` in registration order. The order is
    /// stable between calls while the set is unchanged.
    fn list_participants(&self, exchange: ExchangeId) -> Result<Vec<Participant>>;

    fn count_participants(&self, exchange: ExchangeId) -> Result<usize> {
        Ok(self.list_participants(exchange)?.len())
    }
}

/// Write side of the participant registry.
pub trait ParticipantStore: ParticipantProvider {
    /// # Errors
    /// - `ExchangeNotFound` if the participant's exchange does not exist
    /// - `DuplicateContact` if the contact is already used in that exchange
    fn insert_participant(&self, participant: Participant) -> Result<()>;

    fn get_participant(&self, id: ParticipantId) -> Result<Option<Participant>>;

    /// Remove a participant. If the participant appears in the exchange's
    /// assignment set, the whole set is dropped with it: a set missing one
    /// person is no longer a bijection.
    ///
    /// # Errors
    /// `ParticipantNotFound` if no such participant exists.
    fn remove_participant(&self, id: ParticipantId) -> Result<Participant>;

    fn find_by_token(&self, digest: &TokenDigest) -> Result<Option<Participant>>;
}

/// Assignment sets. A set is only ever written or cleared whole.
pub trait AssignmentStore {
    /// Atomically replace every assignment of `exchange` with `assignments`.
    ///
    /// Readers observe either the old set or the new one, never a mix and
    /// never an empty gap. If validation fails nothing changes.
    ///
    /// # Errors
    /// - `ExchangeNotFound` if the exchange does not exist
    /// - `SelfAssignment` / `DuplicateGiver` on constraint violations
    /// - `InvalidDerangement` if a pair references a foreign participant
    fn replace_all(&self, exchange: ExchangeId, assignments: Vec<Assignment>) -> Result<()>;

    fn exists_any(&self, exchange: ExchangeId) -> Result<bool>;

    fn count_assignments(&self, exchange: ExchangeId) -> Result<usize>;

    fn list_assignments(&self, exchange: ExchangeId) -> Result<Vec<Assignment>>;

    /// The assignment whose giver holds the token with this digest.
    fn find_by_giver_token(&self, digest: &TokenDigest) -> Result<Option<Assignment>>;
}

/// Everything the engine needs from storage.
pub trait Store: ExchangeStore + ParticipantStore + AssignmentStore + Send + Sync {}

impl<T> Store for T where T: ExchangeStore + ParticipantStore + AssignmentStore + Send + Sync {}
