//! In-memory arena store.
//!
//! All collections sit behind a single `RwLock`, so every write (including
//! a cascading delete or a whole-set assignment replace) is one atomic step
//! for readers.

use std::{
    collections::{HashMap, HashSet},
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use giftdraw_types::{
    Assignment, Exchange, ExchangeId, ExchangeMetadata, GiftdrawError, LockState, OrganizerId,
    Participant, ParticipantId, Result, TokenDigest,
};
use tracing::{debug, info, warn};

use crate::ports::{
    AssignmentStore, ExchangeStateStore, ExchangeStore, ParticipantProvider, ParticipantStore,
};

#[derive(Default)]
struct Arenas {
    exchanges: HashMap<ExchangeId, Exchange>,
    participants: HashMap<ParticipantId, Participant>,
    /// Participant ids per exchange, in registration order.
    roster: HashMap<ExchangeId, Vec<ParticipantId>>,
    /// Token digest → participant.
    tokens: HashMap<TokenDigest, ParticipantId>,
    /// Assignment set per exchange. Absent or empty means "not drawn".
    assignments: HashMap<ExchangeId, Vec<Assignment>>,
}

impl Arenas {
    fn exchange_mut(&mut self, id: ExchangeId) -> Result<&mut Exchange> {
        self.exchanges
            .get_mut(&id)
            .ok_or(GiftdrawError::ExchangeNotFound(id))
    }

    fn roster_of(&self, id: ExchangeId) -> &[ParticipantId] {
        self.roster.get(&id).map(Vec::as_slice).unwrap_or_default()
    }
}

/// Check a candidate set against the roster of `exchange`.
fn check_set(exchange: ExchangeId, roster: &[ParticipantId], assignments: &[Assignment]) -> Result<()> {
    let members: HashSet<ParticipantId> = roster.iter().copied().collect();
    let mut givers = HashSet::with_capacity(assignments.len());
    for a in assignments {
        if a.exchange_id != exchange {
            return Err(GiftdrawError::InvalidDerangement {
                reason: format!("assignment {} belongs to {}", a.id, a.exchange_id),
            });
        }
        if a.giver == a.recipient {
            return Err(GiftdrawError::SelfAssignment(a.giver));
        }
        if !members.contains(&a.giver) || !members.contains(&a.recipient) {
            return Err(GiftdrawError::InvalidDerangement {
                reason: format!("assignment {} references a non-member", a.id),
            });
        }
        if !givers.insert(a.giver) {
            return Err(GiftdrawError::DuplicateGiver(a.giver));
        }
    }
    Ok(())
}

/// Thread-safe in-memory implementation of every storage port.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Arenas>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Arenas>> {
        Ok(self.inner.read()?)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Arenas>> {
        Ok(self.inner.write()?)
    }
}

// ---------------------------------------------------------------------------
// Exchanges
// ---------------------------------------------------------------------------

impl ExchangeStateStore for MemoryStore {
    fn get_exchange(&self, id: ExchangeId) -> Result<Option<Exchange>> {
        Ok(self.read()?.exchanges.get(&id).cloned())
    }

    fn get_lock_state(&self, id: ExchangeId) -> Result<LockState> {
        self.read()?
            .exchanges
            .get(&id)
            .map(|ex| ex.state)
            .ok_or(GiftdrawError::ExchangeNotFound(id))
    }

    fn set_lock_state(&self, id: ExchangeId, state: LockState) -> Result<()> {
        self.write()?.exchange_mut(id)?.state = state;
        Ok(())
    }

    fn is_owned_by(&self, id: ExchangeId, owner: OrganizerId) -> Result<bool> {
        Ok(self
            .read()?
            .exchanges
            .get(&id)
            .is_some_and(|ex| ex.is_owned_by(owner)))
    }
}

impl ExchangeStore for MemoryStore {
    fn insert_exchange(&self, exchange: Exchange) -> Result<()> {
        let mut arenas = self.write()?;
        if arenas.exchanges.contains_key(&exchange.id) {
            return Err(GiftdrawError::Internal(format!(
                "duplicate exchange id {}",
                exchange.id
            )));
        }
        arenas.roster.insert(exchange.id, Vec::new());
        arenas.exchanges.insert(exchange.id, exchange);
        Ok(())
    }

    fn update_metadata(&self, id: ExchangeId, metadata: ExchangeMetadata) -> Result<()> {
        self.write()?.exchange_mut(id)?.metadata = metadata;
        Ok(())
    }

    fn delete_exchange(&self, id: ExchangeId) -> Result<()> {
        let mut arenas = self.write()?;
        if arenas.exchanges.remove(&id).is_none() {
            return Err(GiftdrawError::ExchangeNotFound(id));
        }
        let pairs = arenas.assignments.remove(&id).as_ref().map_or(0, Vec::len);
        let roster = arenas.roster.remove(&id).unwrap_or_default();
        for pid in &roster {
            if let Some(p) = arenas.participants.remove(pid) {
                arenas.tokens.remove(&p.access_token.digest());
            }
        }
        info!(exchange = %id, participants = roster.len(), pairs, "Exchange removed with cascade");
        Ok(())
    }

    fn list_by_owner(&self, owner: OrganizerId) -> Result<Vec<Exchange>> {
        let mut owned: Vec<Exchange> = self
            .read()?
            .exchanges
            .values()
            .filter(|ex| ex.is_owned_by(owner))
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(owned)
    }
}

// ---------------------------------------------------------------------------
// Participants
// ---------------------------------------------------------------------------

impl ParticipantProvider for MemoryStore {
    fn list_participants(&self, exchange: ExchangeId) -> Result<Vec<Participant>> {
        let arenas = self.read()?;
        Ok(arenas
            .roster_of(exchange)
            .iter()
            .filter_map(|pid| arenas.participants.get(pid).cloned())
            .collect())
    }

    fn count_participants(&self, exchange: ExchangeId) -> Result<usize> {
        Ok(self.read()?.roster_of(exchange).len())
    }
}

impl ParticipantStore for MemoryStore {
    fn insert_participant(&self, participant: Participant) -> Result<()> {
        let mut arenas = self.write()?;
        let exchange = participant.exchange_id;
        if !arenas.exchanges.contains_key(&exchange) {
            return Err(GiftdrawError::ExchangeNotFound(exchange));
        }

        let key = participant.contact_key();
        let duplicate = arenas
            .roster_of(exchange)
            .iter()
            .filter_map(|pid| arenas.participants.get(pid))
            .any(|p| p.contact_key() == key);
        if duplicate {
            return Err(GiftdrawError::DuplicateContact {
                contact: participant.contact,
            });
        }

        let digest = participant.access_token.digest();
        if arenas.tokens.contains_key(&digest) {
            return Err(GiftdrawError::Internal(
                "access token collision".to_string(),
            ));
        }

        arenas.tokens.insert(digest, participant.id);
        arenas.roster.entry(exchange).or_default().push(participant.id);
        arenas.participants.insert(participant.id, participant);
        Ok(())
    }

    fn get_participant(&self, id: ParticipantId) -> Result<Option<Participant>> {
        Ok(self.read()?.participants.get(&id).cloned())
    }

    fn remove_participant(&self, id: ParticipantId) -> Result<Participant> {
        let mut arenas = self.write()?;
        let participant = arenas
            .participants
            .remove(&id)
            .ok_or(GiftdrawError::ParticipantNotFound(id))?;
        let exchange = participant.exchange_id;

        arenas.tokens.remove(&participant.access_token.digest());
        if let Some(roster) = arenas.roster.get_mut(&exchange) {
            roster.retain(|pid| *pid != id);
        }

        let referenced = arenas
            .assignments
            .get(&exchange)
            .is_some_and(|set| set.iter().any(|a| a.giver == id || a.recipient == id));
        if referenced {
            arenas.assignments.remove(&exchange);
            info!(exchange = %exchange, participant = %id, "Assignment set dropped with participant");
        }
        Ok(participant)
    }

    fn find_by_token(&self, digest: &TokenDigest) -> Result<Option<Participant>> {
        let arenas = self.read()?;
        Ok(arenas
            .tokens
            .get(digest)
            .and_then(|pid| arenas.participants.get(pid))
            .cloned())
    }
}

// ---------------------------------------------------------------------------
// Assignments
// ---------------------------------------------------------------------------

impl AssignmentStore for MemoryStore {
    fn replace_all(&self, exchange: ExchangeId, assignments: Vec<Assignment>) -> Result<()> {
        let mut arenas = self.write()?;
        if !arenas.exchanges.contains_key(&exchange) {
            return Err(GiftdrawError::ExchangeNotFound(exchange));
        }

        // Validate everything before touching the existing set.
        check_set(exchange, arenas.roster_of(exchange), &assignments).inspect_err(|err| {
            warn!(exchange = %exchange, pairs = assignments.len(), error = %err, "Assignment set rejected");
        })?;

        if assignments.is_empty() {
            arenas.assignments.remove(&exchange);
        } else {
            debug!(exchange = %exchange, pairs = assignments.len(), "Assignment set stored");
            arenas.assignments.insert(exchange, assignments);
        }
        Ok(())
    }

    fn exists_any(&self, exchange: ExchangeId) -> Result<bool> {
        Ok(self
            .read()?
            .assignments
            .get(&exchange)
            .is_some_and(|set| !set.is_empty()))
    }

    fn count_assignments(&self, exchange: ExchangeId) -> Result<usize> {
        Ok(self.read()?.assignments.get(&exchange).map_or(0, Vec::len))
    }

    fn list_assignments(&self, exchange: ExchangeId) -> Result<Vec<Assignment>> {
        Ok(self
            .read()?
            .assignments
            .get(&exchange)
            .cloned()
            .unwrap_or_default())
    }

    fn find_by_giver_token(&self, digest: &TokenDigest) -> Result<Option<Assignment>> {
        let arenas = self.read()?;
        let Some(participant) = arenas
            .tokens
            .get(digest)
            .and_then(|pid| arenas.participants.get(pid))
        else {
            return Ok(None);
        };
        Ok(arenas
            .assignments
            .get(&participant.exchange_id)
            .and_then(|set| set.iter().find(|a| a.giver == participant.id))
            .cloned())
    }
}
