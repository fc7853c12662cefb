//! Rejection-sampled derangement.
//!
//! Each attempt:
//! 1. Copies the identities into `givers` (fixed) and `recipients`
//! 2. Fisher–Yates shuffles `recipients`
//! 3. Rejects the whole shuffle if any `givers[i] == recipients[i]`
//!
//! A rejected shuffle is discarded whole, never patched, so every
//! derangement is equally likely.
//!
//! For N ≥ 3 an attempt fails with probability ≈ 1/e. Exhausting the
//! default budget of 100 attempts is vanishingly rare but still reported
//! as `DrawExhausted`.

use giftdraw_types::{GiftdrawError, Result};
use rand::{Rng, seq::SliceRandom};

/// Outcome of a single shuffle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt<T> {
    /// The shuffle had no fixed point.
    Accepted(Vec<(T, T)>),
    /// The shuffle mapped the identity at `index` to itself.
    Rejected { index: usize },
}

/// Perform one shuffle-and-check attempt.
pub fn try_once<T, R>(ids: &[T], rng: &mut R) -> Attempt<T>
where
    T: Clone + Eq,
    R: Rng + ?Sized,
{
    let givers = ids;
    let mut recipients = ids.to_vec();
    recipients.shuffle(rng);

    if let Some(index) = givers.iter().zip(&recipients).position(|(g, r)| g == r) {
        return Attempt::Rejected { index };
    }

    Attempt::Accepted(givers.iter().cloned().zip(recipients).collect())
}

/// Generate a uniformly random derangement of `ids`.
///
/// Returns `(giver, recipient)` pairs in `ids` order. An empty input
/// yields an empty mapping.
///
/// # Errors
/// - `InvalidDerangement` if `ids` has exactly one element (no derangement exists)
/// - `DrawExhausted` if `max_attempts` shuffles all had a fixed point
pub fn generate<T, R>(ids: &[T], rng: &mut R, max_attempts: u32) -> Result<Vec<(T, T)>>
where
    T: Clone + Eq,
    R: Rng + ?Sized,
{
    match ids.len() {
        0 => return Ok(Vec::new()),
        1 => {
            return Err(GiftdrawError::InvalidDerangement {
                reason: "a single identity cannot be deranged".to_string(),
            });
        }
        _ => {}
    }

    for attempt in 1..=max_attempts {
        match try_once(ids, rng) {
            Attempt::Accepted(pairs) => {
                tracing::debug!(n = ids.len(), attempts = attempt, "Derangement accepted");
                return Ok(pairs);
            }
            Attempt::Rejected { index } => {
                tracing::trace!(attempt, index, "Shuffle rejected: fixed point");
            }
        }
    }

    tracing::warn!(
        n = ids.len(),
        max_attempts,
        "Derangement attempts exhausted"
    );
    Err(GiftdrawError::DrawExhausted {
        attempts: max_attempts,
    })
}
