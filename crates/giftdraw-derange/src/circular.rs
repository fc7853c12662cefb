//! Circular draw: shuffle once, everyone gives to the next person.
//!
//! Never exhausts, but the result is always a single N-cycle. Mappings
//! made of smaller cycles (e.g. two swapped pairs) can never appear, so
//! this is not uniform over derangements. Selected only through
//! `DrawStrategy::Circular`.

use giftdraw_types::{GiftdrawError, Result};
use rand::{Rng, seq::SliceRandom};

/// Build a single-cycle derangement of `ids`.
///
/// Pairs are returned in shuffled circle order, not input order.
///
/// # Errors
/// Returns `InvalidDerangement` if `ids` has exactly one element.
pub fn circular<T, R>(ids: &[T], rng: &mut R) -> Result<Vec<(T, T)>>
where
    T: Clone + Eq,
    R: Rng + ?Sized,
{
    if ids.len() == 1 {
        return Err(GiftdrawError::InvalidDerangement {
            reason: "a single identity cannot be deranged".to_string(),
        });
    }

    let mut circle = ids.to_vec();
    circle.shuffle(rng);

    let successors = circle.iter().cycle().skip(1);
    let pairs = circle
        .iter()
        .zip(successors)
        .map(|(giver, recipient)| (giver.clone(), recipient.clone()))
        .collect();

    tracing::debug!(n = ids.len(), "Circular draw built");
    Ok(pairs)
}
