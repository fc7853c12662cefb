//! Derangement verification.
//!
//! A pairing over `ids` is valid when:
//! - it has exactly `ids.len()` pairs
//! - every giver and every recipient is one of `ids`
//! - each identity gives exactly once and receives exactly once
//! - no identity is paired with itself

use std::{collections::HashSet, fmt::Debug, hash::Hash};

use giftdraw_types::{GiftdrawError, Result};

/// Check that `pairs` is a fixed-point-free bijection over `ids`.
///
/// # Errors
/// Returns `InvalidDerangement` naming the first violation found.
pub fn verify_derangement<T>(ids: &[T], pairs: &[(T, T)]) -> Result<()>
where
    T: Eq + Hash + Debug,
{
    if pairs.len() != ids.len() {
        return Err(invalid(format!(
            "expected {} pairs, got {}",
            ids.len(),
            pairs.len()
        )));
    }

    let known: HashSet<&T> = ids.iter().collect();
    let mut givers = HashSet::with_capacity(pairs.len());
    let mut recipients = HashSet::with_capacity(pairs.len());

    for (giver, recipient) in pairs {
        if giver == recipient {
            return Err(invalid(format!("{giver:?} is paired with itself")));
        }
        if !known.contains(giver) {
            return Err(invalid(format!("unknown giver {giver:?}")));
        }
        if !known.contains(recipient) {
            return Err(invalid(format!("unknown recipient {recipient:?}")));
        }
        if !givers.insert(giver) {
            return Err(invalid(format!("{giver:?} gives more than once")));
        }
        if !recipients.insert(recipient) {
            return Err(invalid(format!("{recipient:?} receives more than once")));
        }
    }

    Ok(())
}

fn invalid(reason: String) -> GiftdrawError {
    GiftdrawError::InvalidDerangement { reason }
}
