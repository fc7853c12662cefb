//! # giftdraw-derange
//!
//! **Pure derangement generator for giftdraw.**
//!
//! Given an ordered list of distinct identities, produce a random
//! giver → recipient bijection in which nobody maps to themselves.
//!
//! - **Zero side effects**: no storage, no clock, randomness is injected
//! - **Uniform by default**: [`rejection::generate`] rejects whole shuffles,
//!   never repairs them, so every derangement is equally likely
//! - **Bounded**: the attempt budget turns bad luck into a typed
//!   `DrawExhausted` error instead of an unbounded loop
//! - **Checked**: [`verify::verify_derangement`] re-validates any pairing
//!   before a caller persists it

pub mod circular;
pub mod rejection;
pub mod verify;

pub use circular::circular;
pub use rejection::{Attempt, generate, try_once};
pub use verify::verify_derangement;

use giftdraw_types::{DrawConfig, DrawStrategy, Result};
use rand::Rng;

/// Run the strategy selected by `config`.
///
/// # Errors
/// Propagates `DrawExhausted` from the rejection strategy.
pub fn derange<T, R>(ids: &[T], rng: &mut R, config: &DrawConfig) -> Result<Vec<(T, T)>>
where
    T: Clone + Eq,
    R: Rng + ?Sized,
{
    match config.strategy {
        DrawStrategy::Rejection => generate(ids, rng, config.max_draw_attempts),
        DrawStrategy::Circular => circular(ids, rng),
    }
}
