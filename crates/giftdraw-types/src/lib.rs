//! # giftdraw-types
//!
//! Shared types, errors, and configuration for the **giftdraw** gift
//! exchange engine.
//!
//! This crate is the leaf dependency of the workspace: every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`ExchangeId`], [`ParticipantId`], [`AssignmentId`], [`OrganizerId`], [`AccessToken`]
//! - **Exchange model**: [`Exchange`], [`ExchangeMetadata`], [`ExchangeUpdate`], [`LockState`]
//! - **Participant model**: [`Participant`], [`ParticipantView`]
//! - **Assignment model**: [`Assignment`], [`AssignmentView`], [`DrawOutcome`], [`LockOutcome`]
//! - **Configuration**: [`EngineConfig`], [`DrawConfig`], [`DrawStrategy`]
//! - **Errors**: [`GiftdrawError`] with `GD_ERR_` prefix codes
//! - **Constants**: draw limits and field length bounds

pub mod assignment;
pub mod config;
pub mod constants;
pub mod error;
pub mod exchange;
pub mod ids;
pub mod participant;

// Re-export all primary types at crate root for ergonomic imports:
//   use giftdraw_types::{Exchange, Participant, Assignment, ...};

pub use assignment::*;
pub use config::*;
pub use error::*;
pub use exchange::*;
pub use ids::*;
pub use participant::*;

// Constants are accessed via `giftdraw_types::constants::FOO`
// (not re-exported to avoid name collisions).
