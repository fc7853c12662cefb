//! Configuration types for the draw engine.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{GiftdrawError, Result, constants};

/// Algorithm used to produce the giver → recipient bijection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawStrategy {
    /// Shuffle recipients and reject any shuffle with a fixed point.
    /// Uniform over all derangements.
    #[default]
    Rejection,
    /// Shuffle once and give to the next person in the circle.
    /// Always a single cycle; never exhausts.
    Circular,
}

impl fmt::Display for DrawStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejection => write!(f, "rejection"),
            Self::Circular => write!(f, "circular"),
        }
    }
}

/// Draw policy knobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawConfig {
    /// Shuffle attempts before giving up with `DrawExhausted`.
    pub max_draw_attempts: u32,
    /// Minimum participant count for a draw. May be raised, never lowered
    /// below [`constants::MIN_PARTICIPANTS`].
    pub min_participants: usize,
    pub strategy: DrawStrategy,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            max_draw_attempts: constants::DEFAULT_MAX_DRAW_ATTEMPTS,
            min_participants: constants::MIN_PARTICIPANTS,
            strategy: DrawStrategy::default(),
        }
    }
}

impl DrawConfig {
    /// # Errors
    /// Returns [`GiftdrawError::Configuration`] for a zero attempt budget or
    /// a participant minimum below [`constants::MIN_PARTICIPANTS`].
    pub fn validate(&self) -> Result<()> {
        if self.max_draw_attempts == 0 {
            return Err(GiftdrawError::Configuration(
                "max_draw_attempts must be > 0".to_string(),
            ));
        }
        if self.min_participants < constants::MIN_PARTICIPANTS {
            return Err(GiftdrawError::Configuration(format!(
                "min_participants must be >= {}, got {}",
                constants::MIN_PARTICIPANTS,
                self.min_participants
            )));
        }
        Ok(())
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub draw: DrawConfig,
}

impl EngineConfig {
    /// Parse and validate a JSON config document. Missing fields take
    /// their defaults.
    ///
    /// # Errors
    /// Returns [`GiftdrawError::Configuration`] on malformed JSON or
    /// out-of-range values.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// # Errors
    /// See [`DrawConfig::validate`].
    pub fn validate(&self) -> Result<()> {
        self.draw.validate()
    }
}
