//! System-wide constants for the giftdraw engine.

/// Minimum number of participants before a draw may run.
///
/// Two participants would always produce the same forced swap.
pub const MIN_PARTICIPANTS: usize = 3;

/// Default number of shuffle attempts before a draw gives up.
pub const DEFAULT_MAX_DRAW_ATTEMPTS: u32 = 100;

/// Maximum length of an exchange or participant name (characters).
pub const MAX_NAME_LEN: usize = 100;

/// Maximum length of an exchange description (characters).
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// Maximum length of a participant contact address (characters).
pub const MAX_CONTACT_LEN: usize = 255;

/// Domain separator for access token digests.
pub const TOKEN_DIGEST_DOMAIN: &[u8] = b"giftdraw:access_token:v1:";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "giftdraw";
