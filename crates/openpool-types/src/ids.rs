//! Identifiers used throughout OpenPool.
//!
//! Participants are identified by UUIDv7 for time-ordered lexicographic
//! sorting; currencies by their plain symbol string.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// ParticipantId
// ---------------------------------------------------------------------------

/// Unique identifier for a settlement participant (a locker).
///
/// A participant is anything that can own a lock session: a pool operator,
/// a router, a liquidity provider, a test harness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ParticipantId(pub Uuid);

impl ParticipantId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    #[must_use]
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }
}

impl Default for ParticipantId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Currency
// ---------------------------------------------------------------------------

/// Type alias for currency symbols (e.g., "ETH", "USDC", "DAI").
pub type Currency = String;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
