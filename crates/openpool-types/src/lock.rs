//! Lock records — the immutable audit trail of settlement sessions.
//!
//! Every `acquire` call appends one [`LockRecord`] to the lock history.
//! Records are never mutated or removed after creation: the full nesting
//! tree of a manager's lifetime stays auditable as a flat sequence with
//! back-references from each record to its parent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ParticipantId;

/// Position of a lock record in the append-only history.
pub type LockIndex = usize;

/// One entry in the lock history.
///
/// `parent` is the index of the record that was active when this one was
/// opened — `0` for an outermost lock. Two sibling sessions nested under
/// the same ancestor record the *same* parent index, not each other, so
/// the nesting tree can be reconstructed from the flat sequence alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockRecord {
    /// The participant that opened this session.
    pub owner: ParticipantId,
    /// Index of the enclosing session's record (0 for outermost locks).
    pub parent: LockIndex,
    /// When the session was opened.
    pub opened_at: DateTime<Utc>,
}

impl LockRecord {
    /// Create a record stamped with the current time.
    #[must_use]
    pub fn new(owner: ParticipantId, parent: LockIndex) -> Self {
        Self {
            owner,
            parent,
            opened_at: Utc::now(),
        }
    }
}
