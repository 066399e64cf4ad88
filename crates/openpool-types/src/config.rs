//! Configuration types for the OpenPool settlement engine.

use serde::{Deserialize, Serialize};

use crate::constants;

/// Configuration for a single settlement engine instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum re-entrant nesting depth for lock sessions.
    pub max_lock_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_lock_depth: constants::DEFAULT_MAX_LOCK_DEPTH,
        }
    }
}
