//! # openpool-types
//!
//! Shared types, errors, and configuration for the **OpenPool** settlement
//! engine.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`ParticipantId`], [`Currency`]
//! - **Lock model**: [`LockRecord`], [`LockIndex`]
//! - **Configuration**: [`EngineConfig`]
//! - **Errors**: [`OpenpoolError`] with `OP_ERR_` prefix codes
//! - **Constants**: system-wide limits and defaults

pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod lock;

// Re-export all primary types at crate root for ergonomic imports:
//   use openpool_types::{ParticipantId, LockRecord, OpenpoolError, ...};

pub use config::*;
pub use error::*;
pub use ids::*;
pub use lock::*;

// Constants are accessed via `openpool_types::constants::FOO`
// (not re-exported to avoid name collisions).
