//! Error types for the OpenPool settlement engine.
//!
//! All errors use the `OP_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Lock errors
//! - 2xx: Ledger / settlement errors
//! - 3xx: Vault errors
//! - 9xx: General / internal errors
//!
//! Every error is unrecoverable within a session: it propagates
//! synchronously out through all enclosing `acquire` calls to the
//! original external caller, and the session's effects are discarded.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{Currency, LockIndex};

/// Central error enum for all OpenPool operations.
#[derive(Debug, Error)]
pub enum OpenpoolError {
    // =================================================================
    // Lock Errors (1xx)
    // =================================================================
    /// A settlement primitive was called while no lock is open.
    #[error("OP_ERR_100: No active lock: settlement primitives require an open session")]
    NoActiveLock,

    /// Re-entrant nesting exceeded the configured depth limit.
    #[error("OP_ERR_101: Lock depth exceeded: at depth {depth}, max {max}")]
    LockDepthExceeded { depth: usize, max: usize },

    /// Internal stack-consistency failure: a record that is not the
    /// current cursor was closed. Unreachable under correct manager
    /// logic, asserted anyway.
    #[error("OP_ERR_102: Invalid nesting: closed index {closed}, cursor was {cursor:?}")]
    InvalidNesting {
        closed: LockIndex,
        cursor: Option<LockIndex>,
    },

    // =================================================================
    // Ledger / Settlement Errors (2xx)
    // =================================================================
    /// The outermost release was attempted while some (participant,
    /// currency) delta is still non-zero.
    #[error("OP_ERR_200: Unsettled balance: {entries} non-zero delta entries at outermost release")]
    UnsettledBalance { entries: usize },

    // =================================================================
    // Vault Errors (3xx)
    // =================================================================
    /// `take` requested more than the pooled reserve holds.
    #[error("OP_ERR_300: Insufficient reserve of {currency}: requested {requested}, have {available}")]
    InsufficientReserve {
        currency: Currency,
        requested: Decimal,
        available: Decimal,
    },

    /// A participant paid in more than their external holdings.
    #[error("OP_ERR_301: Insufficient funds in {currency}: need {needed}, have {available}")]
    InsufficientFunds {
        currency: Currency,
        needed: Decimal,
        available: Decimal,
    },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("OP_ERR_900: Internal error: {0}")]
    Internal(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, OpenpoolError>;
