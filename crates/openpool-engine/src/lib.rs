//! # openpool-engine
//!
//! The nested-lock accounting engine at the core of OpenPool: a call
//! stack of re-entrant settlement sessions over shared currency
//! reserves, with a hard guarantee that no session returns control past
//! its outermost lock while any participant holds an unreconciled
//! balance delta.
//!
//! ## Architecture
//!
//! - [`LockStack`] — append-only history of lock records with an
//!   active-session cursor; the audit trail of nesting.
//! - [`CurrencyLedger`] — signed per-(participant, currency) deltas plus
//!   the non-zero entry counter that gates the outermost release.
//! - [`LockManager`] — orchestrates acquisition, re-entrant nesting, and
//!   release; owns the vault and exposes the settlement primitives
//!   `settle` and `take`.
//! - [`LockCallback`] — the capability a participant hands to `acquire`;
//!   runs synchronously and may re-enter the manager.
//!
//! ## Execution model
//!
//! Strictly single-threaded and call-stack-structured: nesting is
//! ordinary same-thread recursion, there is no parallelism and no async
//! scheduling. "Lock" names the logical session, not a mutex. Any error
//! unwinds to the external caller and the whole session's effects are
//! discarded.

pub mod callback;
pub mod ledger;
pub mod lock_stack;
pub mod manager;

pub use callback::LockCallback;
pub use ledger::CurrencyLedger;
pub use lock_stack::LockStack;
pub use manager::LockManager;
