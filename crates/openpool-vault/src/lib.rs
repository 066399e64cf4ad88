//! # openpool-vault
//!
//! The value-transfer collaborator of the OpenPool settlement engine.
//!
//! The [`Vault`] is the source of truth for where value physically sits:
//! either in a participant's external **holdings** or in the manager's
//! pooled **reserves**. The lock manager calls into it to move value; it
//! knows nothing about lock sessions or balance deltas.
//!
//! Every transfer is atomic: either the full movement happens or the
//! vault is unchanged.

pub mod vault;

pub use vault::Vault;
