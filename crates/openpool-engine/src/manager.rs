//! Lock manager — session orchestration and settlement primitives.
//!
//! The manager is a state machine over one logical session tree:
//! `Idle` (no open locks) ⇄ `Locked(depth ≥ 1)`. Each `acquire` pushes a
//! lock record, runs the participant's callback (which may re-enter
//! `acquire` arbitrarily), then closes the record. Only the close that
//! returns the manager to `Idle` enforces global reconciliation: every
//! (participant, currency) delta must be exactly zero.
//!
//! Any failure unwinds the whole call chain to the external caller and
//! the session's effects are discarded wholesale — there is no partial
//! commit and no internal retry.

use std::collections::HashMap;

use openpool_types::{
    Currency, EngineConfig, LockIndex, LockRecord, OpenpoolError, ParticipantId, Result,
};
use openpool_vault::Vault;
use rust_decimal::Decimal;

use crate::callback::LockCallback;
use crate::ledger::CurrencyLedger;
use crate::lock_stack::LockStack;

/// The nested-lock settlement manager.
///
/// Owns the lock stack, the delta ledger, the vault, and the per-currency
/// `accounted` reserve markers that let [`LockManager::settle`] discover
/// how much a participant paid in since the last settlement. All state is
/// scoped to this instance; independent managers never interfere.
#[derive(Debug, Default)]
pub struct LockManager {
    stack: LockStack,
    ledger: CurrencyLedger,
    vault: Vault,
    /// Reserve level per currency that the ledger already accounts for.
    /// `settle` recognizes the gap between the live reserve and this mark.
    accounted: HashMap<Currency, Decimal>,
    config: EngineConfig,
}

/// Full accounting state captured at the outermost `acquire`, restored
/// on failure so a failed session leaves no trace.
struct Snapshot {
    stack: LockStack,
    ledger: CurrencyLedger,
    vault: Vault,
    accounted: HashMap<Currency, Decimal>,
}

impl LockManager {
    /// Create a manager with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a manager with an explicit configuration.
    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    // =====================================================================
    // Session entry point
    // =====================================================================

    /// Open a lock session for `owner` and run `callback` inside it.
    ///
    /// The callback may re-enter `acquire` (nested sessions), and may call
    /// [`LockManager::settle`] / [`LockManager::take`] while its lock is
    /// the active one. The callback's output bytes are returned to the
    /// caller.
    ///
    /// # Errors
    /// - `LockDepthExceeded` past the configured nesting limit
    /// - `UnsettledBalance` if the outermost close finds non-zero deltas
    /// - any error the callback or a settlement primitive produced
    ///
    /// On error at the outermost level, every effect of the session
    /// (deltas, vault movements, lock records) is discarded before the
    /// error is returned.
    pub fn acquire(
        &mut self,
        owner: ParticipantId,
        callback: &mut dyn LockCallback,
        payload: &[u8],
    ) -> Result<Vec<u8>> {
        if self.stack.depth() > 0 {
            return self.acquire_nested(owner, callback, payload);
        }

        let snapshot = self.snapshot();
        let result = self.acquire_nested(owner, callback, payload);
        if let Err(err) = &result {
            tracing::warn!(%err, "session failed, discarding its effects");
            self.restore(snapshot);
        }
        result
    }

    fn acquire_nested(
        &mut self,
        owner: ParticipantId,
        callback: &mut dyn LockCallback,
        payload: &[u8],
    ) -> Result<Vec<u8>> {
        let depth = self.stack.depth();
        if depth >= self.config.max_lock_depth {
            return Err(OpenpoolError::LockDepthExceeded {
                depth,
                max: self.config.max_lock_depth,
            });
        }

        let index = self.stack.push(owner);
        tracing::debug!(owner = %owner, index, depth = depth + 1, "lock acquired");

        // On error the record stays open; the outermost wrapper discards
        // the whole session, so no per-level cleanup happens here.
        let output = callback.lock_acquired(self, payload)?;

        self.stack.close(index)?;
        if self.stack.current().is_none() {
            let entries = self.ledger.nonzero_count();
            if entries != 0 {
                return Err(OpenpoolError::UnsettledBalance { entries });
            }
        }
        tracing::debug!(index, depth, "lock released");
        Ok(output)
    }

    // =====================================================================
    // Settlement primitives (active lock owner only)
    // =====================================================================

    /// Recognize value paid into the reserves since the last settlement
    /// as a credit to the active lock's owner.
    ///
    /// Measures `reserve − accounted` for `currency`, marks it accounted,
    /// and applies it negatively to the owner's delta ("I just gave you
    /// value, reduce what I owe"). Settling with nothing paid in is a
    /// zero-amount no-op. Returns the recognized amount.
    ///
    /// # Errors
    /// Returns `NoActiveLock` outside a session.
    pub fn settle(&mut self, currency: &str) -> Result<Decimal> {
        let owner = self.stack.active_owner().ok_or(OpenpoolError::NoActiveLock)?;

        let reserve = self.vault.reserve(currency);
        let paid = reserve - self.accounted_reserve(currency);
        self.accounted.insert(currency.to_string(), reserve);
        self.ledger.apply_delta(owner, currency, -paid);

        tracing::debug!(owner = %owner, currency, %paid, "settle");
        Ok(paid)
    }

    /// Release `amount` of `currency` from the reserves to `recipient`,
    /// charged to the active lock's owner ("I received value, I owe you").
    ///
    /// # Errors
    /// - `NoActiveLock` outside a session
    /// - `InsufficientReserve` if the vault cannot satisfy the transfer
    ///   (the vault is unchanged in that case)
    pub fn take(
        &mut self,
        currency: &str,
        recipient: ParticipantId,
        amount: Decimal,
    ) -> Result<()> {
        let owner = self.stack.active_owner().ok_or(OpenpoolError::NoActiveLock)?;

        self.vault.transfer_out(currency, recipient, amount)?;
        // The reserve drop is the manager's own doing; keep the mark in
        // step so the next settle only sees genuine pay-ins.
        *self.accounted.entry(currency.to_string()).or_default() -= amount;
        self.ledger.apply_delta(owner, currency, amount);

        tracing::debug!(owner = %owner, currency, recipient = %recipient, %amount, "take");
        Ok(())
    }

    // =====================================================================
    // Value movement outside the delta discipline
    // =====================================================================

    /// Mint external holdings for a participant (bootstrap / test funding).
    pub fn credit(&mut self, participant: ParticipantId, currency: &str, amount: Decimal) {
        self.vault.credit(participant, currency, amount);
    }

    /// Transfer a participant's holdings into the reserves, to be
    /// recognized by the next [`LockManager::settle`] for `currency`.
    ///
    /// # Errors
    /// Returns `InsufficientFunds` if the participant's holdings are short.
    pub fn pay_in(&mut self, from: ParticipantId, currency: &str, amount: Decimal) -> Result<()> {
        self.vault.pay_in(from, currency, amount)
    }

    /// Provision reserve liquidity outside the delta discipline: the
    /// reserve rises and is accounted immediately, so the amount never
    /// surfaces through a later `settle`.
    ///
    /// # Errors
    /// Returns `InsufficientFunds` if the participant's holdings are short.
    pub fn deposit(&mut self, from: ParticipantId, currency: &str, amount: Decimal) -> Result<()> {
        self.vault.pay_in(from, currency, amount)?;
        *self.accounted.entry(currency.to_string()).or_default() += amount;
        Ok(())
    }

    // =====================================================================
    // Queries
    // =====================================================================

    /// Total number of lock records ever created, including closed ones.
    #[must_use]
    pub fn locks_len(&self) -> usize {
        self.stack.len()
    }

    /// Index of the active lock record, `None` while idle.
    #[must_use]
    pub fn lock_index(&self) -> Option<LockIndex> {
        self.stack.current()
    }

    /// Read-only access to any lock record, open or closed.
    #[must_use]
    pub fn lock(&self, index: LockIndex) -> Option<&LockRecord> {
        self.stack.record(index)
    }

    /// Current nesting depth (0 while idle).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    /// Owner of the active lock, `None` while idle.
    #[must_use]
    pub fn active_owner(&self) -> Option<ParticipantId> {
        self.stack.active_owner()
    }

    /// Signed delta for `(owner, currency)`, defaulting to zero.
    #[must_use]
    pub fn currency_delta(&self, owner: ParticipantId, currency: &str) -> Decimal {
        self.ledger.delta(owner, currency)
    }

    /// Count of (participant, currency) entries with non-zero delta.
    #[must_use]
    pub fn nonzero_delta_count(&self) -> usize {
        self.ledger.nonzero_count()
    }

    /// Read-only access to the vault.
    #[must_use]
    pub fn vault(&self) -> &Vault {
        &self.vault
    }

    // =====================================================================
    // Internals
    // =====================================================================

    fn accounted_reserve(&self, currency: &str) -> Decimal {
        self.accounted
            .get(currency)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            stack: self.stack.clone(),
            ledger: self.ledger.clone(),
            vault: self.vault.clone(),
            accounted: self.accounted.clone(),
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.stack = snapshot.stack;
        self.ledger = snapshot.ledger;
        self.vault = snapshot.vault;
        self.accounted = snapshot.accounted;
    }
}
