//! Signed per-(participant, currency) balance deltas.
//!
//! Sign convention, fixed across the whole engine: **positive delta =
//! the participant owes the manager**. `take` drives a delta up,
//! `settle` drives it down.
//!
//! The ledger maintains a single counter of non-zero entries. Every
//! mutation that moves a stored value across zero adjusts the counter in
//! the same call; the outermost lock release is allowed only when the
//! counter reads zero.

use std::collections::HashMap;

use openpool_types::{Currency, ParticipantId};
use rust_decimal::Decimal;

/// The delta ledger and its non-zero entry counter.
///
/// Entries default to zero and are never removed, only driven back to
/// zero by settlement.
#[derive(Debug, Clone, Default)]
pub struct CurrencyLedger {
    /// Per-(participant, currency) signed deltas.
    deltas: HashMap<(ParticipantId, Currency), Decimal>,
    /// Count of entries whose value is currently non-zero.
    nonzero: usize,
}

impl CurrencyLedger {
    /// Create a new empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to the stored delta for `(participant, currency)`.
    ///
    /// A zero→non-zero transition increments the non-zero counter,
    /// non-zero→zero decrements it. A zero `amount` is a no-op.
    pub fn apply_delta(&mut self, participant: ParticipantId, currency: &str, amount: Decimal) {
        if amount.is_zero() {
            return;
        }

        let entry = self
            .deltas
            .entry((participant, currency.to_string()))
            .or_default();
        let was_zero = entry.is_zero();
        *entry += amount;
        let is_zero = entry.is_zero();

        match (was_zero, is_zero) {
            (true, false) => self.nonzero += 1,
            (false, true) => self.nonzero -= 1,
            _ => {}
        }
    }

    /// Current signed delta for `(participant, currency)`, defaulting to zero.
    #[must_use]
    pub fn delta(&self, participant: ParticipantId, currency: &str) -> Decimal {
        self.deltas
            .get(&(participant, currency.to_string()))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Number of (participant, currency) entries with a non-zero delta.
    #[must_use]
    pub fn nonzero_count(&self) -> usize {
        self.nonzero
    }

    /// Recount non-zero entries from scratch. Test oracle for the
    /// incrementally maintained counter.
    #[must_use]
    pub fn recount_nonzero(&self) -> usize {
        self.deltas.values().filter(|d| !d.is_zero()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_defaults_to_zero() {
        let ledger = CurrencyLedger::new();
        assert_eq!(ledger.delta(ParticipantId::new(), "ETH"), Decimal::ZERO);
        assert_eq!(ledger.nonzero_count(), 0);
    }

    #[test]
    fn apply_tracks_zero_to_nonzero() {
        let mut ledger = CurrencyLedger::new();
        let alice = ParticipantId::new();

        ledger.apply_delta(alice, "ETH", Decimal::ONE);
        assert_eq!(ledger.delta(alice, "ETH"), Decimal::ONE);
        assert_eq!(ledger.nonzero_count(), 1);
    }

    #[test]
    fn apply_tracks_nonzero_to_zero() {
        let mut ledger = CurrencyLedger::new();
        let alice = ParticipantId::new();

        ledger.apply_delta(alice, "ETH", Decimal::ONE);
        ledger.apply_delta(alice, "ETH", -Decimal::ONE);
        assert_eq!(ledger.delta(alice, "ETH"), Decimal::ZERO);
        assert_eq!(ledger.nonzero_count(), 0);
    }

    #[test]
    fn nonzero_to_nonzero_does_not_move_counter() {
        let mut ledger = CurrencyLedger::new();
        let alice = ParticipantId::new();

        ledger.apply_delta(alice, "ETH", Decimal::ONE);
        ledger.apply_delta(alice, "ETH", Decimal::ONE);
        assert_eq!(ledger.delta(alice, "ETH"), Decimal::new(2, 0));
        assert_eq!(ledger.nonzero_count(), 1);
    }

    #[test]
    fn sign_crossing_through_zero_counts_once() {
        let mut ledger = CurrencyLedger::new();
        let alice = ParticipantId::new();

        // +2 then -2: crosses back to exactly zero
        ledger.apply_delta(alice, "ETH", Decimal::new(2, 0));
        ledger.apply_delta(alice, "ETH", Decimal::new(-2, 0));
        assert_eq!(ledger.nonzero_count(), 0);

        // +2 then -5: skips over zero, stays non-zero
        ledger.apply_delta(alice, "ETH", Decimal::new(2, 0));
        ledger.apply_delta(alice, "ETH", Decimal::new(-5, 0));
        assert_eq!(ledger.delta(alice, "ETH"), Decimal::new(-3, 0));
        assert_eq!(ledger.nonzero_count(), 1);
    }

    #[test]
    fn zero_amount_is_noop() {
        let mut ledger = CurrencyLedger::new();
        let alice = ParticipantId::new();

        ledger.apply_delta(alice, "ETH", Decimal::ZERO);
        assert_eq!(ledger.nonzero_count(), 0);
        assert_eq!(ledger.recount_nonzero(), 0);
    }

    #[test]
    fn entries_are_independent() {
        let mut ledger = CurrencyLedger::new();
        let alice = ParticipantId::new();
        let bob = ParticipantId::new();

        ledger.apply_delta(alice, "ETH", Decimal::ONE);
        ledger.apply_delta(alice, "USDC", Decimal::ONE);
        ledger.apply_delta(bob, "ETH", -Decimal::ONE);
        assert_eq!(ledger.nonzero_count(), 3);

        ledger.apply_delta(alice, "USDC", -Decimal::ONE);
        assert_eq!(ledger.nonzero_count(), 2);
        assert_eq!(ledger.delta(alice, "ETH"), Decimal::ONE);
        assert_eq!(ledger.delta(bob, "ETH"), -Decimal::ONE);
    }

    #[test]
    fn counter_matches_recount() {
        let mut ledger = CurrencyLedger::new();
        let alice = ParticipantId::new();
        let bob = ParticipantId::new();

        let steps = [
            (alice, "ETH", Decimal::new(3, 0)),
            (bob, "ETH", Decimal::new(-1, 0)),
            (alice, "ETH", Decimal::new(-3, 0)),
            (alice, "USDC", Decimal::new(7, 1)),
            (bob, "ETH", Decimal::new(1, 0)),
            (alice, "USDC", Decimal::new(-7, 1)),
        ];
        for (who, currency, amount) in steps {
            ledger.apply_delta(who, currency, amount);
            assert_eq!(ledger.nonzero_count(), ledger.recount_nonzero());
        }
        assert_eq!(ledger.nonzero_count(), 0);
    }
}
