//! Holdings and reserves accounting.
//!
//! Tracks per-(participant, currency) external holdings and the per-currency
//! pooled reserves held by the settlement manager. All mutations are atomic:
//! either the full movement succeeds or the vault is unchanged.

use std::collections::HashMap;

use openpool_types::{Currency, OpenpoolError, ParticipantId, Result};
use rust_decimal::Decimal;

/// Where value physically sits: participant holdings vs. pooled reserves.
///
/// The Vault is the external value-transfer capability the lock manager
/// delegates to. Total supply of a currency only changes through
/// [`Vault::credit`]; [`Vault::pay_in`] and [`Vault::transfer_out`] move
/// value between holdings and reserves without creating or destroying it.
#[derive(Debug, Clone, Default)]
pub struct Vault {
    /// Per-(participant, currency) external holdings.
    holdings: HashMap<(ParticipantId, Currency), Decimal>,
    /// Per-currency value held by the settlement manager.
    reserves: HashMap<Currency, Decimal>,
}

impl Vault {
    /// Create a new empty vault.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint external holdings for a participant (bootstrap / test funding).
    pub fn credit(&mut self, participant: ParticipantId, currency: &str, amount: Decimal) {
        let entry = self
            .holdings
            .entry((participant, currency.to_string()))
            .or_default();
        *entry += amount;
    }

    /// Move value from a participant's holdings into the pooled reserves.
    ///
    /// # Errors
    /// Returns `InsufficientFunds` if the participant's holdings are short;
    /// the vault is unchanged in that case.
    pub fn pay_in(
        &mut self,
        from: ParticipantId,
        currency: &str,
        amount: Decimal,
    ) -> Result<()> {
        let available = self.holding(from, currency);
        if available < amount {
            return Err(OpenpoolError::InsufficientFunds {
                currency: currency.to_string(),
                needed: amount,
                available,
            });
        }

        *self
            .holdings
            .entry((from, currency.to_string()))
            .or_default() -= amount;
        *self.reserves.entry(currency.to_string()).or_default() += amount;

        tracing::debug!(
            participant = %from,
            currency,
            %amount,
            "vault pay-in"
        );
        Ok(())
    }

    /// Move value from the pooled reserves to a participant's holdings.
    ///
    /// # Errors
    /// Returns `InsufficientReserve` if the reserve is short; the vault is
    /// unchanged in that case.
    pub fn transfer_out(
        &mut self,
        currency: &str,
        to: ParticipantId,
        amount: Decimal,
    ) -> Result<()> {
        let available = self.reserve(currency);
        if available < amount {
            return Err(OpenpoolError::InsufficientReserve {
                currency: currency.to_string(),
                requested: amount,
                available,
            });
        }

        *self.reserves.entry(currency.to_string()).or_default() -= amount;
        *self
            .holdings
            .entry((to, currency.to_string()))
            .or_default() += amount;

        tracing::debug!(
            recipient = %to,
            currency,
            %amount,
            "vault transfer-out"
        );
        Ok(())
    }

    /// Pooled reserve for a currency, defaulting to zero.
    #[must_use]
    pub fn reserve(&self, currency: &str) -> Decimal {
        self.reserves.get(currency).copied().unwrap_or(Decimal::ZERO)
    }

    /// A participant's external holding for a currency, defaulting to zero.
    #[must_use]
    pub fn holding(&self, participant: ParticipantId, currency: &str) -> Decimal {
        self.holdings
            .get(&(participant, currency.to_string()))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Total supply of a currency: pooled reserve plus all holdings.
    ///
    /// Transfers conserve this quantity; only [`Vault::credit`] changes it.
    #[must_use]
    pub fn total_supply(&self, currency: &str) -> Decimal {
        let held: Decimal = self
            .holdings
            .iter()
            .filter(|((_, c), _)| c == currency)
            .map(|(_, amount)| *amount)
            .sum();
        held + self.reserve(currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credit_increases_holdings() {
        let mut vault = Vault::new();
        let alice = ParticipantId::new();
        vault.credit(alice, "ETH", Decimal::new(10, 0));
        assert_eq!(vault.holding(alice, "ETH"), Decimal::new(10, 0));
        assert_eq!(vault.reserve("ETH"), Decimal::ZERO);
    }

    #[test]
    fn pay_in_moves_holdings_to_reserve() {
        let mut vault = Vault::new();
        let alice = ParticipantId::new();
        vault.credit(alice, "ETH", Decimal::new(10, 0));
        vault.pay_in(alice, "ETH", Decimal::new(4, 0)).unwrap();

        assert_eq!(vault.holding(alice, "ETH"), Decimal::new(6, 0));
        assert_eq!(vault.reserve("ETH"), Decimal::new(4, 0));
    }

    #[test]
    fn pay_in_insufficient_fails_unchanged() {
        let mut vault = Vault::new();
        let alice = ParticipantId::new();
        vault.credit(alice, "ETH", Decimal::ONE);

        let err = vault.pay_in(alice, "ETH", Decimal::new(2, 0)).unwrap_err();
        assert!(matches!(err, OpenpoolError::InsufficientFunds { .. }));

        // Vault unchanged
        assert_eq!(vault.holding(alice, "ETH"), Decimal::ONE);
        assert_eq!(vault.reserve("ETH"), Decimal::ZERO);
    }

    #[test]
    fn pay_in_with_no_holdings_fails() {
        let mut vault = Vault::new();
        let err = vault
            .pay_in(ParticipantId::new(), "ETH", Decimal::ONE)
            .unwrap_err();
        assert!(matches!(err, OpenpoolError::InsufficientFunds { .. }));
    }

    #[test]
    fn transfer_out_moves_reserve_to_holdings() {
        let mut vault = Vault::new();
        let alice = ParticipantId::new();
        let bob = ParticipantId::new();
        vault.credit(alice, "USDC", Decimal::new(100, 0));
        vault.pay_in(alice, "USDC", Decimal::new(100, 0)).unwrap();

        vault.transfer_out("USDC", bob, Decimal::new(30, 0)).unwrap();
        assert_eq!(vault.reserve("USDC"), Decimal::new(70, 0));
        assert_eq!(vault.holding(bob, "USDC"), Decimal::new(30, 0));
    }

    #[test]
    fn transfer_out_insufficient_reserve_fails_unchanged() {
        let mut vault = Vault::new();
        let alice = ParticipantId::new();
        vault.credit(alice, "USDC", Decimal::new(10, 0));
        vault.pay_in(alice, "USDC", Decimal::new(10, 0)).unwrap();

        let err = vault
            .transfer_out("USDC", alice, Decimal::new(11, 0))
            .unwrap_err();
        assert!(matches!(
            err,
            OpenpoolError::InsufficientReserve {
                requested,
                available,
                ..
            } if requested == Decimal::new(11, 0) && available == Decimal::new(10, 0)
        ));

        assert_eq!(vault.reserve("USDC"), Decimal::new(10, 0));
    }

    #[test]
    fn transfer_out_unknown_currency_fails() {
        let mut vault = Vault::new();
        let err = vault
            .transfer_out("DAI", ParticipantId::new(), Decimal::ONE)
            .unwrap_err();
        assert!(matches!(err, OpenpoolError::InsufficientReserve { .. }));
    }

    #[test]
    fn transfers_conserve_total_supply() {
        let mut vault = Vault::new();
        let alice = ParticipantId::new();
        let bob = ParticipantId::new();
        vault.credit(alice, "ETH", Decimal::new(5, 0));
        vault.credit(bob, "ETH", Decimal::new(3, 0));
        assert_eq!(vault.total_supply("ETH"), Decimal::new(8, 0));

        vault.pay_in(alice, "ETH", Decimal::new(2, 0)).unwrap();
        assert_eq!(vault.total_supply("ETH"), Decimal::new(8, 0));

        vault.transfer_out("ETH", bob, Decimal::ONE).unwrap();
        assert_eq!(vault.total_supply("ETH"), Decimal::new(8, 0));
    }

    #[test]
    fn currencies_are_independent() {
        let mut vault = Vault::new();
        let alice = ParticipantId::new();
        vault.credit(alice, "ETH", Decimal::new(5, 0));
        vault.credit(alice, "USDC", Decimal::new(100, 0));
        vault.pay_in(alice, "ETH", Decimal::new(5, 0)).unwrap();

        assert_eq!(vault.reserve("ETH"), Decimal::new(5, 0));
        assert_eq!(vault.reserve("USDC"), Decimal::ZERO);
        assert_eq!(vault.holding(alice, "USDC"), Decimal::new(100, 0));
    }
}
