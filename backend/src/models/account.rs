//! Account (deposit ledger entry) model
//!
//! Holds a cash balance for one depositor at one bank and accrues interest
//! daily. The account never moves real cash itself: the owning [`Bank`]
//! (`models::bank`) is the only channel through which deposits and
//! withdrawals touch the cash reserve, so every balance change here is
//! mirrored by an equal and opposite cash movement at the bank.
//!
//! # Critical Invariants
//!
//! 1. `balance >= 0` at all times
//! 2. The account never outlives its owning bank (it lives in the bank's map)
//!
//! [`Bank`]: crate::models::bank::Bank

use serde::{Deserialize, Serialize};

use crate::models::SimulationEntity;

/// A deposit account sponsored by a single bank
///
/// Created via `Bank::open_account`. Balance mutations are routed through the
/// owning bank (`deposit_to` / `withdraw_from`), which couples them to the
/// bank's cash reserve.
///
/// # Example
/// ```
/// use banking_simulator_core_rs::{Bank, MonetaryParams};
///
/// let params = MonetaryParams::default();
/// let mut bank = Bank::new(0.0);
/// let id = bank.open_account(params.base_interest_rate(), 1000.0);
///
/// assert_eq!(bank.account(id).unwrap().balance(), 1000.0);
/// assert_eq!(bank.cash_on_hand(), 1000.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Current balance (non-negative)
    balance: f64,

    /// Annual interest rate paid on the balance (fraction, e.g. 0.0045)
    annual_rate: f64,
}

impl Account {
    /// Create an account seeded with an initial deposit
    pub(crate) fn new(balance: f64, annual_rate: f64) -> Self {
        assert!(balance >= 0.0, "initial deposit must be non-negative");
        Self {
            balance,
            annual_rate,
        }
    }

    /// Get current balance
    pub fn balance(&self) -> f64 {
        self.balance
    }

    /// Get the annual interest rate on this account
    pub fn annual_rate(&self) -> f64 {
        self.annual_rate
    }

    /// Credit the balance (the bank credits its cash by the same amount)
    pub(crate) fn credit(&mut self, amount: f64) {
        assert!(amount >= 0.0, "deposit amount must be non-negative");
        self.balance += amount;
    }

    /// Debit the balance for a withdrawal request and return the cash amount
    /// to request from the bank's reserve.
    ///
    /// The request is clamped to the bank's available cash, then to the
    /// account's own balance. If the clamped amount drains the whole balance
    /// the account is zeroed; otherwise the *original* request is subtracted
    /// (clamped at zero so the balance never goes negative). The caller is
    /// responsible for reconciling any shortfall between the returned amount
    /// and what the bank actually releases.
    pub(crate) fn debit_for_withdrawal(&mut self, amount: f64, bank_cash: f64) -> f64 {
        assert!(amount >= 0.0, "withdrawal amount must be non-negative");

        let withdrawn = amount.min(bank_cash).min(self.balance);

        if self.balance <= withdrawn {
            self.balance = 0.0;
        } else {
            self.balance = (self.balance - amount).max(0.0);
        }

        withdrawn
    }
}

impl SimulationEntity for Account {
    /// Accrue interest: `balance += balance * annual_rate / 365 * days`
    ///
    /// Simple daily approximation; compounding only arises from repeated
    /// calls. Always succeeds.
    fn simulate(&mut self, days: f64) {
        self.balance += self.balance * self.annual_rate / 365.0 * days;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accrual_one_day() {
        let mut account = Account::new(365.0, 0.10);
        account.simulate(1.0);
        assert!((account.balance() - 365.1).abs() < 1e-9);
    }

    #[test]
    fn test_accrual_zero_days_is_noop() {
        let mut account = Account::new(1000.0, 0.05);
        account.simulate(0.0);
        assert_eq!(account.balance(), 1000.0);
    }

    #[test]
    fn test_debit_clamps_to_balance() {
        let mut account = Account::new(50.0, 0.0);
        let withdrawn = account.debit_for_withdrawal(100.0, 1_000.0);
        assert_eq!(withdrawn, 50.0);
        assert_eq!(account.balance(), 0.0);
    }

    #[test]
    fn test_debit_clamps_to_bank_cash() {
        let mut account = Account::new(500.0, 0.0);
        // Bank can only cover 30; the full 100 request is still debited.
        let withdrawn = account.debit_for_withdrawal(100.0, 30.0);
        assert_eq!(withdrawn, 30.0);
        assert_eq!(account.balance(), 400.0);
    }

    #[test]
    fn test_debit_never_goes_negative() {
        let mut account = Account::new(50.0, 0.0);
        // Request exceeds balance while bank cash is the binding clamp.
        let withdrawn = account.debit_for_withdrawal(80.0, 30.0);
        assert_eq!(withdrawn, 30.0);
        assert!(account.balance() >= 0.0);
    }

    #[test]
    #[should_panic(expected = "withdrawal amount must be non-negative")]
    fn test_negative_withdrawal_panics() {
        let mut account = Account::new(50.0, 0.0);
        account.debit_for_withdrawal(-1.0, 100.0);
    }
}
