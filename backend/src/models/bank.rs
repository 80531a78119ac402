//! Bank model
//!
//! A bank aggregates deposit accounts and amortizing loans, owns a cash
//! reserve, and enforces the reserve requirement on every cash outflow. It is
//! the only channel through which accounts and loans move real cash.
//!
//! # Critical Invariants
//!
//! 1. Every operation that removes cash re-validates
//!    `total_liabilities * reserve_requirement <= cash_on_hand - outflow`
//!    against current balances before committing (never cached).
//! 2. Accounts and loans are owned exclusively by their bank and are never
//!    destroyed mid-run; a paid-off loan goes inert but stays registered.
//! 3. Ids are unique and monotonically increasing; id 0 is never issued.
//!
//! The shared monetary parameters (reserve requirement, base interest rate)
//! are not stored here: banks read them fresh from the [`MonetaryParams`]
//! handle passed into each operation, so a policy change takes effect on the
//! next call.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::account::Account;
use crate::models::loan::Loan;
use crate::models::SimulationEntity;
use crate::policy::MonetaryParams;
use crate::rng::RngManager;

/// Deposit accounts earn a tenth of the quoted rate.
const DEPOSIT_RATE_FACTOR: f64 = 0.1;

/// Loan terms are drawn uniformly from [6, 36) months.
const MIN_TERM_MONTHS: u64 = 6;
const MAX_TERM_MONTHS: u64 = 36;

/// Caller contract violations at the bank boundary
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BankError {
    #[error("Unknown account id: {0}")]
    UnknownAccount(u64),

    #[error("Unknown loan id: {0}")]
    UnknownLoan(u64),
}

/// A simulated commercial bank
///
/// # Example
/// ```
/// use banking_simulator_core_rs::{Bank, MonetaryParams, RngManager};
///
/// let params = MonetaryParams::default();
/// let mut rng = RngManager::new(42);
///
/// let mut bank = Bank::new(100.0);
/// // Zero liabilities: a 90 loan passes the reserve check (0 <= 100 - 90).
/// let loan_id = bank.open_loan(0.07, 90.0, &params, &mut rng);
/// assert!(loan_id.is_some());
///
/// // Reduced cash: a second 90 loan must be refused.
/// assert!(bank.open_loan(0.07, 90.0, &params, &mut rng).is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bank {
    /// Cash reserve backing deposit liabilities (non-negative)
    cash_on_hand: f64,

    /// Next id handed out for accounts and loans (shared counter, starts at 1)
    next_id: u64,

    /// Deposit accounts by id
    accounts: BTreeMap<u64, Account>,

    /// Loans by id; paid-off loans stay registered with zero balance
    loans: BTreeMap<u64, Loan>,
}

impl Bank {
    /// Create a bank with an opening cash reserve
    pub fn new(cash_on_hand: f64) -> Self {
        assert!(cash_on_hand >= 0.0, "opening cash must be non-negative");
        Self {
            cash_on_hand,
            next_id: 1,
            accounts: BTreeMap::new(),
            loans: BTreeMap::new(),
        }
    }

    /// Get the current cash reserve
    pub fn cash_on_hand(&self) -> f64 {
        self.cash_on_hand
    }

    /// Unconditionally add cash to the reserve. Always succeeds.
    pub fn deposit_cash(&mut self, amount: f64) {
        assert!(amount >= 0.0, "cash deposit must be non-negative");
        self.cash_on_hand += amount;
    }

    /// Remove cash from the reserve, all-or-nothing
    ///
    /// Re-validates the reserve requirement for the requested amount. If it
    /// holds, the full amount is released; otherwise nothing is released and
    /// state is unchanged.
    pub fn withdraw_cash(&mut self, amount: f64, params: &MonetaryParams) -> f64 {
        assert!(amount >= 0.0, "cash withdrawal must be non-negative");

        if self.check_withdraw_reserve_requirement(amount, params) {
            self.cash_on_hand -= amount;
            amount
        } else {
            0.0
        }
    }

    /// The single gating predicate for every cash outflow
    ///
    /// Returns true iff
    /// `total_liabilities * reserve_requirement <= cash_on_hand - withdraw`.
    /// Evaluated fresh on every call: account balances mutate between calls,
    /// so the result is never cached.
    pub fn check_withdraw_reserve_requirement(
        &self,
        withdraw: f64,
        params: &MonetaryParams,
    ) -> bool {
        self.total_liabilities() * params.reserve_requirement() <= self.cash_on_hand - withdraw
    }

    /// Sum of all deposit-account balances
    pub fn total_liabilities(&self) -> f64 {
        self.accounts.values().map(Account::balance).sum()
    }

    // ========================================================================
    // Accounts
    // ========================================================================

    /// Open a deposit account seeded with an initial deposit
    ///
    /// The deposit is an external cash inflow: it is credited to the account
    /// and to the bank's reserve simultaneously. The account earns a tenth of
    /// the quoted rate.
    ///
    /// Returns the new account's unique id.
    pub fn open_account(&mut self, rate: f64, deposit: f64) -> u64 {
        let account = Account::new(deposit, rate * DEPOSIT_RATE_FACTOR);
        self.cash_on_hand += deposit;

        let id = self.next_id;
        self.next_id += 1;
        self.accounts.insert(id, account);
        id
    }

    /// Get an account by id
    pub fn account(&self, id: u64) -> Option<&Account> {
        self.accounts.get(&id)
    }

    /// Check whether an account id exists at this bank
    pub fn has_account(&self, id: u64) -> bool {
        self.accounts.contains_key(&id)
    }

    /// Deposit into an account
    ///
    /// Credits the account balance and the bank's cash by the same amount.
    /// No failure mode beyond an unknown id.
    pub fn deposit_to(&mut self, id: u64, amount: f64) -> Result<(), BankError> {
        let account = self
            .accounts
            .get_mut(&id)
            .ok_or(BankError::UnknownAccount(id))?;
        account.credit(amount);
        self.cash_on_hand += amount;
        Ok(())
    }

    /// Withdraw from an account, returning the cash actually released
    ///
    /// The request is clamped to the bank's cash and the account's balance
    /// before the balance is debited; the bank then releases the clamped
    /// amount only if the reserve requirement still holds, so the returned
    /// amount may be anything from the request down to zero. Callers must
    /// reconcile a shortfall themselves (typically by redepositing).
    pub fn withdraw_from(
        &mut self,
        id: u64,
        amount: f64,
        params: &MonetaryParams,
    ) -> Result<f64, BankError> {
        // Read cash first, debit the account, then gate the cash release.
        let cash = self.cash_on_hand;
        let clamped = self
            .accounts
            .get_mut(&id)
            .ok_or(BankError::UnknownAccount(id))?
            .debit_for_withdrawal(amount, cash);

        Ok(self.withdraw_cash(clamped, params))
    }

    // ========================================================================
    // Loans
    // ========================================================================

    /// Originate a loan, or refuse it if the reserve requirement would break
    ///
    /// On success the principal is withdrawn from the cash reserve and the
    /// loan is registered under a fresh id. The quoted rate is adjusted by an
    /// offset that rises as the bank's asset ratio falls, and the term is
    /// drawn from the caller-supplied RNG in [6, 36) months.
    ///
    /// Returns `None`, with no state change, when the reserve check fails.
    pub fn open_loan(
        &mut self,
        rate: f64,
        amount: f64,
        params: &MonetaryParams,
        rng: &mut RngManager,
    ) -> Option<u64> {
        if !self.check_withdraw_reserve_requirement(amount, params) {
            return None;
        }

        // Thin reserves price in a risk premium. An infinite asset ratio
        // (zero liabilities) collapses the offset to zero.
        let rate_offset = 0.0006 * (1.0 / (0.001 + self.compute_asset_ratio()).sqrt() / 0.1);
        let term_months = rng.range(MIN_TERM_MONTHS, MAX_TERM_MONTHS) as u32;

        // The amount actually released is the amortization basis.
        let principal = self.withdraw_cash(amount, params);
        let loan = Loan::new(principal, rate + rate_offset, term_months);

        let id = self.next_id;
        self.next_id += 1;
        self.loans.insert(id, loan);
        Some(id)
    }

    /// Get a loan by id
    pub fn loan(&self, id: u64) -> Option<&Loan> {
        self.loans.get(&id)
    }

    /// Check whether a loan id exists at this bank
    pub fn has_loan(&self, id: u64) -> bool {
        self.loans.contains_key(&id)
    }

    /// Apply one installment to a loan
    ///
    /// Decrements the remaining term by one month and deposits the fixed
    /// installment into the bank's cash. Returns the installment amount.
    ///
    /// # Panics
    /// Panics if the loan is already paid off (caller contract; guard with
    /// `is_paid_off`).
    pub fn make_loan_payment(&mut self, id: u64) -> Result<f64, BankError> {
        let loan = self.loans.get_mut(&id).ok_or(BankError::UnknownLoan(id))?;
        let installment = loan.make_payment();
        self.cash_on_hand += installment;
        Ok(installment)
    }

    // ========================================================================
    // Metrics
    // ========================================================================

    /// Net assets: `cash_on_hand + sum of loan balances`
    ///
    /// Loans are claims on borrowers and count as assets at face value;
    /// deposit liabilities are deliberately not subtracted. This is the
    /// system's definition of money supply and must stay exactly this
    /// formula.
    pub fn compute_net_assets(&self) -> f64 {
        self.cash_on_hand + self.loans.values().map(Loan::balance).sum::<f64>()
    }

    /// Asset ratio: `cash_on_hand / total_liabilities`
    ///
    /// Returns `f64::INFINITY` when there are no liabilities; callers treat
    /// that as "unconstrained" rather than a fault.
    pub fn compute_asset_ratio(&self) -> f64 {
        let liabilities = self.total_liabilities();
        if liabilities == 0.0 {
            f64::INFINITY
        } else {
            self.cash_on_hand / liabilities
        }
    }
}

impl SimulationEntity for Bank {
    /// Tick every account and loan once
    ///
    /// Accounts accrue interest; loans are inert. There is no ordering
    /// dependency between entities within a single day.
    fn simulate(&mut self, days: f64) {
        for account in self.accounts.values_mut() {
            account.simulate(days);
        }
        for loan in self.loans.values_mut() {
            loan.simulate(days);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> MonetaryParams {
        MonetaryParams::default()
    }

    #[test]
    fn test_open_account_credits_cash() {
        let mut bank = Bank::new(0.0);
        let id = bank.open_account(0.045, 1_000.0);

        assert!(bank.has_account(id));
        assert_eq!(bank.account(id).unwrap().balance(), 1_000.0);
        assert_eq!(bank.cash_on_hand(), 1_000.0);
    }

    #[test]
    fn test_account_rate_is_tenth_of_quoted() {
        let mut bank = Bank::new(0.0);
        let id = bank.open_account(0.045, 100.0);
        assert!((bank.account(id).unwrap().annual_rate() - 0.0045).abs() < 1e-12);
    }

    #[test]
    fn test_ids_are_unique_and_nonzero() {
        let mut bank = Bank::new(1_000.0);
        let mut rng = RngManager::new(1);
        let p = params();

        let a = bank.open_account(0.045, 10.0);
        let l = bank.open_loan(0.07, 50.0, &p, &mut rng).unwrap();
        let b = bank.open_account(0.045, 10.0);

        assert_ne!(a, 0);
        assert_ne!(l, a);
        assert_ne!(b, l);
    }

    #[test]
    fn test_withdraw_cash_all_or_nothing() {
        let p = params();
        let mut bank = Bank::new(100.0);
        bank.open_account(0.045, 500.0); // cash 600, liabilities 500

        // 500 * 0.1 = 50 must remain: 560 breaks the floor, 540 does not.
        assert_eq!(bank.withdraw_cash(560.0, &p), 0.0);
        assert_eq!(bank.cash_on_hand(), 600.0);
        assert_eq!(bank.withdraw_cash(540.0, &p), 540.0);
        assert_eq!(bank.cash_on_hand(), 60.0);
    }

    #[test]
    fn test_unknown_account_is_error() {
        let mut bank = Bank::new(0.0);
        assert_eq!(
            bank.deposit_to(99, 10.0),
            Err(BankError::UnknownAccount(99))
        );
    }

    #[test]
    fn test_asset_ratio_infinite_without_liabilities() {
        let bank = Bank::new(100.0);
        assert!(bank.compute_asset_ratio().is_infinite());
    }

    #[test]
    fn test_net_assets_counts_loans_at_face_value() {
        let p = params();
        let mut rng = RngManager::new(7);
        let mut bank = Bank::new(1_000.0);

        let id = bank.open_loan(0.07, 400.0, &p, &mut rng).unwrap();
        let loan_balance = bank.loan(id).unwrap().balance();

        assert!((bank.compute_net_assets() - (600.0 + loan_balance)).abs() < 1e-9);
    }

    #[test]
    fn test_simulate_zero_days_changes_nothing() {
        let mut bank = Bank::new(0.0);
        let id = bank.open_account(0.045, 1_000.0);

        bank.simulate(0.0);

        assert_eq!(bank.account(id).unwrap().balance(), 1_000.0);
        assert_eq!(bank.cash_on_hand(), 1_000.0);
    }
}
