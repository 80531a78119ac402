//! Loan (amortized obligation) model
//!
//! Represents a fixed-payment amortizing loan issued by a bank. The monthly
//! installment is computed once at origination and never recomputed; the
//! remaining term only decreases.
//!
//! # Term units
//!
//! The term is stored strictly in **months**. One `make_payment` call
//! retires one month; `months_remaining` is a direct read. The driver's
//! 30-day payment cadence is the only place days are converted to months.

use serde::{Deserialize, Serialize};

use crate::models::SimulationEntity;

/// An amortizing loan issued by a bank
///
/// Constructed via `Bank::open_loan`, which withdraws the principal from the
/// bank's cash reserve subject to the reserve requirement. The amount the
/// bank actually released is the basis for the amortization formula.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loan {
    /// Annual percentage rate at origination
    annual_rate: f64,

    /// Fixed monthly installment, set once at origination
    payment_amount: f64,

    /// Months left until the loan is retired
    term_remaining: u32,
}

impl Loan {
    /// Create a loan from the principal the bank actually released
    ///
    /// Standard fixed-payment amortization with monthly rate `r = apr / 12`:
    ///
    /// ```text
    /// payment = P * (r * (1 + r)^n) / ((1 + r)^n - 1)
    /// ```
    ///
    /// A zero rate degenerates to `P / n`.
    ///
    /// Normally constructed through `Bank::open_loan`, which withdraws the
    /// principal first; a loan built directly does not move any cash.
    ///
    /// # Panics
    /// Panics if `term_months` is zero.
    pub fn new(principal: f64, apr: f64, term_months: u32) -> Self {
        assert!(term_months > 0, "loan term must be at least one month");

        let monthly_rate = apr / 12.0;
        let payment_amount = if monthly_rate == 0.0 {
            principal / term_months as f64
        } else {
            let rate_factor = (1.0 + monthly_rate).powi(term_months as i32);
            principal * (monthly_rate * rate_factor) / (rate_factor - 1.0)
        };

        Self {
            annual_rate: apr,
            payment_amount,
            term_remaining: term_months,
        }
    }

    /// Get the fixed monthly installment
    pub fn payment_amount(&self) -> f64 {
        self.payment_amount
    }

    /// Get the annual rate fixed at origination
    pub fn annual_rate(&self) -> f64 {
        self.annual_rate
    }

    /// Months left until payoff (direct read, no unit conversion)
    pub fn months_remaining(&self) -> u32 {
        self.term_remaining
    }

    /// Whether the loan has been fully retired
    pub fn is_paid_off(&self) -> bool {
        self.term_remaining == 0
    }

    /// Retire one month of the term
    ///
    /// The owning bank deposits the installment into its cash reserve
    /// (`Bank::make_loan_payment`). Callers must guard with `is_paid_off`;
    /// paying a retired loan is a caller error.
    ///
    /// # Panics
    /// Panics if the loan is already paid off.
    pub fn make_payment(&mut self) -> f64 {
        assert!(
            self.term_remaining > 0,
            "payment on a paid-off loan is a caller error"
        );
        self.term_remaining -= 1;
        self.payment_amount
    }

    /// Outstanding balance, approximated as `installment * months remaining`
    ///
    /// Not a present-value calculation. This approximation is what the
    /// money-supply metric aggregates, so it must stay exactly this formula.
    pub fn balance(&self) -> f64 {
        self.payment_amount * self.term_remaining as f64
    }
}

impl SimulationEntity for Loan {
    /// No-op: a loan's cost is baked into the fixed installment at
    /// origination, so it does not accrue interest day by day.
    fn simulate(&mut self, _days: f64) {}
}
