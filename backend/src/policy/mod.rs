//! Monetary policy: shared parameters and the central-bank controller
//!
//! The two system-wide parameters (reserve requirement, base interest rate)
//! live in [`MonetaryParams`], an explicitly passed handle rather than global
//! state: every bank reads it on every operation, and only the
//! [`PolicyController`] writes it. This keeps policy writes auditable and the
//! controller testable in isolation.
//!
//! The model is single-threaded; a multi-threaded port would need to
//! serialize all mutation of `MonetaryParams` behind a single owner.

pub mod controller;

pub use controller::{PolicyAction, PolicyConfig, PolicyController};

use serde::{Deserialize, Serialize};

/// System-wide monetary parameters shared by every bank
///
/// Mutated only by the policy controller; banks never cache these values, so
/// a change takes effect the next simulated day.
///
/// # Example
/// ```
/// use banking_simulator_core_rs::MonetaryParams;
///
/// let params = MonetaryParams::default();
/// assert_eq!(params.reserve_requirement(), 0.10);
/// assert_eq!(params.base_interest_rate(), 0.045);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonetaryParams {
    /// Minimum fraction of deposit liabilities kept as cash on hand
    reserve_requirement: f64,

    /// Base annual interest rate banks quote from
    base_interest_rate: f64,
}

impl Default for MonetaryParams {
    fn default() -> Self {
        Self {
            reserve_requirement: 0.10,
            base_interest_rate: 0.045,
        }
    }
}

impl MonetaryParams {
    /// Create parameters with explicit starting values
    ///
    /// # Panics
    /// Panics if the reserve requirement is outside (0, 1] or the rate is
    /// negative.
    pub fn new(reserve_requirement: f64, base_interest_rate: f64) -> Self {
        assert!(
            reserve_requirement > 0.0 && reserve_requirement <= 1.0,
            "reserve requirement must be in (0, 1]"
        );
        assert!(
            base_interest_rate >= 0.0,
            "base interest rate must be non-negative"
        );
        Self {
            reserve_requirement,
            base_interest_rate,
        }
    }

    /// Get the reserve requirement (fraction)
    pub fn reserve_requirement(&self) -> f64 {
        self.reserve_requirement
    }

    /// Get the base interest rate (fraction)
    pub fn base_interest_rate(&self) -> f64 {
        self.base_interest_rate
    }

    /// Set the reserve requirement (policy controller only)
    pub fn set_reserve_requirement(&mut self, requirement: f64) {
        assert!(
            requirement > 0.0 && requirement <= 1.0,
            "reserve requirement must be in (0, 1]"
        );
        self.reserve_requirement = requirement;
    }

    /// Set the base interest rate (policy controller only)
    pub fn set_base_interest_rate(&mut self, rate: f64) {
        assert!(rate >= 0.0, "base interest rate must be non-negative");
        self.base_interest_rate = rate;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = MonetaryParams::default();
        assert_eq!(params.reserve_requirement(), 0.10);
        assert_eq!(params.base_interest_rate(), 0.045);
    }

    #[test]
    #[should_panic(expected = "reserve requirement must be in (0, 1]")]
    fn test_zero_reserve_requirement_rejected() {
        MonetaryParams::new(0.0, 0.045);
    }

    #[test]
    fn test_setters() {
        let mut params = MonetaryParams::default();
        params.set_base_interest_rate(0.05);
        params.set_reserve_requirement(0.08);
        assert_eq!(params.base_interest_rate(), 0.05);
        assert_eq!(params.reserve_requirement(), 0.08);
    }
}
