//! Central-bank policy controller
//!
//! A feedback control loop, external to any single bank, that reads the
//! system-wide money-supply growth signal once per simulated day and adjusts
//! the shared [`MonetaryParams`]. Three independent countdown timers pace the
//! interest-rate moves, emergency cash injections, and reserve-requirement
//! moves so the controller does not thrash.
//!
//! # Control algorithm (per day)
//!
//! 1. Instantaneous growth = day-over-day money-supply change relative to
//!    the previous day, annualized (× 365), denominator guarded by epsilon.
//! 2. Exponential smoothing: `ema = (1 - lookback) * growth + lookback * ema`
//!    with `lookback` close to 1 (slow-moving average).
//! 3. Saturating decrement of all three timers.
//! 4. Growth meaningfully below target: inject cash when the money
//!    multiplier is near its theoretical ceiling (the injection timer is NOT
//!    reset after firing, so the injection may re-fire daily — preserved
//!    behavior, see DESIGN.md), cut the base rate, and on a large shortfall
//!    cut the reserve requirement.
//! 5. Growth above target by the overheat margin: hike the base rate.
//!
//! [`MonetaryParams`]: crate::policy::MonetaryParams

use serde::{Deserialize, Serialize};

use crate::policy::MonetaryParams;

/// Guard against division by a vanishing previous-day money supply.
const DENOMINATOR_EPSILON: f64 = 1e-9;

/// Tunable policy parameters
///
/// Defaults pace rate moves at roughly two per year and keep the emergency
/// printing press and reserve lever on annual timers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Master switch; when false the controller only tracks the EMA
    pub enabled: bool,

    /// Target annualized money-supply growth rate (fraction)
    pub target_growth_rate: f64,

    /// EMA decay factor, close to 1 (higher = slower-moving average)
    pub lookback: f64,

    /// Shortfall below target that counts as meaningfully below (fraction)
    pub easing_margin: f64,

    /// Excess above target that counts as overheating (fraction)
    pub overheat_margin: f64,

    /// Size of one interest-rate move (fraction)
    pub rate_step: f64,

    /// Ceiling on the base interest rate (fraction)
    pub rate_ceiling: f64,

    /// Days between interest-rate moves
    pub rate_timer_days: u32,

    /// Emergency cash injected into every bank when the multiplier is pinned
    pub injection_amount: f64,

    /// Days before the first cash injection may fire
    pub print_timer_days: u32,

    /// Fraction of the theoretical multiplier ceiling (1 / reserve
    /// requirement) at which the injection check trips
    pub multiplier_headroom: f64,

    /// Size of one reserve-requirement move (fraction)
    pub reserve_step: f64,

    /// Floor on the reserve requirement (fraction)
    pub reserve_floor: f64,

    /// Days between reserve-requirement moves
    pub reserve_timer_days: u32,

    /// Growth shortfall beyond which the reserve lever is used (fraction)
    pub reserve_shortfall_threshold: f64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            target_growth_rate: 0.02,
            lookback: 0.98,
            easing_margin: 0.005,
            overheat_margin: 0.005,
            rate_step: 0.0025,
            rate_ceiling: 0.20,
            rate_timer_days: 180,
            injection_amount: 1e5,
            print_timer_days: 365,
            multiplier_headroom: 0.9,
            reserve_step: 0.01,
            reserve_floor: 0.01,
            reserve_timer_days: 365,
            reserve_shortfall_threshold: 0.01,
        }
    }
}

/// A parameter change or emergency action taken by the controller
///
/// Injections are returned rather than applied: the controller does not own
/// the banks, so the orchestrator credits each bank and logs the action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PolicyAction {
    /// Base interest rate lowered by one step
    RateCut { old_rate: f64, new_rate: f64 },

    /// Base interest rate raised by one step
    RateHike { old_rate: f64, new_rate: f64 },

    /// Reserve requirement lowered by one step (floored)
    ReserveCut {
        old_requirement: f64,
        new_requirement: f64,
    },

    /// Fixed cash amount to inject into every bank
    CashInjection { amount_per_bank: f64 },
}

/// State machine over discrete days driving the shared monetary parameters
///
/// # Example
/// ```
/// use banking_simulator_core_rs::{MonetaryParams, PolicyConfig, PolicyController};
///
/// let mut params = MonetaryParams::default();
/// let mut controller = PolicyController::new(PolicyConfig::default(), 5e5);
///
/// // One simulated day: money supply flat at 5e5, hard cash 1e5.
/// let actions = controller.evaluate_day(5e5, 1e5, &mut params);
/// assert!(actions.is_empty()); // timers have not expired yet
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyController {
    config: PolicyConfig,

    /// Smoothed annualized growth-rate estimate
    growth_rate_ema: f64,

    /// Days until the next interest-rate move is allowed
    rate_timer: u32,

    /// Days until the first cash injection is allowed (never reset afterward)
    print_timer: u32,

    /// Days until the next reserve-requirement move is allowed
    reserve_timer: u32,

    /// Previous day's aggregate money supply
    last_money_supply: f64,
}

impl PolicyController {
    /// Create a controller primed with the starting money supply
    ///
    /// The EMA starts at the target growth rate and the timers at their
    /// configured lengths.
    pub fn new(config: PolicyConfig, initial_money_supply: f64) -> Self {
        Self {
            growth_rate_ema: config.target_growth_rate,
            rate_timer: config.rate_timer_days,
            print_timer: config.print_timer_days,
            reserve_timer: config.reserve_timer_days,
            last_money_supply: initial_money_supply,
            config,
        }
    }

    /// Get the smoothed growth-rate estimate
    pub fn growth_rate_ema(&self) -> f64 {
        self.growth_rate_ema
    }

    /// Days remaining on the interest-rate timer
    pub fn rate_timer(&self) -> u32 {
        self.rate_timer
    }

    /// Days remaining on the cash-injection timer
    pub fn print_timer(&self) -> u32 {
        self.print_timer
    }

    /// Days remaining on the reserve-requirement timer
    pub fn reserve_timer(&self) -> u32 {
        self.reserve_timer
    }

    /// Get the controller's configuration
    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Evaluate one simulated day
    ///
    /// Reads the aggregate money supply and hard cash, updates the smoothed
    /// growth estimate, mutates `params` in place for any rate or reserve
    /// move, and returns every action taken (including injections, which the
    /// caller applies to the banks).
    pub fn evaluate_day(
        &mut self,
        money_supply: f64,
        hard_cash: f64,
        params: &mut MonetaryParams,
    ) -> Vec<PolicyAction> {
        // 1. Instantaneous annualized growth, epsilon-guarded denominator
        let growth = (money_supply - self.last_money_supply)
            / self.last_money_supply.max(DENOMINATOR_EPSILON)
            * 365.0;
        self.last_money_supply = money_supply;

        // 2. Exponential smoothing
        self.growth_rate_ema =
            (1.0 - self.config.lookback) * growth + self.config.lookback * self.growth_rate_ema;

        // 3. Timers tick toward zero, never below
        self.rate_timer = self.rate_timer.saturating_sub(1);
        self.print_timer = self.print_timer.saturating_sub(1);
        self.reserve_timer = self.reserve_timer.saturating_sub(1);

        let mut actions = Vec::new();
        if !self.config.enabled {
            return actions;
        }

        let shortfall = self.config.target_growth_rate - self.growth_rate_ema;

        if shortfall > self.config.easing_margin {
            // 4a. Emergency injection when the multiplier is pinned near
            // its ceiling. The print timer is NOT reset after firing.
            if self.print_timer == 0 && self.multiplier_near_ceiling(money_supply, hard_cash, params)
            {
                actions.push(PolicyAction::CashInjection {
                    amount_per_bank: self.config.injection_amount,
                });
            }

            // 4b. Rate cut, floored at zero
            if self.rate_timer == 0 && params.base_interest_rate() > 0.0 {
                let old_rate = params.base_interest_rate();
                let new_rate = (old_rate - self.config.rate_step).max(0.0);
                params.set_base_interest_rate(new_rate);
                self.rate_timer = self.config.rate_timer_days;
                actions.push(PolicyAction::RateCut { old_rate, new_rate });
            }

            // 4c. Reserve cut on a large shortfall, floored
            if self.reserve_timer == 0
                && shortfall > self.config.reserve_shortfall_threshold
                && params.reserve_requirement() > self.config.reserve_floor
            {
                let old_requirement = params.reserve_requirement();
                let new_requirement =
                    (old_requirement - self.config.reserve_step).max(self.config.reserve_floor);
                params.set_reserve_requirement(new_requirement);
                self.reserve_timer = self.config.reserve_timer_days;
                actions.push(PolicyAction::ReserveCut {
                    old_requirement,
                    new_requirement,
                });
            }
        } else if self.growth_rate_ema - self.config.target_growth_rate
            > self.config.overheat_margin
            && self.rate_timer == 0
            && params.base_interest_rate() < self.config.rate_ceiling
        {
            // 5. Overheating: rate hike
            let old_rate = params.base_interest_rate();
            let new_rate = old_rate + self.config.rate_step;
            params.set_base_interest_rate(new_rate);
            self.rate_timer = self.config.rate_timer_days;
            actions.push(PolicyAction::RateHike { old_rate, new_rate });
        }

        actions
    }

    /// True when the money multiplier sits at or above the configured
    /// fraction of its theoretical ceiling (1 / reserve requirement), which
    /// means lending capacity is exhausted and only new hard cash can move
    /// the money supply.
    fn multiplier_near_ceiling(
        &self,
        money_supply: f64,
        hard_cash: f64,
        params: &MonetaryParams,
    ) -> bool {
        let multiplier = money_supply / hard_cash.max(DENOMINATOR_EPSILON);
        let ceiling = 1.0 / params.reserve_requirement();
        multiplier >= self.config.multiplier_headroom * ceiling
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_config() -> PolicyConfig {
        PolicyConfig {
            lookback: 0.5,
            rate_timer_days: 5,
            print_timer_days: 5,
            reserve_timer_days: 5,
            ..PolicyConfig::default()
        }
    }

    #[test]
    fn test_ema_starts_at_target() {
        let controller = PolicyController::new(PolicyConfig::default(), 1e5);
        assert_eq!(controller.growth_rate_ema(), 0.02);
    }

    #[test]
    fn test_timers_saturate_at_zero() {
        let mut params = MonetaryParams::default();
        let mut controller = PolicyController::new(fast_config(), 1e5);

        for _ in 0..20 {
            controller.evaluate_day(1e5, 1e5, &mut params);
        }
        // The print timer is never reset, so it saturates at zero.
        assert_eq!(controller.print_timer(), 0);
    }

    #[test]
    fn test_disabled_controller_takes_no_action() {
        let config = PolicyConfig {
            enabled: false,
            ..fast_config()
        };
        let mut params = MonetaryParams::default();
        let mut controller = PolicyController::new(config, 1e5);

        for _ in 0..50 {
            assert!(controller.evaluate_day(1e5, 1e5, &mut params).is_empty());
        }
        assert_eq!(params, MonetaryParams::default());
    }

    #[test]
    fn test_flat_supply_triggers_rate_cut_at_timer_expiry() {
        let mut params = MonetaryParams::default();
        let mut controller = PolicyController::new(fast_config(), 1e5);

        let mut cut_day = None;
        for day in 0..10 {
            let actions = controller.evaluate_day(1e5, 1e5, &mut params);
            if actions
                .iter()
                .any(|a| matches!(a, PolicyAction::RateCut { .. }))
            {
                cut_day = Some(day);
                break;
            }
        }

        // Timer length 5: the first cut lands the day the timer reaches zero.
        assert_eq!(cut_day, Some(4));
        assert!(params.base_interest_rate() < 0.045);
    }

    #[test]
    fn test_rate_cut_floors_at_zero() {
        let config = PolicyConfig {
            rate_step: 1.0,
            rate_timer_days: 1,
            lookback: 0.5,
            ..PolicyConfig::default()
        };
        let mut params = MonetaryParams::default();
        let mut controller = PolicyController::new(config, 1e5);

        for _ in 0..10 {
            controller.evaluate_day(1e5, 1e5, &mut params);
        }
        assert_eq!(params.base_interest_rate(), 0.0);
    }

    #[test]
    fn test_overheating_triggers_hike() {
        let mut params = MonetaryParams::default();
        let mut controller = PolicyController::new(fast_config(), 1e5);

        // 1% daily growth, annualized well above target
        let mut supply = 1e5;
        let mut hiked = false;
        for _ in 0..10 {
            supply *= 1.01;
            let actions = controller.evaluate_day(supply, 1e5, &mut params);
            if actions
                .iter()
                .any(|a| matches!(a, PolicyAction::RateHike { .. }))
            {
                hiked = true;
            }
        }
        assert!(hiked);
        assert!(params.base_interest_rate() > 0.045);
    }

    #[test]
    fn test_injection_refires_daily_once_conditions_hold() {
        let mut params = MonetaryParams::default();
        let mut controller = PolicyController::new(fast_config(), 1e6);

        // Multiplier 20, well past 0.9x the ceiling of 10; flat supply.
        let mut injections = 0;
        for _ in 0..10 {
            let actions = controller.evaluate_day(1e6, 5e4, &mut params);
            injections += actions
                .iter()
                .filter(|a| matches!(a, PolicyAction::CashInjection { .. }))
                .count();
        }
        // Timer expires on day 5 and is never reset: fires every day after.
        assert!(injections >= 5);
    }

    #[test]
    fn test_reserve_cut_floors_at_configured_minimum() {
        let config = PolicyConfig {
            lookback: 0.5,
            reserve_timer_days: 1,
            reserve_step: 0.05,
            reserve_floor: 0.02,
            ..PolicyConfig::default()
        };
        let mut params = MonetaryParams::default();
        let mut controller = PolicyController::new(config, 1e5);

        for _ in 0..20 {
            controller.evaluate_day(1e5, 1e5, &mut params);
        }
        assert_eq!(params.reserve_requirement(), 0.02);
    }

    #[test]
    fn test_epsilon_guard_on_zero_supply() {
        let mut params = MonetaryParams::default();
        let mut controller = PolicyController::new(fast_config(), 0.0);

        // Previous supply is zero; growth must stay finite.
        controller.evaluate_day(100.0, 100.0, &mut params);
        assert!(controller.growth_rate_ema().is_finite());
    }
}
