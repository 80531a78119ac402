//! Tests for the monetary-policy control loop
//!
//! Drives the controller against synthetic money-supply series and checks
//! the shared-parameter handle semantics end to end against a bank.

use banking_simulator_core_rs::{
    Bank, MonetaryParams, PolicyAction, PolicyConfig, PolicyController,
};

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
fn test_stagnation_eases_the_rate_to_the_floor() {
    let mut params = MonetaryParams::default();
    let mut controller = PolicyController::new(fast_config(), 1e5);

    // Two years of a dead-flat money supply: each timer expiry cuts the rate
    // one step until it pins at zero, and it never goes negative or back up.
    let mut last_rate = params.base_interest_rate();
    for _ in 0..730 {
        let actions = controller.evaluate_day(1e5, 1e5, &mut params);
        assert!(!actions
            .iter()
            .any(|a| matches!(a, PolicyAction::RateHike { .. })));
        assert!(params.base_interest_rate() <= last_rate);
        assert!(params.base_interest_rate() >= 0.0);
        last_rate = params.base_interest_rate();
    }
    assert_eq!(params.base_interest_rate(), 0.0);
}

#[test]
fn test_boom_then_bust_moves_the_rate_both_ways() {
    let mut params = MonetaryParams::default();
    let mut controller = PolicyController::new(fast_config(), 1e5);

    // Boom: 1% daily growth pushes the smoothed estimate far above target.
    let mut supply = 1e5;
    for _ in 0..30 {
        supply *= 1.01;
        controller.evaluate_day(supply, 1e5, &mut params);
    }
    let peak_rate = params.base_interest_rate();
    assert!(peak_rate > 0.045);

    // Bust: a flat supply drags the estimate back below target.
    for _ in 0..60 {
        controller.evaluate_day(supply, 1e5, &mut params);
    }
    assert!(params.base_interest_rate() < peak_rate);
}

#[test]
fn test_reserve_cut_unblocks_a_pinned_bank() {
    let config = PolicyConfig {
        lookback: 0.5,
        reserve_timer_days: 1,
        reserve_step: 0.05,
        ..PolicyConfig::default()
    };
    let mut params = MonetaryParams::default();
    let mut controller = PolicyController::new(config, 1e5);

    let mut bank = Bank::new(0.0);
    bank.open_account(0.045, 1_000.0);
    assert_eq!(bank.withdraw_cash(890.0, &params), 890.0);

    // At a 10% requirement the 100 floor blocks this release.
    assert_eq!(bank.withdraw_cash(15.0, &params), 0.0);

    // Stagnation trips the reserve lever within a few days.
    for _ in 0..5 {
        controller.evaluate_day(1e5, 1e5, &mut params);
    }
    assert!(params.reserve_requirement() < 0.10);

    // The bank reads the shared handle fresh: the same request now clears.
    assert_eq!(bank.withdraw_cash(15.0, &params), 15.0);
}

#[test]
fn test_injection_needs_a_pinned_multiplier() {
    let mut params = MonetaryParams::default();
    let mut controller = PolicyController::new(fast_config(), 1e6);

    // Multiplier 2, nowhere near 0.9x the ceiling of 10: stagnation alone
    // never fires the printing press.
    for _ in 0..20 {
        let actions = controller.evaluate_day(1e6, 5e5, &mut params);
        assert!(!actions
            .iter()
            .any(|a| matches!(a, PolicyAction::CashInjection { .. })));
    }
}
