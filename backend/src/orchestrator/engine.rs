//! Orchestrator Engine
//!
//! Main simulation loop integrating all components:
//! - Loan payments (monthly schedule fed through deposit accounts)
//! - Transaction generation (randomized loan originations and transfers)
//! - Daily interest accrual (per-bank tick)
//! - Policy evaluation (shared rate / reserve-requirement control loop)
//! - Event logging (complete simulation history)
//!
//! # Day loop
//!
//! ```text
//! For each day d:
//! 1. Pay loans due in monthly bucket d % 30
//! 2. Generate new transactions (loan + deposit pairs)
//! 3. Tick every bank once (interest accrual)
//! 4. Evaluate monetary policy, apply any cash injection
//! 5. Log end-of-day summary, advance the clock
//! ```
//!
//! # Example
//!
//! ```rust
//! use banking_simulator_core_rs::{Orchestrator, OrchestratorConfig};
//!
//! let mut config = OrchestratorConfig::default();
//! config.num_days = 30;
//!
//! let mut orchestrator = Orchestrator::new(config).unwrap();
//! let results = orchestrator.run().unwrap();
//! assert_eq!(results.len(), 30);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::time::DayClock;
use crate::models::bank::{Bank, BankError};
use crate::models::event::{Event, EventLog};
use crate::models::loan::Loan;
use crate::models::SimulationEntity;
use crate::policy::{MonetaryParams, PolicyAction, PolicyConfig, PolicyController};
use crate::rng::RngManager;

/// Days per scheduling month. Loans amortize in calendar-free months; this
/// is the single place the day-stepped driver converts days to months.
const MONTH_LENGTH_DAYS: usize = 30;

/// An installment counts as paid only when the released cash matches the
/// requested amount to within this tolerance.
const PAYMENT_EPSILON: f64 = 1e-4;

// ============================================================================
// Configuration Types
// ============================================================================

/// Per-bank configuration
///
/// Each bank starts with an opening cash reserve and one seed deposit
/// account that transfers and loan payments flow through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BankConfig {
    /// Opening cash reserve
    pub opening_cash: f64,

    /// Initial deposit for the bank's seed account (external cash inflow)
    pub initial_deposit: f64,
}

impl Default for BankConfig {
    fn default() -> Self {
        Self {
            opening_cash: 0.0,
            initial_deposit: 1e5,
        }
    }
}

/// Complete orchestrator configuration
///
/// The default reproduces the reference scenario: five banks with zero
/// opening cash and one 1e5 seed deposit each, 25 transactions per day,
/// twenty simulated years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Number of days to simulate
    pub num_days: usize,

    /// RNG seed for deterministic simulation
    pub rng_seed: u64,

    /// Per-bank configuration
    pub bank_configs: Vec<BankConfig>,

    /// Randomized loan/transfer events generated per day
    pub transactions_per_day: usize,

    /// Spread quoted over the base interest rate on new loans
    pub loan_spread: f64,

    /// Loan sizes are drawn uniformly from [min, max)
    pub loan_amount_min: u64,
    pub loan_amount_max: u64,

    /// Starting values for the shared monetary parameters
    pub params: MonetaryParams,

    /// Policy controller tuning
    pub policy: PolicyConfig,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            num_days: 365 * 20,
            rng_seed: 12345,
            bank_configs: vec![BankConfig::default(); 5],
            transactions_per_day: 25,
            loan_spread: 0.025,
            loan_amount_min: 100,
            loan_amount_max: 600,
            params: MonetaryParams::default(),
            policy: PolicyConfig::default(),
        }
    }
}

/// Simulation error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// Configuration validation error
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Bank-boundary contract violation surfaced to the driver
    #[error(transparent)]
    Bank(#[from] BankError),
}

/// Result of a single simulated day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayResult {
    /// Day number (0-indexed)
    pub day: usize,

    /// Aggregate money supply (sum of per-bank net assets) at end of day
    pub money_supply: f64,

    /// Aggregate hard cash across all banks at end of day
    pub hard_cash: f64,

    /// Controller's smoothed growth estimate after this day
    pub growth_rate_ema: f64,

    /// Loans originated this day
    pub loans_originated: usize,

    /// Loan requests refused by the reserve requirement this day
    pub loans_rejected: usize,

    /// Installments paid in full this day
    pub payments_made: usize,

    /// Installments deferred because the withdrawal fell short
    pub payment_shortfalls: usize,

    /// Policy actions taken this day
    pub policy_actions: Vec<PolicyAction>,
}

// ============================================================================
// Orchestrator
// ============================================================================

/// Main orchestrator owning all simulation state
///
/// # Determinism
///
/// All randomness is via a seeded xorshift64* RNG. Same seed + same config
/// = identical results (deterministic replay).
pub struct Orchestrator {
    /// The simulated banks; events refer to banks by index here
    banks: Vec<Bank>,

    /// Seed account id per bank (parallel to `banks`)
    seed_accounts: Vec<u64>,

    /// Day-stepped clock
    clock: DayClock,

    /// Deterministic RNG for loan sizing, terms, and counterparty selection
    rng: RngManager,

    /// Shared monetary parameters; read by banks, written by the controller
    params: MonetaryParams,

    /// Central-bank policy controller
    controller: PolicyController,

    /// Monthly payment schedule: bucket `d % 30` holds (bank index, loan id)
    /// pairs due on day d. Paid-off loans leave the schedule but stay
    /// registered at their bank.
    payment_schedule: Vec<Vec<(usize, u64)>>,

    /// Generated loan/transfer events per day
    transactions_per_day: usize,

    /// Spread over the base rate quoted on new loans
    loan_spread: f64,

    /// Loan size range [min, max)
    loan_amount_min: u64,
    loan_amount_max: u64,

    /// Event log (all simulation events)
    event_log: EventLog,
}

impl Orchestrator {
    /// Create a new orchestrator from configuration
    ///
    /// Builds every bank, opens its seed account at the current base rate,
    /// and primes the policy controller with the starting money supply.
    ///
    /// # Errors
    ///
    /// Returns `SimulationError::InvalidConfig` when the configuration fails
    /// validation.
    pub fn new(config: OrchestratorConfig) -> Result<Self, SimulationError> {
        Self::validate_config(&config)?;

        let mut event_log = EventLog::new();
        let mut banks = Vec::with_capacity(config.bank_configs.len());
        let mut seed_accounts = Vec::with_capacity(config.bank_configs.len());

        for (idx, bank_config) in config.bank_configs.iter().enumerate() {
            let mut bank = Bank::new(bank_config.opening_cash);
            let account_id =
                bank.open_account(config.params.base_interest_rate(), bank_config.initial_deposit);
            event_log.log(Event::AccountOpened {
                day: 0,
                bank: idx,
                account_id,
                initial_deposit: bank_config.initial_deposit,
            });
            banks.push(bank);
            seed_accounts.push(account_id);
        }

        let initial_money_supply = banks.iter().map(Bank::compute_net_assets).sum();
        let controller = PolicyController::new(config.policy, initial_money_supply);

        Ok(Self {
            banks,
            seed_accounts,
            clock: DayClock::new(config.num_days),
            rng: RngManager::new(config.rng_seed),
            params: config.params,
            controller,
            payment_schedule: vec![Vec::new(); MONTH_LENGTH_DAYS],
            transactions_per_day: config.transactions_per_day,
            loan_spread: config.loan_spread,
            loan_amount_min: config.loan_amount_min,
            loan_amount_max: config.loan_amount_max,
            event_log,
        })
    }

    /// Validate configuration
    fn validate_config(config: &OrchestratorConfig) -> Result<(), SimulationError> {
        if config.num_days == 0 {
            return Err(SimulationError::InvalidConfig(
                "num_days must be > 0".to_string(),
            ));
        }

        if config.bank_configs.is_empty() {
            return Err(SimulationError::InvalidConfig(
                "Must have at least one bank".to_string(),
            ));
        }

        if config.loan_amount_min >= config.loan_amount_max {
            return Err(SimulationError::InvalidConfig(
                "loan_amount_min must be below loan_amount_max".to_string(),
            ));
        }

        for (idx, bank_config) in config.bank_configs.iter().enumerate() {
            if bank_config.opening_cash < 0.0 || bank_config.initial_deposit < 0.0 {
                return Err(SimulationError::InvalidConfig(format!(
                    "bank {} has negative opening cash or deposit",
                    idx
                )));
            }
        }

        // Scenario files deserialize straight into the policy and parameter
        // structs, so bounds the setters would assert on are rejected here.
        let policy = &config.policy;
        if !(0.0..1.0).contains(&policy.lookback) {
            return Err(SimulationError::InvalidConfig(
                "policy.lookback must be in [0, 1)".to_string(),
            ));
        }
        if policy.reserve_floor <= 0.0 || policy.reserve_floor > 1.0 {
            return Err(SimulationError::InvalidConfig(
                "policy.reserve_floor must be in (0, 1]".to_string(),
            ));
        }
        if policy.rate_step < 0.0 || policy.reserve_step < 0.0 {
            return Err(SimulationError::InvalidConfig(
                "policy step sizes must be non-negative".to_string(),
            ));
        }
        if config.params.reserve_requirement() <= 0.0
            || config.params.reserve_requirement() > 1.0
            || config.params.base_interest_rate() < 0.0
        {
            return Err(SimulationError::InvalidConfig(
                "reserve requirement must be in (0, 1] and the base rate non-negative"
                    .to_string(),
            ));
        }

        Ok(())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Get current day number
    pub fn current_day(&self) -> usize {
        self.clock.current_day()
    }

    /// Whether the configured run length has elapsed
    pub fn is_finished(&self) -> bool {
        self.clock.is_finished()
    }

    /// Get all banks
    pub fn banks(&self) -> &[Bank] {
        &self.banks
    }

    /// Get a bank by index
    pub fn bank(&self, idx: usize) -> Option<&Bank> {
        self.banks.get(idx)
    }

    /// Get the seed account id of a bank
    pub fn seed_account(&self, idx: usize) -> Option<u64> {
        self.seed_accounts.get(idx).copied()
    }

    /// Get the shared monetary parameters
    pub fn params(&self) -> &MonetaryParams {
        &self.params
    }

    /// Get the policy controller
    pub fn controller(&self) -> &PolicyController {
        &self.controller
    }

    /// Get reference to the event log
    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    /// Aggregate money supply: sum of per-bank net assets
    pub fn money_supply(&self) -> f64 {
        self.banks.iter().map(Bank::compute_net_assets).sum()
    }

    /// Aggregate hard cash across all banks
    pub fn hard_cash(&self) -> f64 {
        self.banks.iter().map(Bank::cash_on_hand).sum()
    }

    // ========================================================================
    // Day Loop Implementation
    // ========================================================================

    /// Execute one simulated day
    ///
    /// Runs the fully-ordered daily pass: loan payments, then new
    /// transactions, then per-bank accrual, then policy evaluation.
    pub fn step_day(&mut self) -> Result<DayResult, SimulationError> {
        let day = self.clock.current_day();
        let bucket = day % MONTH_LENGTH_DAYS;

        // STEP 1: LOAN PAYMENTS
        let (payments_made, payment_shortfalls) = self.pay_due_loans(day, bucket)?;

        // STEP 2: NEW TRANSACTIONS
        let (loans_originated, loans_rejected) = self.generate_transactions(day, bucket)?;

        // STEP 3: DAILY ACCRUAL
        for bank in &mut self.banks {
            bank.simulate(1.0);
        }

        // STEP 4: POLICY EVALUATION
        let money_supply = self.money_supply();
        let hard_cash = self.hard_cash();
        let policy_actions = self
            .controller
            .evaluate_day(money_supply, hard_cash, &mut self.params);
        self.apply_policy_actions(day, &policy_actions);

        // STEP 5: END OF DAY
        let growth_rate_ema = self.controller.growth_rate_ema();
        self.event_log.log(Event::EndOfDay {
            day,
            money_supply,
            growth_rate_ema,
        });
        self.clock.advance_day();

        Ok(DayResult {
            day,
            money_supply,
            hard_cash,
            growth_rate_ema,
            loans_originated,
            loans_rejected,
            payments_made,
            payment_shortfalls,
            policy_actions,
        })
    }

    /// Run the simulation to completion, collecting every day's result
    pub fn run(&mut self) -> Result<Vec<DayResult>, SimulationError> {
        let mut results = Vec::with_capacity(self.clock.num_days() - self.clock.current_day());
        while !self.clock.is_finished() {
            results.push(self.step_day()?);
        }
        Ok(results)
    }

    /// Pay every loan due in this month's bucket
    ///
    /// The installment is withdrawn from a randomly selected bank's seed
    /// account (borrowers are anonymous counterparties spread across the
    /// system). A payment only counts when the released cash matches the
    /// installment; on a shortfall the released cash is redeposited and the
    /// loan retries next month.
    fn pay_due_loans(
        &mut self,
        day: usize,
        bucket: usize,
    ) -> Result<(usize, usize), SimulationError> {
        let mut payments_made = 0;
        let mut payment_shortfalls = 0;

        let due = std::mem::take(&mut self.payment_schedule[bucket]);
        let mut retained = Vec::with_capacity(due.len());

        for (bank_idx, loan_id) in due {
            let loan = self.banks[bank_idx]
                .loan(loan_id)
                .ok_or(BankError::UnknownLoan(loan_id))?;
            if loan.is_paid_off() {
                // Drops out of the schedule; stays registered at the bank.
                continue;
            }
            let installment = loan.payment_amount();

            let payer = self.rng.index(self.banks.len());
            let account_id = self.seed_accounts[payer];
            let released =
                self.banks[payer].withdraw_from(account_id, installment, &self.params)?;

            if (installment - released).abs() < PAYMENT_EPSILON {
                self.banks[bank_idx].make_loan_payment(loan_id)?;
                payments_made += 1;
                self.event_log.log(Event::LoanPaymentMade {
                    day,
                    bank: bank_idx,
                    loan_id,
                    amount: installment,
                });

                if self.banks[bank_idx]
                    .loan(loan_id)
                    .is_some_and(Loan::is_paid_off)
                {
                    self.event_log.log(Event::LoanPaidOff {
                        day,
                        bank: bank_idx,
                        loan_id,
                    });
                } else {
                    retained.push((bank_idx, loan_id));
                }
            } else {
                // Shortfall: return what was released and retry next month.
                self.banks[payer].deposit_to(account_id, released)?;
                payment_shortfalls += 1;
                self.event_log.log(Event::PaymentShortfall {
                    day,
                    bank: bank_idx,
                    loan_id,
                    requested: installment,
                    released,
                });
                retained.push((bank_idx, loan_id));
            }
        }

        self.payment_schedule[bucket] = retained;
        Ok((payments_made, payment_shortfalls))
    }

    /// Generate the day's randomized transactions
    ///
    /// Each transaction is a loan taken out at one bank and deposited at
    /// another: the originating bank's reserve check gates the event, and on
    /// success the proceeds land in the receiving bank's seed account while
    /// the loan joins this month's payment bucket.
    fn generate_transactions(
        &mut self,
        day: usize,
        bucket: usize,
    ) -> Result<(usize, usize), SimulationError> {
        let mut loans_originated = 0;
        let mut loans_rejected = 0;

        for _ in 0..self.transactions_per_day {
            let from = self.rng.index(self.banks.len());
            let to = self.rng.index(self.banks.len());
            let amount = self.rng.range(self.loan_amount_min, self.loan_amount_max) as f64;
            let quoted_rate = self.params.base_interest_rate() + self.loan_spread;

            match self.banks[from].open_loan(quoted_rate, amount, &self.params, &mut self.rng) {
                Some(loan_id) => {
                    self.banks[to].deposit_to(self.seed_accounts[to], amount)?;
                    self.payment_schedule[bucket].push((from, loan_id));
                    loans_originated += 1;

                    let term_months = self.banks[from]
                        .loan(loan_id)
                        .ok_or(BankError::UnknownLoan(loan_id))?
                        .months_remaining();
                    self.event_log.log(Event::LoanOriginated {
                        day,
                        bank: from,
                        loan_id,
                        principal: amount,
                        quoted_rate,
                        term_months,
                    });
                }
                None => {
                    loans_rejected += 1;
                    self.event_log.log(Event::LoanRejected {
                        day,
                        bank: from,
                        amount,
                    });
                }
            }
        }

        Ok((loans_originated, loans_rejected))
    }

    /// Apply and log the day's policy actions
    ///
    /// Rate and reserve moves already landed in the shared parameters; cash
    /// injections are applied here because the controller does not own the
    /// banks.
    fn apply_policy_actions(&mut self, day: usize, actions: &[PolicyAction]) {
        for action in actions {
            match action {
                PolicyAction::CashInjection { amount_per_bank } => {
                    for bank in &mut self.banks {
                        bank.deposit_cash(*amount_per_bank);
                    }
                    self.event_log.log(Event::CashInjection {
                        day,
                        amount_per_bank: *amount_per_bank,
                        num_banks: self.banks.len(),
                    });
                }
                PolicyAction::RateCut { old_rate, new_rate }
                | PolicyAction::RateHike { old_rate, new_rate } => {
                    self.event_log.log(Event::RateChange {
                        day,
                        old_rate: *old_rate,
                        new_rate: *new_rate,
                    });
                }
                PolicyAction::ReserveCut {
                    old_requirement,
                    new_requirement,
                } => {
                    self.event_log.log(Event::ReserveChange {
                        day,
                        old_requirement: *old_requirement,
                        new_requirement: *new_requirement,
                    });
                }
            }
        }
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("current_day", &self.current_day())
            .field("num_banks", &self.banks.len())
            .field("money_supply", &self.money_supply())
            .field("event_count", &self.event_log.len())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
