//! Fractional-Reserve Banking Simulator - Rust Engine
//!
//! Discrete-time, agent-based simulation of fractional-reserve banking with
//! deterministic execution. A set of banks hold cash reserves, issue deposit
//! accounts, and originate amortizing loans, while a central-bank policy loop
//! adjusts the system-wide interest rate and reserve requirement in response
//! to money-supply growth.
//!
//! # Architecture
//!
//! - **core**: Day-stepped simulation clock
//! - **models**: Domain types (Account, Loan, Bank, events)
//! - **policy**: Shared monetary parameters and the policy controller
//! - **orchestrator**: Main simulation loop (loan payments, transaction
//!   generation, daily accrual, policy evaluation)
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. Account balances are never negative
//! 2. Every cash outflow re-validates the reserve requirement before committing
//! 3. All randomness is deterministic (seeded RNG)

// Module declarations
pub mod core;
pub mod models;
pub mod orchestrator;
pub mod policy;
pub mod rng;

// Re-exports for convenience
pub use crate::core::time::DayClock;
pub use models::{
    account::Account,
    bank::{Bank, BankError},
    event::{Event, EventLog},
    loan::Loan,
    SimulationEntity,
};
pub use orchestrator::{BankConfig, DayResult, Orchestrator, OrchestratorConfig, SimulationError};
pub use policy::{MonetaryParams, PolicyAction, PolicyConfig, PolicyController};
pub use rng::RngManager;
