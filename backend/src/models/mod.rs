//! Domain models for the banking simulator

pub mod account;
pub mod bank;
pub mod event;
pub mod loan;

// Re-exports
pub use account::Account;
pub use bank::{Bank, BankError};
pub use event::{Event, EventLog};
pub use loan::Loan;

/// Anything that evolves over simulated time.
///
/// One call with `days = 1.0` is one simulated day. Implementors must treat
/// `days = 0.0` as a no-op.
pub trait SimulationEntity {
    fn simulate(&mut self, days: f64);
}
