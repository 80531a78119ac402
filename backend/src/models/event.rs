//! Event logging for simulation replay and auditing.
//!
//! Captures every significant state change during a run:
//! - **Origination**: loans issued or refused by the reserve check
//! - **Payments**: installments made, shortfalls redeposited, payoffs
//! - **Policy**: rate changes, reserve-requirement changes, cash injections
//! - **EndOfDay**: daily money-supply summary
//!
//! Events are the simulator's observability surface; drivers render them or
//! aggregate them into metrics.

use serde::{Deserialize, Serialize};

/// Simulation event capturing a state change.
///
/// All events include the simulated day for temporal ordering. Banks are
/// identified by their index in the orchestrator's bank list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// A deposit account was opened (external cash inflow)
    AccountOpened {
        day: usize,
        bank: usize,
        account_id: u64,
        initial_deposit: f64,
    },

    /// A loan was originated and its principal released
    LoanOriginated {
        day: usize,
        bank: usize,
        loan_id: u64,
        principal: f64,
        quoted_rate: f64,
        term_months: u32,
    },

    /// A loan request was refused by the reserve requirement
    LoanRejected {
        day: usize,
        bank: usize,
        amount: f64,
    },

    /// An installment was paid in full
    LoanPaymentMade {
        day: usize,
        bank: usize,
        loan_id: u64,
        amount: f64,
    },

    /// A withdrawal for an installment was only partially honored;
    /// the released cash was redeposited and the payment deferred
    PaymentShortfall {
        day: usize,
        bank: usize,
        loan_id: u64,
        requested: f64,
        released: f64,
    },

    /// A loan's term reached zero
    LoanPaidOff {
        day: usize,
        bank: usize,
        loan_id: u64,
    },

    /// The policy controller moved the shared base interest rate
    RateChange {
        day: usize,
        old_rate: f64,
        new_rate: f64,
    },

    /// The policy controller moved the shared reserve requirement
    ReserveChange {
        day: usize,
        old_requirement: f64,
        new_requirement: f64,
    },

    /// Emergency cash injected into every bank
    CashInjection {
        day: usize,
        amount_per_bank: f64,
        num_banks: usize,
    },

    /// Daily money-supply summary
    EndOfDay {
        day: usize,
        money_supply: f64,
        growth_rate_ema: f64,
    },
}

impl Event {
    /// Get the simulated day when this event occurred
    pub fn day(&self) -> usize {
        match self {
            Event::AccountOpened { day, .. } => *day,
            Event::LoanOriginated { day, .. } => *day,
            Event::LoanRejected { day, .. } => *day,
            Event::LoanPaymentMade { day, .. } => *day,
            Event::PaymentShortfall { day, .. } => *day,
            Event::LoanPaidOff { day, .. } => *day,
            Event::RateChange { day, .. } => *day,
            Event::ReserveChange { day, .. } => *day,
            Event::CashInjection { day, .. } => *day,
            Event::EndOfDay { day, .. } => *day,
        }
    }

    /// Get a short description of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::AccountOpened { .. } => "AccountOpened",
            Event::LoanOriginated { .. } => "LoanOriginated",
            Event::LoanRejected { .. } => "LoanRejected",
            Event::LoanPaymentMade { .. } => "LoanPaymentMade",
            Event::PaymentShortfall { .. } => "PaymentShortfall",
            Event::LoanPaidOff { .. } => "LoanPaidOff",
            Event::RateChange { .. } => "RateChange",
            Event::ReserveChange { .. } => "ReserveChange",
            Event::CashInjection { .. } => "CashInjection",
            Event::EndOfDay { .. } => "EndOfDay",
        }
    }

    /// Get the bank index if the event relates to a specific bank
    pub fn bank(&self) -> Option<usize> {
        match self {
            Event::AccountOpened { bank, .. } => Some(*bank),
            Event::LoanOriginated { bank, .. } => Some(*bank),
            Event::LoanRejected { bank, .. } => Some(*bank),
            Event::LoanPaymentMade { bank, .. } => Some(*bank),
            Event::PaymentShortfall { bank, .. } => Some(*bank),
            Event::LoanPaidOff { bank, .. } => Some(*bank),
            _ => None,
        }
    }
}

/// Event log for storing and querying simulation events.
///
/// A simple wrapper around `Vec<Event>` with convenience queries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Add an event to the log
    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Get the number of events logged
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the log is empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Get all events
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Get events for a specific day
    pub fn events_on_day(&self, day: usize) -> Vec<&Event> {
        self.events.iter().filter(|e| e.day() == day).collect()
    }

    /// Get events of a specific type
    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Get events for a specific bank
    pub fn events_for_bank(&self, bank: usize) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.bank() == Some(bank))
            .collect()
    }

    /// Clear all events
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
