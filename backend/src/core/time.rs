//! Time management for the simulation
//!
//! The simulation operates in discrete days. One day is one fully-ordered
//! pass of the orchestrator loop. This module provides deterministic time
//! advancement.

use serde::{Deserialize, Serialize};

/// Tracks simulation time in discrete days
///
/// # Example
/// ```
/// use banking_simulator_core_rs::DayClock;
///
/// let mut clock = DayClock::new(365);
/// assert_eq!(clock.current_day(), 0);
/// assert!(!clock.is_finished());
///
/// clock.advance_day();
/// assert_eq!(clock.current_day(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayClock {
    /// Days elapsed since simulation start
    current_day: usize,
    /// Total days the simulation will run
    num_days: usize,
}

impl DayClock {
    /// Create a new DayClock
    ///
    /// # Arguments
    /// * `num_days` - Total simulation duration in days
    ///
    /// # Example
    /// ```
    /// use banking_simulator_core_rs::DayClock;
    ///
    /// let clock = DayClock::new(365 * 20);
    /// ```
    pub fn new(num_days: usize) -> Self {
        assert!(num_days > 0, "num_days must be positive");
        Self {
            current_day: 0,
            num_days,
        }
    }

    /// Advance time by one day
    pub fn advance_day(&mut self) {
        self.current_day += 1;
    }

    /// Get the current day (0-indexed)
    pub fn current_day(&self) -> usize {
        self.current_day
    }

    /// Get total simulation duration in days
    pub fn num_days(&self) -> usize {
        self.num_days
    }

    /// Check whether the simulation has run its full duration
    ///
    /// # Example
    /// ```
    /// use banking_simulator_core_rs::DayClock;
    ///
    /// let mut clock = DayClock::new(2);
    /// clock.advance_day();
    /// clock.advance_day();
    /// assert!(clock.is_finished());
    /// ```
    pub fn is_finished(&self) -> bool {
        self.current_day >= self.num_days
    }
}
