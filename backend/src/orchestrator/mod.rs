//! Orchestrator - main simulation loop
//!
//! Ticks every bank once per simulated day, generates loan and transfer
//! events, feeds loan payments through deposit accounts, and invokes the
//! policy controller.
//!
//! See `engine.rs` for the full implementation.

pub mod engine;

// Re-export main types for convenience
pub use engine::{BankConfig, DayResult, Orchestrator, OrchestratorConfig, SimulationError};
