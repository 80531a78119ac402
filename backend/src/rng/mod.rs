//! Deterministic random number generation
//!
//! One seeded xorshift64* stream drives every random choice the driver
//! makes; the banking core never draws randomness of its own.

mod xorshift;

pub use xorshift::RngManager;
