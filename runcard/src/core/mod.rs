//! Deterministic, pure logic: stats normalization and prompt composition.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data and return deterministic outputs suitable for tests; the only ambient
//! input, today's date, comes through an injected [`clock::Clock`].

pub mod clock;
pub mod distance;
pub mod error;
pub mod invariants;
pub mod pace;
pub mod prompt;
pub mod stats;
pub mod style;
pub mod time;
