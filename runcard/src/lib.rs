//! Running-stats normalization and styled image prompt composition.
//!
//! Users type a distance and an elapsed time, pick a visual style, and get a
//! prompt to send alongside their photo to an image-generation service. The
//! architecture enforces a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (keystroke normalization, pace,
//!   prompt composition). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (config and registry files, the
//!   external generator process). Isolated to enable fakes in tests.
//!
//! Orchestration modules ([`normalize`], [`compose`], [`generate`]) coordinate
//! core logic with I/O to implement CLI commands.

pub mod compose;
pub mod core;
pub mod exit_codes;
pub mod generate;
pub mod io;
pub mod logging;
pub mod normalize;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
