//! I/O helpers for runcard commands.

pub mod config;
pub mod generator;
pub mod process;
pub mod registry;
