//! blueprint-kit CLI library.
//!
//! Subcommand handlers and input/output helpers for the `blueprint-kit`
//! binary. Handlers return their output as strings so `main.rs` only
//! decides where it goes.

pub mod commands;
pub mod input;
