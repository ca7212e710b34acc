// Module exports for CLI subcommands.
//
// Each module handles one subcommand; main.rs parses arguments and
// dispatches to these handlers.

pub mod catalog;
pub mod codec;
pub mod generate;
pub mod recipes;
pub mod signals;
