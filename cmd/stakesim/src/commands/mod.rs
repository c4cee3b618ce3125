//! Subcommand implementations.

pub mod run;
pub mod verify;
