//! Gut feeling CLI library.
//!
//! This crate provides the CLI interface for the food and mood journal.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, LogEntry, MealArgs, SymptomArgs};
pub use config::Config;
