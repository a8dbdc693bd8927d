//! flowchef-cli library root.
//!
//! Exposes the config and command layers so integration tests can drive
//! them without going through argument parsing.

pub mod commands;
pub mod config;
