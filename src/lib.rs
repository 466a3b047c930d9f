//! Command-line host for the depseal dependency integrity engine.
//!
//! The host loads configuration, reads the resolved-artifact listing exported
//! by the build, and drives [`depseal_engine`] to either verify the listing
//! against a committed manifest or regenerate that manifest.
//!
//! # Modules
//!
//! - [`cli`] - Command-line argument definitions
//! - [`commands`] - `verify` and `generate` command handlers
//! - [`config`] - `depseal.toml` loading and CLI overrides
//! - [`error`] - Host error types
//! - [`listing`] - Resolved-artifact listing ingestion

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod listing;

pub use config::DepsealConfig;
pub use error::{DepsealError, Result};
