//! Tooling & Integration Layer
//!
//! Command-line front end over the catalog builder.

pub mod cli;

pub use cli::{Cli, CliContext, Commands};
