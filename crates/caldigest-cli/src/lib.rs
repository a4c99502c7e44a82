//! CLI, config, mail delivery, HTTP serving
//!
//! This crate provides the `caldigest` command-line interface.

pub mod cli;
pub mod config;
pub mod error;
pub mod mail;
pub mod serve;

pub use cli::Cli;
pub use config::Settings;
pub use error::{ClientError, ClientResult};
