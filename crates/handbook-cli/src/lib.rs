//! # handbook-cli
//!
//! The `handbook` command-line tool:
//! - `build`: render the content set to a static directory
//! - `nav`: print the navigation tree
//! - `show`: run the page controller for one route
//! - `check`: find unreadable files and broken references
//! - `config`: manage the TOML configuration

#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_handlers;

pub use cli::{Cli, Command, ConfigAction};
pub use config::HandbookConfig;
