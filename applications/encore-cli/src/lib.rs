//! Encore CLI Library
//!
//! Terminal front end for the playback engine: catalog loading,
//! configuration, typed commands, status rendering and the session loop.
//!
//! This library exposes the core components for testing purposes.

pub mod catalog;
pub mod command;
pub mod config;
pub mod error;
pub mod render;
pub mod session;

// Re-export commonly used types for convenience
pub use catalog::Catalog;
pub use command::Command;
pub use config::CliConfig;
pub use error::{CliError, Result};
pub use session::Session;
