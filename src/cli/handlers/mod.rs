//! Command handlers for CLI operations
//!
//! This module contains handlers for different CLI commands,
//! separating command execution logic from parsing and validation.

pub mod approve;
pub mod serve;

pub use approve::ApproveCommandHandler;
pub use serve::ServeCommandHandler;
