//! Command executor for dispatching CLI commands
//!
//! This module provides the main entry point for executing CLI commands
//! after parsing and configuration loading.

use super::handlers::{ApproveCommandHandler, ServeCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::settings::Settings;
use crate::error::AppResult;

/// Execute a CLI command with the given settings
///
/// Running without a subcommand is the same as `serve`.
///
/// # Errors
/// Returns errors from command handlers
pub async fn execute_command(cli: &Cli, settings: Settings) -> AppResult<()> {
    warn_about_serve_args(cli);

    match &cli.command {
        Some(Commands::Serve { dry_run, .. }) => {
            ServeCommandHandler::new(settings).execute(*dry_run).await
        }
        None => ServeCommandHandler::new(settings).execute(false).await,
        Some(Commands::Approve { id }) => ApproveCommandHandler::new(settings).execute(*id).await,
    }
}

fn warn_about_serve_args(cli: &Cli) {
    if let Some(Commands::Serve {
        host: Some(host_addr),
        port: Some(port_num),
        ..
    }) = &cli.command
        && *port_num < 1024
        && host_addr == "0.0.0.0"
    {
        eprintln!("Warning: Binding to 0.0.0.0 on port {port_num} requires root privileges");
    }
}
