//! Command-line surface: `serve` (the default) and `approve <ID>`.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Backend for the Domify services marketplace
#[derive(Parser, Debug)]
#[command(name = "domify")]
#[command(about = "Backend for the Domify services marketplace")]
#[command(long_about = "
Domify serves the provider application workflow: applicants submit an
application, admins review it, and approval provisions the provider's
account, profiles and categories on the hosted backend.

EXAMPLES:
    # Start the server with default configuration
    domify serve

    # Start server on custom host and port
    domify serve --host 0.0.0.0 --port 8080

    # Use custom configuration file
    domify --config /path/to/config.toml serve

    # Check configuration without starting server
    domify serve --dry-run

    # Approve application 42 from the command line
    domify approve 42
")]
#[command(version = crate::clap_long_version())]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file path
    ///
    /// Load settings from this single TOML file instead of the layered
    /// config directory. Environment variables still apply on top.
    ///
    /// Example: --config /etc/domify/production.toml
    #[arg(short, long, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Override environment detection
    ///
    /// Selects which `{environment}.toml` layer is loaded.
    #[arg(short, long, value_enum)]
    pub env: Option<Environment>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the web server (default)
    ///
    /// Examples:
    ///   domify serve                           # Start with defaults
    ///   domify serve --host 0.0.0.0 --port 80 # Bind to all interfaces on port 80
    ///   domify serve --dry-run                 # Validate config without starting
    Serve {
        /// Host address to bind to
        ///
        /// Default: 127.0.0.1
        #[arg(long, value_name = "ADDRESS", value_parser = super::validation::validate_host_address)]
        host: Option<String>,

        /// Port number to listen on
        ///
        /// Default: 3000
        #[arg(short, long, value_name = "PORT", value_parser = super::validation::validate_port)]
        port: Option<u16>,

        /// Log level override
        ///
        /// Takes precedence over the configuration file and --verbose/--quiet.
        #[arg(long, value_enum)]
        log_level: Option<LogLevel>,

        /// Validate configuration and exit
        #[arg(long)]
        dry_run: bool,
    },
    /// Approve a provider application
    ///
    /// Runs the same approval workflow as the admin endpoint and prints the
    /// result as JSON. Safe to re-run: an approved application is reported
    /// as already approved.
    ///
    /// Example:
    ///   domify approve 42
    Approve {
        /// Application ID
        #[arg(value_name = "ID", value_parser = super::validation::validate_application_id)]
        id: i64,
    },
}

/// Mirrors `config::Environment` so clap can list the choices.
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Environment {
    #[value(name = "development", alias = "dev")]
    Development,
    #[value(name = "test")]
    Test,
    #[value(name = "staging", alias = "stage")]
    Staging,
    #[value(name = "production", alias = "prod")]
    Production,
}

#[derive(ValueEnum, Clone, Debug)]
pub enum LogLevel {
    #[value(name = "error")]
    Error,
    #[value(name = "warn", alias = "warning")]
    Warn,
    #[value(name = "info")]
    Info,
    #[value(name = "debug")]
    Debug,
    #[value(name = "trace")]
    Trace,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        level.as_str().to_string()
    }
}

impl From<Environment> for crate::config::Environment {
    fn from(env: Environment) -> Self {
        match env {
            Environment::Development => crate::config::Environment::Development,
            Environment::Test => crate::config::Environment::Test,
            Environment::Staging => crate::config::Environment::Staging,
            Environment::Production => crate::config::Environment::Production,
        }
    }
}
