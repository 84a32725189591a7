//! Configuration merger for CLI arguments and config files
//!
//! This module handles merging CLI argument overrides with file-based configuration,
//! implementing the configuration precedence logic.

use super::parser::{Cli, Commands};
use crate::config::error::ConfigError;
use crate::config::{ConfigLoader, settings::Settings};
use std::path::Path;

/// Applies CLI overrides on top of file-based configuration.
///
/// CLI arguments have the highest priority; the merged result is validated
/// before it is handed out.
pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Loads the base configuration, either from an explicit file or from
    /// the layered config directory.
    ///
    /// Validation is deferred to [`merge_cli_args`](Self::merge_cli_args)
    /// so a CLI override can fix a value the files leave invalid.
    ///
    /// # Errors
    /// Returns ConfigError if the file is unreadable or cannot be parsed
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let loader = match cli.config.as_deref() {
            Some(path) => {
                Self::validate_config_file_access(path)?;
                ConfigLoader::from_file(path)
            }
            None => ConfigLoader::new()?,
        };

        let loader = match cli.env {
            Some(env) => loader.with_environment(env.into()),
            None => loader,
        };

        Ok(Self::new(loader.load_unvalidated()?))
    }

    fn validate_config_file_access(path: &Path) -> Result<(), ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::validation(
                "config_file",
                format!("Configuration file does not exist: '{}'", path.display()),
            ));
        }

        std::fs::File::open(path).map(|_| ()).map_err(|e| {
            ConfigError::validation(
                "config_file",
                format!("Cannot read configuration file '{}': {}", path.display(), e),
            )
        })
    }

    /// Merge CLI arguments with the base configuration
    ///
    /// # Returns
    /// A new, validated Settings instance with CLI overrides applied
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        Self::apply_global_overrides(&mut config, cli);

        if let Some(ref command) = cli.command {
            Self::apply_command_overrides(&mut config, command);
        }

        config.validate()?;

        Ok(config)
    }

    fn apply_global_overrides(config: &mut Settings, cli: &Cli) {
        if cli.verbose {
            config.logger.level = "debug".to_string();
        } else if cli.quiet {
            config.logger.level = "error".to_string();
        }
    }

    fn apply_command_overrides(config: &mut Settings, command: &Commands) {
        match command {
            Commands::Serve {
                host,
                port,
                log_level,
                dry_run: _,
            } => {
                if let Some(host_addr) = host {
                    config.server.host = host_addr.clone();
                }

                if let Some(port_num) = port {
                    config.server.port = *port_num;
                }

                // Command-specific level wins over --verbose/--quiet
                if let Some(level) = log_level {
                    config.logger.level = level.clone().into();
                }
            }
            Commands::Approve { .. } => {}
        }
    }

    pub fn config(&self) -> &Settings {
        &self.base_config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::parser::Cli;
    use crate::config::validation::valid_settings;
    use clap::Parser;
    use std::io::Write;

    fn merger() -> ConfigurationMerger {
        ConfigurationMerger::new(valid_settings())
    }

    #[test]
    fn test_configuration_merger_new() {
        let base_config = valid_settings();
        let merger = ConfigurationMerger::new(base_config.clone());
        assert_eq!(merger.config(), &base_config);
    }

    #[test]
    fn test_configuration_merger_merge_verbose_flag() {
        let cli = Cli::try_parse_from(["domify", "--verbose"]).unwrap();
        let merged_config = merger().merge_cli_args(&cli).unwrap();

        assert_eq!(merged_config.logger.level, "debug");
    }

    #[test]
    fn test_configuration_merger_merge_quiet_flag() {
        let cli = Cli::try_parse_from(["domify", "--quiet"]).unwrap();
        let merged_config = merger().merge_cli_args(&cli).unwrap();

        assert_eq!(merged_config.logger.level, "error");
    }

    #[test]
    fn test_configuration_merger_merge_serve_host_and_port() {
        let cli =
            Cli::try_parse_from(["domify", "serve", "--host", "0.0.0.0", "--port", "8080"])
                .unwrap();
        let merged_config = merger().merge_cli_args(&cli).unwrap();

        assert_eq!(merged_config.server.host, "0.0.0.0");
        assert_eq!(merged_config.server.port, 8080);
    }

    #[test]
    fn test_configuration_merger_command_log_level_overrides_global() {
        let cli = Cli::try_parse_from(["domify", "--verbose", "serve", "--log-level", "warn"])
            .unwrap();
        let merged_config = merger().merge_cli_args(&cli).unwrap();

        assert_eq!(merged_config.logger.level, "warn");
    }

    #[test]
    fn test_approve_leaves_server_settings_alone() {
        let cli = Cli::try_parse_from(["domify", "approve", "3"]).unwrap();
        let merged_config = merger().merge_cli_args(&cli).unwrap();

        assert_eq!(merged_config.server, valid_settings().server);
    }

    #[test]
    fn test_merged_settings_are_validated() {
        let mut base = valid_settings();
        base.backend.url = String::new();

        let cli = Cli::try_parse_from(["domify", "serve"]).unwrap();
        let err = ConfigurationMerger::new(base).merge_cli_args(&cli).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { ref field, .. } if field == "backend.url"));
    }

    #[test]
    fn test_from_cli_reads_explicit_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 4100

[backend]
url = "https://backend.example.com"
service_role_key = "service-key"
"#
        )
        .unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let cli = Cli::try_parse_from(["domify", "--config", path.as_str()]).unwrap();
        let merger = ConfigurationMerger::from_cli(&cli).unwrap();

        assert_eq!(merger.config().server.port, 4100);
        assert_eq!(merger.config().backend.url, "https://backend.example.com");
    }
}
