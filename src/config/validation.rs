//! Configuration validation logic
//!
//! Each section validates itself; `Settings::validate` reports the first
//! failure with the dotted key of the offending setting.

use validator::ValidateEmail;

use crate::config::error::ConfigError;
use crate::config::settings::{
    ApprovalConfig, AuthConfig, BackendConfig, EmailConfig, LoggerSettings, ServerConfig, Settings,
};

const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

const MIN_JWT_SECRET_LEN: usize = 32;

fn is_http_url(value: &str) -> bool {
    value.starts_with("https://") || value.starts_with("http://")
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::validation(
                "server.port",
                "Port must be between 1 and 65535.",
            ));
        }

        if self.request_timeout == 0 {
            return Err(ConfigError::validation(
                "server.request_timeout",
                "Request timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl BackendConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.trim().is_empty() {
            return Err(ConfigError::validation(
                "backend.url",
                "Backend URL is required.",
            ));
        }

        if !is_http_url(&self.url) {
            return Err(ConfigError::validation(
                "backend.url",
                "Backend URL must start with http:// or https://",
            ));
        }

        if self.service_role_key.trim().is_empty() {
            return Err(ConfigError::validation(
                "backend.service_role_key",
                "Service role key is required.",
            ));
        }

        if self.request_timeout == 0 {
            return Err(ConfigError::validation(
                "backend.request_timeout",
                "Backend request timeout must be greater than 0 seconds.",
            ));
        }

        if !(1..=1000).contains(&self.identity_page_size) {
            return Err(ConfigError::validation(
                "backend.identity_page_size",
                format!(
                    "Identity page size must be between 1 and 1000, got {}.",
                    self.identity_page_size
                ),
            ));
        }

        Ok(())
    }
}

impl AuthConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::validation(
                "auth.jwt_secret",
                format!("JWT secret must be at least {MIN_JWT_SECRET_LEN} characters."),
            ));
        }

        if self.admin_role.trim().is_empty() {
            return Err(ConfigError::validation(
                "auth.admin_role",
                "Admin role cannot be empty.",
            ));
        }

        Ok(())
    }
}

impl EmailConfig {
    /// Delivery settings are only checked when email is enabled.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.enabled {
            return Ok(());
        }

        if !is_http_url(&self.api_url) {
            return Err(ConfigError::validation(
                "email.api_url",
                "Email API URL must start with http:// or https:// when email is enabled.",
            ));
        }

        if self.api_key.trim().is_empty() {
            return Err(ConfigError::validation(
                "email.api_key",
                "Email API key is required when email is enabled.",
            ));
        }

        if !self.from_address.validate_email() {
            return Err(ConfigError::validation(
                "email.from_address",
                format!("'{}' is not a valid sender address.", self.from_address),
            ));
        }

        if self.timeout_seconds == 0 {
            return Err(ConfigError::validation(
                "email.timeout_seconds",
                "Email timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl ApprovalConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_http_url(&self.login_url) {
            return Err(ConfigError::validation(
                "approval.login_url",
                "Login URL must start with http:// or https://",
            ));
        }

        if !self.default_hourly_rate.is_finite() || self.default_hourly_rate < 0.0 {
            return Err(ConfigError::validation(
                "approval.default_hourly_rate",
                "Default hourly rate must be a non-negative number.",
            ));
        }

        if self.temporary_password_length < 8 {
            return Err(ConfigError::validation(
                "approval.temporary_password_length",
                "Temporary passwords must be at least 8 characters long.",
            ));
        }

        Ok(())
    }
}

impl LoggerSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::validation(
                "logger.level",
                format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            ));
        }

        if !self.console.enabled && !self.file.enabled {
            return Err(ConfigError::validation(
                "logger",
                "At least one output (console or file) must be enabled.",
            ));
        }

        if self.file.enabled && self.file.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.file.format.to_lowercase().as_str()) {
            return Err(ConfigError::validation(
                "logger.file.format",
                format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.file.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            ));
        }

        Ok(())
    }
}

impl Settings {
    /// Validates all sections, returning the first error encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.backend.validate()?;
        self.auth.validate()?;
        self.email.validate()?;
        self.approval.validate()?;
        self.logger.validate()?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn valid_settings() -> Settings {
    let mut settings = Settings::default();
    settings.backend.url = "https://project.backend.test".to_string();
    settings.backend.service_role_key = "service-role-key".to_string();
    settings.auth.jwt_secret = "a-very-long-jwt-secret-for-tests-0123456789".to_string();
    settings.approval.login_url = "https://domify.test/login".to_string();
    settings
}
