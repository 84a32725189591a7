use thiserror::Error;

/// Failures while assembling or checking `Settings`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    #[error("could not parse configuration: {0}")]
    ParseError(String),

    #[error("invalid setting `{field}`: {message}")]
    ValidationError {
        /// Dotted key, e.g. `backend.url`
        field: String,
        message: String,
    },

    /// `DOMIFY_APP_ENV` or `--env` named an unknown environment
    #[error("unknown environment: {0}")]
    UnknownEnvironment(String),

    /// A config directory and a single config file were both requested
    #[error("conflicting configuration sources: {0}")]
    ConflictingSources(String),

    #[error(transparent)]
    Source(#[from] config::ConfigError),
}

impl ConfigError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn file_not_found(path: impl Into<String>) -> Self {
        ConfigError::FileNotFound(path.into())
    }

    pub fn conflicting_sources(message: impl Into<String>) -> Self {
        ConfigError::ConflictingSources(message.into())
    }

    /// Dotted key of the offending setting, when there is one.
    pub fn field(&self) -> Option<&str> {
        match self {
            ConfigError::ValidationError { field, .. } => Some(field),
            _ => None,
        }
    }
}
