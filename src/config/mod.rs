//! Configuration management for domify
//!
//! Settings are layered, lowest priority first:
//! 1. `default.toml`
//! 2. `{environment}.toml`
//! 3. `local.toml` (not committed)
//! 4. `DOMIFY_*` environment variables

pub mod environment;
pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

pub use environment::Environment;
pub use loader::ConfigLoader;
pub use settings::{
    ApprovalConfig, AuthConfig, BackendConfig, EmailConfig, ServerConfig, Settings,
};
