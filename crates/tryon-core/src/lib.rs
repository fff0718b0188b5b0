pub mod app_config;
pub mod config;
pub mod generation;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use generation::{GenerationRequest, GenerationResult};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Errors raised when a generation request violates its preconditions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("{field} is required")]
    MissingImageRef { field: &'static str },

    #[error("{field} is not a valid URI: {reason}")]
    InvalidImageRef { field: &'static str, reason: String },
}
