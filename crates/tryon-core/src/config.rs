use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_FAL_SUBMIT_URL: &str =
    "https://queue.fal.run/fal-ai/image-apps-v2/virtual-try-on";
pub const DEFAULT_FAL_STATUS_BASE_URL: &str = "https://queue.fal.run/fal-ai/image-apps-v2/requests";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a
/// plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let fal_key = require("FAL_KEY")?;

    let env = parse_environment(&or_default("TRYON_ENV", "development"));

    let bind_addr = parse("TRYON_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("TRYON_LOG_LEVEL", "info");

    let fal_submit_url = or_default("TRYON_FAL_SUBMIT_URL", DEFAULT_FAL_SUBMIT_URL);
    let fal_status_base_url = or_default("TRYON_FAL_STATUS_BASE_URL", DEFAULT_FAL_STATUS_BASE_URL);
    let fal_request_timeout_secs = parse_u64("TRYON_FAL_REQUEST_TIMEOUT_SECS", "30")?;

    let poll_max_attempts = parse_u32("TRYON_POLL_MAX_ATTEMPTS", "30")?;
    if poll_max_attempts == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "TRYON_POLL_MAX_ATTEMPTS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let poll_interval_ms = parse_u64("TRYON_POLL_INTERVAL_MS", "1000")?;

    let max_concurrent_generations = parse_usize("TRYON_MAX_CONCURRENT_GENERATIONS", "4")?;
    if max_concurrent_generations == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "TRYON_MAX_CONCURRENT_GENERATIONS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        fal_key,
        fal_submit_url,
        fal_status_base_url,
        fal_request_timeout_secs,
        poll_max_attempts,
        poll_interval_ms,
        max_concurrent_generations,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
