use std::path::PathBuf;
use std::time::Duration;

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can feed a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_zoom = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let raw = or_default(var, default);
        let zoom = raw
            .trim()
            .parse::<f64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })?;
        if !(0.0..=22.0).contains(&zoom) {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("zoom {zoom} outside 0..=22"),
            });
        }
        Ok(zoom)
    };

    let env = parse_environment(&or_default("SWIMMAP_ENV", "development"))?;
    let log_level = or_default("SWIMMAP_LOG_LEVEL", "info");
    let view_config_path = PathBuf::from(or_default(
        "SWIMMAP_VIEW_CONFIG_PATH",
        "./config/view.yaml",
    ));
    let facilities_path = PathBuf::from(or_default(
        "SWIMMAP_FACILITIES_PATH",
        "./data/facilities.json",
    ));

    let min_selection_zoom = parse_zoom("SWIMMAP_MIN_SELECTION_ZOOM", "14")?;
    let popup_settle_ms = parse_u64("SWIMMAP_POPUP_SETTLE_MS", "240")?;
    let scroll_duration_ms = parse_u64("SWIMMAP_SCROLL_DURATION_MS", "120")?;

    Ok(AppConfig {
        env,
        log_level,
        view_config_path,
        facilities_path,
        min_selection_zoom,
        popup_settle: Duration::from_millis(popup_settle_ms),
        scroll_duration: Duration::from_millis(scroll_duration_ms),
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s.trim() {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SWIMMAP_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
