use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to a value that cannot be parsed.
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
/// Returns `ConfigError` if a variable is set to a value that cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so the only failure mode is a present but
/// unparseable value.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("ONGKIR_ENV", "development"));
    let bind_addr = parse_addr("ONGKIR_BIND_ADDR", "0.0.0.0:8080")?;
    let log_level = or_default("ONGKIR_LOG_LEVEL", "info");

    let carrier_base_url = or_default("ONGKIR_CARRIER_BASE_URL", "https://jne.co.id")
        .trim_end_matches('/')
        .to_string();
    if !(carrier_base_url.starts_with("http://") || carrier_base_url.starts_with("https://")) {
        return Err(invalid(
            "ONGKIR_CARRIER_BASE_URL",
            format!("\"{carrier_base_url}\" must start with http:// or https://"),
        ));
    }

    let user_agent = or_default("ONGKIR_USER_AGENT", "ongkir/0.1 (tariff-lookup)");
    let request_timeout_secs = parse_u64("ONGKIR_REQUEST_TIMEOUT_SECS", "30")?;
    let max_concurrent_fetches = parse_usize("ONGKIR_MAX_CONCURRENT_FETCHES", "4")?.max(1);
    let fetch_delay_max_ms = parse_u64("ONGKIR_FETCH_DELAY_MAX_MS", "1000")?;
    let aggregate_deadline_secs = parse_u64("ONGKIR_AGGREGATE_DEADLINE_SECS", "120")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        carrier_base_url,
        user_agent,
        request_timeout_secs,
        max_concurrent_fetches,
        fetch_delay_max_ms,
        aggregate_deadline_secs,
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
