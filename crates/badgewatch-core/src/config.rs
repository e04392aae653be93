use crate::app_config::{AppConfig, Environment, LwaCredentials};
use crate::ConfigError;

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
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
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

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<bool>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let lwa = LwaCredentials {
        client_id: require("AMAZON_CLIENT_ID")?,
        client_secret: require("AMAZON_CLIENT_SECRET")?,
        refresh_token: require("AMAZON_REFRESH_TOKEN")?,
    };

    let env = parse_environment(&or_default("BADGEWATCH_ENV", "development"));
    let bind_addr = parse_addr("BADGEWATCH_BIND_ADDR", "0.0.0.0:8080")?;
    let log_level = or_default("BADGEWATCH_LOG_LEVEL", "info");

    let lwa_token_url = or_default(
        "BADGEWATCH_LWA_TOKEN_URL",
        "https://api.amazon.com/auth/o2/token",
    );
    let api_host = or_default(
        "BADGEWATCH_API_HOST",
        "https://sellingpartnerapi-na.amazon.com",
    );
    let marketplace_id = or_default("BADGEWATCH_MARKETPLACE_ID", "A1PA6795UKMFR9");

    let data_dir = PathBuf::from(or_default("BADGEWATCH_DATA_DIR", "./data"));
    let result_path = PathBuf::from(or_default(
        "BADGEWATCH_RESULT_PATH",
        "./data/last_run.json",
    ));
    let source_name = or_default("BADGEWATCH_SOURCE_NAME", "Master_Catalogue.csv");

    let batch_size = parse_usize("BADGEWATCH_BATCH_SIZE", "10")?;
    let batch_concurrency = parse_usize("BADGEWATCH_BATCH_CONCURRENCY", "5")?;
    let request_timeout_secs = parse_u64("BADGEWATCH_REQUEST_TIMEOUT_SECS", "30")?;
    let report_unchanged = parse_bool("BADGEWATCH_REPORT_UNCHANGED", "false")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        lwa,
        lwa_token_url,
        api_host,
        marketplace_id,
        data_dir,
        result_path,
        source_name,
        batch_size,
        batch_concurrency,
        request_timeout_secs,
        report_unchanged,
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
