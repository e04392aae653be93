pub mod app_config;
pub mod check;
pub mod config;
pub mod report;

use thiserror::Error;

pub use app_config::{AppConfig, Environment, LwaCredentials};
pub use check::StatusCheck;
pub use config::{load_app_config, load_app_config_from_env};
pub use report::{
    BadgeKind, CheckFailure, ProductUpdate, RunReport, RunResult, StatusSignal, UpdateRecord,
};

/// Errors raised while loading or validating application configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
