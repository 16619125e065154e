pub mod app_config;
pub mod config;
pub mod tariff;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use tariff::{
    Combination, DataEntry, Location, LocationKind, Pagination, TariffEntry, TariffInfo,
    TariffQuote,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
