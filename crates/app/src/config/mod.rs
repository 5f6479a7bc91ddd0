//! Application configuration

use clap::Args;

pub mod api;
pub mod logging;
pub mod pricing;

pub use api::ApiConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use pricing::{ConfigError, PricingConfig};

/// Settings shared by every `bakehouse` subcommand.
#[derive(Debug, Args)]
pub struct AppConfig {
    /// Backend API settings.
    #[command(flatten)]
    pub api: ApiConfig,

    /// Currency and price list settings.
    #[command(flatten)]
    pub pricing: PricingConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}
