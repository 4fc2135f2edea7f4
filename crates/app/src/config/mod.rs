//! Application configuration

use clap::Args;

pub use crate::config::{
    db::DatabaseConfig,
    logging::{LogFormat, LoggingConfig},
    render::{PdfEngineKind, RenderConfig},
};

pub mod db;
pub mod logging;
pub mod render;

/// Settings shared by every command.
#[derive(Debug, Clone, Args)]
pub struct AppConfig {
    /// Database connection settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Template, stylesheet and PDF engine settings.
    #[command(flatten)]
    pub render: RenderConfig,
}
