//! CLI command definitions and dispatch.

pub mod catalog;
pub mod config;
pub mod reservation;
pub mod serve;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use reshub_core::clock::SystemClock;
use reshub_core::config::AppConfig;
use reshub_core::error::AppError;
use reshub_service::{Catalog, ReservationManager};
use reshub_storage::JsonFileStore;

use crate::output::OutputFormat;

/// ResHub: shared resource reservations
#[derive(Debug, Parser)]
#[command(name = "reshub", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "RESHUB_CONFIG", default_value = "config/default.toml")]
    pub config: String,

    /// Environment overlay loaded from `config/{env}`
    #[arg(long, env = "RESHUB_ENV", default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Identity to act as (defaults to $USER)
    #[arg(short, long, env = "RESHUB_USER")]
    pub user: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the ResHub HTTP server
    Serve,
    /// List resources and who holds them
    List,
    /// Reserve a resource
    Reserve(reservation::ReserveArgs),
    /// Release a resource you hold
    Release(reservation::ReleaseArgs),
    /// Remove expired reservations from the state file
    Sweep,
    /// Configuration management
    Config(config::ConfigArgs),
    /// Resource catalog inspection
    Catalog(catalog::CatalogArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Serve => serve::execute(&self.config, &self.env).await,
            Commands::List => {
                reservation::list(&self.config, &self.env, &self.identity()?, self.format).await
            }
            Commands::Reserve(args) => {
                reservation::reserve(args, &self.config, &self.env, &self.identity()?, self.format)
                    .await
            }
            Commands::Release(args) => {
                reservation::release(args, &self.config, &self.env, &self.identity()?).await
            }
            Commands::Sweep => reservation::sweep(&self.config, &self.env).await,
            Commands::Config(args) => {
                config::execute(args, &self.config, &self.env, self.format).await
            }
            Commands::Catalog(args) => {
                catalog::execute(args, &self.config, &self.env, self.format).await
            }
        }
    }

    /// The acting identity: `--user`, then `$USER`.
    fn identity(&self) -> Result<String, AppError> {
        self.user
            .clone()
            .or_else(|| std::env::var("USER").ok())
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .ok_or_else(|| AppError::authentication("No identity given; pass --user or set $USER"))
    }
}

/// Helper: load configuration from file and environment
pub fn load_config(config_path: &str, env: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(config_path, env)
}

/// Helper: build a manager over the configured catalog and state file
pub async fn build_manager(config: &AppConfig) -> Result<ReservationManager, AppError> {
    let catalog = Catalog::load(&config.reservations.catalog_file).await?;
    let store = JsonFileStore::open(&config.reservations.state_file).await?;
    ReservationManager::from_config(
        &config.reservations,
        Arc::new(catalog),
        Arc::new(store),
        Arc::new(SystemClock),
    )
}
