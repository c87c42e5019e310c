//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use reshub_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Validate configuration and resolve the timezone
    Validate,
}

/// Execute config commands
pub async fn execute(
    args: &ConfigArgs,
    config_path: &str,
    env: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            let config = super::load_config(config_path, env)?;
            match format {
                OutputFormat::Json => output::print_json(&config),
                OutputFormat::Table => {
                    output::print_kv("server", &format!("{}:{}", config.server.host, config.server.port));
                    output::print_kv("state_file", &config.reservations.state_file);
                    output::print_kv("catalog_file", &config.reservations.catalog_file);
                    output::print_kv("timezone", &config.reservations.timezone);
                    output::print_kv(
                        "sweep_interval_seconds",
                        &config.reservations.sweep_interval_seconds.to_string(),
                    );
                    output::print_kv(
                        "require_known_resource",
                        &config.reservations.require_known_resource.to_string(),
                    );
                    output::print_kv("identity_header", &config.auth.identity_header);
                    output::print_kv(
                        "logging",
                        &format!("{} ({})", config.logging.level, config.logging.format),
                    );
                }
            }
        }
        ConfigCommand::Validate => match super::load_config(config_path, env) {
            Ok(config) => {
                let timezone = config.reservations.resolve_timezone()?;
                output::print_success(&format!("Configuration '{}' is valid", config_path));
                output::print_kv("timezone", &timezone.to_string());
                if config.reservations.sweep_interval_seconds == 0 {
                    output::print_warning("Background expiry sweeper is disabled");
                }
            }
            Err(e) => {
                output::print_error(&format!("Configuration invalid: {}", e));
                return Err(e);
            }
        },
    }

    Ok(())
}
