//! Resource catalog CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use reshub_core::error::AppError;
use reshub_entity::ResourceDescriptor;
use reshub_service::Catalog;

use crate::output::{self, OutputFormat};

/// Arguments for catalog commands
#[derive(Debug, Args)]
pub struct CatalogArgs {
    /// Catalog subcommand
    #[command(subcommand)]
    pub command: CatalogCommand,
}

/// Catalog subcommands
#[derive(Debug, Subcommand)]
pub enum CatalogCommand {
    /// Parse the catalog file and list its resources
    Check {
        /// Catalog file to check instead of the configured one
        #[arg(long)]
        file: Option<String>,
    },
}

/// Catalog display row
#[derive(Debug, Serialize, Tabled)]
struct DescriptorRow {
    /// Resource id
    id: String,
    /// Display name
    name: String,
    /// Metadata keys
    meta: String,
}

impl From<&ResourceDescriptor> for DescriptorRow {
    fn from(d: &ResourceDescriptor) -> Self {
        Self {
            id: d.id.clone(),
            name: d.name.clone(),
            meta: d.meta.keys().cloned().collect::<Vec<_>>().join(", "),
        }
    }
}

/// Execute catalog commands
pub async fn execute(
    args: &CatalogArgs,
    config_path: &str,
    env: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        CatalogCommand::Check { file } => {
            let path = match file {
                Some(path) => path.clone(),
                None => super::load_config(config_path, env)?.reservations.catalog_file,
            };
            let catalog = Catalog::load(&path).await?;

            let descriptors: Vec<&ResourceDescriptor> = catalog.iter().collect();
            let rows: Vec<DescriptorRow> =
                descriptors.iter().map(|d| DescriptorRow::from(*d)).collect();
            output::print_list(&rows, &descriptors, format);
            if format == OutputFormat::Table {
                output::print_success(&format!(
                    "Catalog '{}' has {} resource(s)",
                    path,
                    catalog.len()
                ));
            }
        }
    }

    Ok(())
}
