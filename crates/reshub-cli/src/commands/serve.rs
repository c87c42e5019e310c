//! Server start command.

use reshub_core::error::AppError;

/// Start the HTTP server in the foreground
pub async fn execute(config_path: &str, env: &str) -> Result<(), AppError> {
    let config = super::load_config(config_path, env)?;
    reshub_api::run_server(config).await
}
