//! Reservation commands operating directly on the state file.
//!
//! Each command takes the state file's advisory lock for its whole cycle, so
//! it is safe to run while a server is using the same file.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use reshub_core::error::AppError;
use reshub_entity::ResourceView;

use crate::output::{self, OutputFormat};

/// Arguments for `reserve`
#[derive(Debug, Args)]
pub struct ReserveArgs {
    /// Resource id
    pub id: String,
    /// Deadline as HH:MM (defaults to midnight)
    #[arg(long)]
    pub until: Option<String>,
}

/// Arguments for `release`
#[derive(Debug, Args)]
pub struct ReleaseArgs {
    /// Resource id
    pub id: String,
}

/// Resource display row
#[derive(Debug, Serialize, Tabled)]
struct ResourceRow {
    /// Resource id
    id: String,
    /// Display name
    name: String,
    /// Availability
    status: String,
    /// Holder
    holder: String,
    /// Expiry
    until: String,
}

impl From<&ResourceView> for ResourceRow {
    fn from(view: &ResourceView) -> Self {
        let (status, holder, until) = match &view.reservation {
            None => ("free".to_string(), "-".to_string(), "-".to_string()),
            Some(r) => (
                if r.held_by_caller { "yours" } else { "taken" }.to_string(),
                r.user.clone(),
                r.expires_at.format("%Y-%m-%d %H:%M").to_string(),
            ),
        };
        Self {
            id: view.id.clone(),
            name: view.name.clone(),
            status,
            holder,
            until,
        }
    }
}

/// List every catalog resource with its reservation state
pub async fn list(
    config_path: &str,
    env: &str,
    identity: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path, env)?;
    let manager = super::build_manager(&config).await?;

    let views = manager.list_resources(identity).await?;
    let rows: Vec<ResourceRow> = views.iter().map(ResourceRow::from).collect();
    output::print_list(&rows, &views, format);
    Ok(())
}

/// Reserve a resource for `identity`
pub async fn reserve(
    args: &ReserveArgs,
    config_path: &str,
    env: &str,
    identity: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path, env)?;
    let manager = super::build_manager(&config).await?;

    let reservation = manager
        .reserve(&args.id, identity, args.until.as_deref())
        .await?;

    match format {
        OutputFormat::Json => output::print_json(&reservation),
        OutputFormat::Table => output::print_success(&format!(
            "Reserved '{}' for {} until {}",
            reservation.resource_id,
            reservation.user,
            reservation.expires_at.format("%Y-%m-%d %H:%M %:z")
        )),
    }
    Ok(())
}

/// Release a resource held by `identity`
pub async fn release(
    args: &ReleaseArgs,
    config_path: &str,
    env: &str,
    identity: &str,
) -> Result<(), AppError> {
    let config = super::load_config(config_path, env)?;
    let manager = super::build_manager(&config).await?;

    manager.release(&args.id, identity).await?;
    output::print_success(&format!("Released '{}'", args.id));
    Ok(())
}

/// Drop expired reservations from the state file
pub async fn sweep(config_path: &str, env: &str) -> Result<(), AppError> {
    let config = super::load_config(config_path, env)?;
    let manager = super::build_manager(&config).await?;

    match manager.sweep_expired().await? {
        0 => output::print_success("No expired reservations"),
        n => output::print_success(&format!("Removed {} expired reservation(s)", n)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{FixedOffset, TimeZone};
    use reshub_entity::{Reservation, ResourceDescriptor};
    use reshub_storage::{JsonFileStore, StateStore};
    use tempfile::TempDir;

    /// Writes a catalog and a config pointing at a fresh state file.
    fn workspace() -> (TempDir, String, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let catalog = dir.path().join("resources.json");
        std::fs::write(
            &catalog,
            r#"[{"id":"desk-1","name":"Desk 1"},{"id":"desk-2","name":"Desk 2"}]"#,
        )
        .unwrap();
        let state = dir.path().join("data/reservations.json");
        let config = dir.path().join("reshub.toml");
        std::fs::write(
            &config,
            format!(
                "[reservations]\nstate_file = {:?}\ncatalog_file = {:?}\ntimezone = {:?}\n",
                state.display().to_string(),
                catalog.display().to_string(),
                "+09:00",
            ),
        )
        .unwrap();
        let config = config.display().to_string();
        (dir, config, state)
    }

    #[tokio::test]
    async fn test_reserve_and_release_persist_to_state_file() {
        let (_dir, config, state) = workspace();
        let env = "no-such-overlay";
        let store = JsonFileStore::new(&state);

        let args = ReserveArgs {
            id: "desk-1".to_string(),
            until: None,
        };
        reserve(&args, &config, env, "alice", OutputFormat::Json)
            .await
            .unwrap();

        let saved = store.load().await.unwrap();
        let held = saved.get("desk-1").unwrap();
        assert_eq!(held.user, "alice");
        assert_eq!(held.expires_at.offset().local_minus_utc(), 9 * 3600);

        // A second reservation on the same id is refused.
        let err = reserve(&args, &config, env, "bob", OutputFormat::Json)
            .await
            .unwrap_err();
        assert_eq!(err.kind, reshub_core::error::ErrorKind::Conflict);

        list(&config, env, "bob", OutputFormat::Json).await.unwrap();

        let release_args = ReleaseArgs {
            id: "desk-1".to_string(),
        };
        let err = release(&release_args, &config, env, "bob").await.unwrap_err();
        assert_eq!(err.kind, reshub_core::error::ErrorKind::Authorization);
        release(&release_args, &config, env, "alice").await.unwrap();
        assert!(store.load().await.unwrap().is_empty());

        sweep(&config, env).await.unwrap();
    }

    #[test]
    fn test_row_marks_callers_reservation() {
        let tz = FixedOffset::east_opt(0).unwrap();
        let reservation = Reservation {
            resource_id: "desk-1".to_string(),
            user: "alice".to_string(),
            reserved_at: tz.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap(),
            expires_at: tz.with_ymd_and_hms(2026, 3, 2, 17, 30, 0).unwrap(),
        };
        let desk = ResourceDescriptor::new("desk-1", "Desk 1");

        let mine = ResourceRow::from(&ResourceView::build(&desk, Some(&reservation), "alice"));
        assert_eq!(mine.status, "yours");
        assert_eq!(mine.until, "2026-03-02 17:30");

        let theirs = ResourceRow::from(&ResourceView::build(&desk, Some(&reservation), "bob"));
        assert_eq!(theirs.status, "taken");
        assert_eq!(theirs.holder, "alice");

        let free = ResourceRow::from(&ResourceView::build(&desk, None, "bob"));
        assert_eq!(free.status, "free");
    }
}
