//! Reservation state and expiry configuration.

use serde::{Deserialize, Serialize};

use crate::result::AppResult;
use crate::timezone::Timezone;

/// Reservation manager settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationConfig {
    /// Path of the JSON snapshot holding all active reservations.
    #[serde(default = "default_state_file")]
    pub state_file: String,
    /// Path of the JSON resource catalog loaded at startup.
    #[serde(default = "default_catalog_file")]
    pub catalog_file: String,
    /// Timezone used to interpret `HH:MM` deadlines and midnight rollover.
    ///
    /// `"local"`, `"UTC"`, an IANA name such as `"Europe/Berlin"`, or a
    /// fixed offset such as `"+09:00"`.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Seconds between background expiry sweeps. `0` disables the sweeper.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
    /// Reject reservations for ids that are not in the catalog.
    #[serde(default = "default_true")]
    pub require_known_resource: bool,
}

impl Default for ReservationConfig {
    fn default() -> Self {
        Self {
            state_file: default_state_file(),
            catalog_file: default_catalog_file(),
            timezone: default_timezone(),
            sweep_interval_seconds: default_sweep_interval(),
            require_known_resource: default_true(),
        }
    }
}

impl ReservationConfig {
    /// Parses [`Self::timezone`].
    pub fn resolve_timezone(&self) -> AppResult<Timezone> {
        Timezone::parse(&self.timezone)
    }
}

fn default_state_file() -> String {
    "data/reservations.json".to_string()
}

fn default_catalog_file() -> String {
    "config/resources.json".to_string()
}

fn default_timezone() -> String {
    "local".to_string()
}

fn default_sweep_interval() -> u64 {
    60
}

fn default_true() -> bool {
    true
}
