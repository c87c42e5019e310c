//! Response DTOs.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use reshub_entity::Reservation;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
    /// Seconds since the server started.
    pub uptime_seconds: u64,
    /// Number of catalog resources.
    pub resources: usize,
    /// Current time in the configured reservation timezone.
    pub server_time: DateTime<FixedOffset>,
}

/// A newly granted reservation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationResponse {
    /// Reserved resource.
    pub resource_id: String,
    /// Holder identity.
    pub user: String,
    /// Grant time.
    pub reserved_at: DateTime<FixedOffset>,
    /// Expiry time.
    pub expires_at: DateTime<FixedOffset>,
}

impl From<Reservation> for ReservationResponse {
    fn from(r: Reservation) -> Self {
        Self {
            resource_id: r.resource_id,
            user: r.user,
            reserved_at: r.reserved_at,
            expires_at: r.expires_at,
        }
    }
}
