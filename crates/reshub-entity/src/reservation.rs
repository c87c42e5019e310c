//! Reservation record.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// An exclusive hold on one resource by one identity.
///
/// Reservations are immutable once created: releasing or expiring one
/// deletes it from the snapshot. `expires_at` is always strictly later than
/// `reserved_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    /// Catalog id of the held resource.
    pub resource_id: String,
    /// Opaque identity of the holder.
    pub user: String,
    /// When the reservation was granted.
    pub reserved_at: DateTime<FixedOffset>,
    /// First instant at which the reservation is no longer live.
    pub expires_at: DateTime<FixedOffset>,
}

impl Reservation {
    /// Whether the reservation still holds at `now`.
    ///
    /// A reservation is expired at exactly `expires_at`.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at.with_timezone(&Utc)
    }

    /// Whether `identity` holds this reservation.
    pub fn is_held_by(&self, identity: &str) -> bool {
        self.user == identity
    }
}
