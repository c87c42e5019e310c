//! Read models joining catalog entries with live reservations.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::reservation::Reservation;
use crate::resource::ResourceDescriptor;

/// The current holder of a resource, as seen by a particular caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationView {
    /// Holder identity.
    pub user: String,
    /// When the reservation was granted.
    pub reserved_at: DateTime<FixedOffset>,
    /// When the reservation lapses.
    pub expires_at: DateTime<FixedOffset>,
    /// Whether the caller is the holder (and may release it).
    pub held_by_caller: bool,
}

/// A catalog entry plus its reservation state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceView {
    /// Resource id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Catalog metadata.
    pub meta: Map<String, Value>,
    /// `true` when nobody holds the resource.
    pub available: bool,
    /// Current holder, if any.
    pub reservation: Option<ReservationView>,
}

impl ResourceView {
    /// Joins a descriptor with its live reservation (if any) for `identity`.
    pub fn build(
        descriptor: &ResourceDescriptor,
        reservation: Option<&Reservation>,
        identity: &str,
    ) -> Self {
        let reservation = reservation.map(|r| ReservationView {
            user: r.user.clone(),
            reserved_at: r.reserved_at,
            expires_at: r.expires_at,
            held_by_caller: r.is_held_by(identity),
        });

        Self {
            id: descriptor.id.clone(),
            name: descriptor.name.clone(),
            meta: descriptor.meta.clone(),
            available: reservation.is_none(),
            reservation,
        }
    }
}
