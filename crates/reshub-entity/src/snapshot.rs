//! The reservation snapshot: the unit of durability.
//!
//! On disk the snapshot is a single JSON document:
//!
//! ```json
//! { "reservations": { "desk-1": { "user": "alice", "reserved_at": "...", "expires_at": "..." } } }
//! ```
//!
//! There is no per-record persistence; stores replace the whole document.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::reservation::Reservation;

/// All active reservations keyed by resource id.
///
/// The snapshot does not enforce the one-holder rule; `insert` replaces any
/// existing entry. The reservation manager checks before inserting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "SnapshotDocument", try_from = "SnapshotDocument")]
pub struct StateSnapshot {
    reservations: BTreeMap<String, Reservation>,
}

impl StateSnapshot {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the reservation for `resource_id`, expired or not.
    pub fn get(&self, resource_id: &str) -> Option<&Reservation> {
        self.reservations.get(resource_id)
    }

    /// Inserts a reservation, returning the one it replaced.
    pub fn insert(&mut self, reservation: Reservation) -> Option<Reservation> {
        self.reservations.insert(reservation.resource_id.clone(), reservation)
    }

    /// Removes and returns the reservation for `resource_id`.
    pub fn remove(&mut self, resource_id: &str) -> Option<Reservation> {
        self.reservations.remove(resource_id)
    }

    /// Number of stored reservations.
    pub fn len(&self) -> usize {
        self.reservations.len()
    }

    /// Whether the snapshot holds no reservations.
    pub fn is_empty(&self) -> bool {
        self.reservations.is_empty()
    }

    /// Removes every reservation whose `expires_at <= now`. Returns whether
    /// anything was removed.
    pub fn sweep(&mut self, now: DateTime<Utc>) -> bool {
        let before = self.reservations.len();
        self.reservations.retain(|_, r| r.is_live_at(now));
        self.reservations.len() != before
    }
}

/// Persisted form of a single reservation; the resource id is the map key.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ReservationRecord {
    user: String,
    reserved_at: DateTime<FixedOffset>,
    expires_at: DateTime<FixedOffset>,
}

/// Persisted form of the whole snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SnapshotDocument {
    #[serde(default)]
    reservations: BTreeMap<String, ReservationRecord>,
}

impl From<StateSnapshot> for SnapshotDocument {
    fn from(snapshot: StateSnapshot) -> Self {
        let reservations = snapshot
            .reservations
            .into_iter()
            .map(|(id, r)| {
                (
                    id,
                    ReservationRecord {
                        user: r.user,
                        reserved_at: r.reserved_at,
                        expires_at: r.expires_at,
                    },
                )
            })
            .collect();
        Self { reservations }
    }
}

impl TryFrom<SnapshotDocument> for StateSnapshot {
    type Error = String;

    fn try_from(document: SnapshotDocument) -> Result<Self, Self::Error> {
        let mut reservations = BTreeMap::new();
        for (resource_id, record) in document.reservations {
            if resource_id.is_empty() {
                return Err("reservation with empty resource id".to_string());
            }
            if record.expires_at <= record.reserved_at {
                return Err(format!(
                    "reservation for '{resource_id}' expires at or before it was made"
                ));
            }
            reservations.insert(
                resource_id.clone(),
                Reservation {
                    resource_id,
                    user: record.user,
                    reserved_at: record.reserved_at,
                    expires_at: record.expires_at,
                },
            );
        }
        Ok(Self { reservations })
    }
}
