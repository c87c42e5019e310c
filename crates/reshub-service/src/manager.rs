//! Reservation state manager.
//!
//! Every public operation runs one load → sweep → mutate → save cycle while
//! holding a single manager-wide lock and the store's cross-process lock.
//! Operations are therefore linearized in lock-acquisition order, even across
//! managers sharing one state file, and each one observes everything the
//! previous one persisted. Rejections return before saving, so a refused
//! request never changes durable state.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use reshub_core::clock::Clock;
use reshub_core::config::ReservationConfig;
use reshub_core::result::AppResult;
use reshub_entity::{Reservation, ResourceView, StateSnapshot};
use reshub_storage::StateStore;

use crate::catalog::Catalog;
use crate::error::{ReleaseError, ReserveError};
use crate::policy::ExpiryPolicy;

/// Creates, lists, releases, and expires reservations.
pub struct ReservationManager {
    /// Reservable resources.
    catalog: Arc<Catalog>,
    /// Durable snapshot home.
    store: Arc<dyn StateStore>,
    /// Time source for expiry decisions.
    clock: Arc<dyn Clock>,
    /// Deadline rules.
    policy: ExpiryPolicy,
    /// Reject ids missing from the catalog.
    require_known_resource: bool,
    /// Serializes every load–sweep–mutate–save cycle within this process.
    lock: Mutex<()>,
}

impl std::fmt::Debug for ReservationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReservationManager")
            .field("resources", &self.catalog.len())
            .field("store", &self.store.backend())
            .field("policy", &self.policy)
            .field("require_known_resource", &self.require_known_resource)
            .finish()
    }
}

impl ReservationManager {
    /// Creates a manager that accepts only catalog resource ids.
    pub fn new(
        catalog: Arc<Catalog>,
        store: Arc<dyn StateStore>,
        clock: Arc<dyn Clock>,
        policy: ExpiryPolicy,
    ) -> Self {
        Self {
            catalog,
            store,
            clock,
            policy,
            require_known_resource: true,
            lock: Mutex::new(()),
        }
    }

    /// Creates a manager from the `[reservations]` configuration section.
    pub fn from_config(
        config: &ReservationConfig,
        catalog: Arc<Catalog>,
        store: Arc<dyn StateStore>,
        clock: Arc<dyn Clock>,
    ) -> AppResult<Self> {
        let policy = ExpiryPolicy::from_config(config)?;
        Ok(Self::new(catalog, store, clock, policy)
            .with_known_resource_check(config.require_known_resource))
    }

    /// Toggles rejection of ids that are not in the catalog.
    pub fn with_known_resource_check(mut self, enabled: bool) -> Self {
        self.require_known_resource = enabled;
        self
    }

    /// The catalog this manager serves.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The deadline policy in effect.
    pub fn policy(&self) -> &ExpiryPolicy {
        &self.policy
    }

    /// The current time in the configured timezone.
    pub fn local_now(&self) -> DateTime<FixedOffset> {
        self.policy.localize(self.clock.now())
    }

    /// Loads the snapshot and drops expired entries. Caller must hold both locks.
    ///
    /// Returns the snapshot and how many reservations expired.
    async fn load_swept(&self, now: DateTime<Utc>) -> AppResult<(StateSnapshot, usize)> {
        let mut snapshot = self.store.load().await?;
        let before = snapshot.len();
        if !snapshot.sweep(now) {
            return Ok((snapshot, 0));
        }

        let removed = before - snapshot.len();
        info!(removed, remaining = snapshot.len(), %now, "Expired reservations removed");
        Ok((snapshot, removed))
    }

    /// Every catalog resource joined with its live reservation, in catalog order.
    ///
    /// Persists only when the sweep removed something.
    pub async fn list_resources(&self, identity: &str) -> AppResult<Vec<ResourceView>> {
        let _guard = self.lock.lock().await;
        let _store_lock = self.store.lock().await?;
        let now = self.clock.now();

        let (snapshot, removed) = self.load_swept(now).await?;
        if removed > 0 {
            self.store.save(&snapshot).await?;
        }

        Ok(self
            .catalog
            .iter()
            .map(|descriptor| {
                ResourceView::build(descriptor, snapshot.get(&descriptor.id), identity)
            })
            .collect())
    }

    /// Grants `identity` an exclusive hold on `resource_id`.
    ///
    /// `deadline` is an optional `HH:MM` wall-clock time; blank or absent
    /// means midnight tonight.
    pub async fn reserve(
        &self,
        resource_id: &str,
        identity: &str,
        deadline: Option<&str>,
    ) -> Result<Reservation, ReserveError> {
        if identity.trim().is_empty() {
            return Err(ReserveError::UnknownIdentity);
        }
        if self.require_known_resource && !self.catalog.contains(resource_id) {
            debug!(resource_id, user = identity, "Rejected reservation for unknown resource");
            return Err(ReserveError::UnknownResource(resource_id.to_string()));
        }

        let _guard = self.lock.lock().await;
        let _store_lock = self.store.lock().await?;
        let now = self.clock.now();
        let (mut snapshot, _) = self.load_swept(now).await?;

        if let Some(existing) = snapshot.get(resource_id) {
            debug!(
                resource_id,
                user = identity,
                holder = %existing.user,
                "Rejected reservation, resource already held"
            );
            return Err(ReserveError::AlreadyReserved {
                resource_id: resource_id.to_string(),
            });
        }

        let expires_at = match deadline.map(str::trim).filter(|d| !d.is_empty()) {
            Some(text) => self.policy.parse_deadline(text, now)?,
            None => self.policy.default_deadline(now),
        };
        let reserved_at = self.policy.localize(now);
        if expires_at <= reserved_at {
            return Err(ReserveError::InvalidDeadline(format!(
                "deadline {expires_at} is not after {reserved_at}"
            )));
        }

        let reservation = Reservation {
            resource_id: resource_id.to_string(),
            user: identity.to_string(),
            reserved_at,
            expires_at,
        };
        snapshot.insert(reservation.clone());
        self.store.save(&snapshot).await?;

        info!(
            resource_id,
            user = identity,
            expires_at = %reservation.expires_at,
            "Resource reserved"
        );
        Ok(reservation)
    }

    /// Ends `identity`'s reservation on `resource_id`.
    ///
    /// Only the holder may release; there is no administrative override.
    pub async fn release(&self, resource_id: &str, identity: &str) -> Result<(), ReleaseError> {
        if identity.trim().is_empty() {
            return Err(ReleaseError::UnknownIdentity);
        }

        let _guard = self.lock.lock().await;
        let _store_lock = self.store.lock().await?;
        let now = self.clock.now();
        let (mut snapshot, _) = self.load_swept(now).await?;

        match snapshot.get(resource_id) {
            None => {
                debug!(resource_id, user = identity, "Release of unreserved resource");
                return Err(ReleaseError::NotReserved(resource_id.to_string()));
            }
            Some(existing) if !existing.is_held_by(identity) => {
                warn!(
                    resource_id,
                    user = identity,
                    holder = %existing.user,
                    "Rejected release by non-owner"
                );
                return Err(ReleaseError::NotOwner {
                    resource_id: resource_id.to_string(),
                });
            }
            Some(_) => {}
        }

        snapshot.remove(resource_id);
        self.store.save(&snapshot).await?;

        info!(resource_id, user = identity, "Reservation released");
        Ok(())
    }

    /// Removes all expired reservations and persists if any were removed.
    ///
    /// Returns how many reservations were dropped.
    pub async fn sweep_expired(&self) -> AppResult<usize> {
        let _guard = self.lock.lock().await;
        let _store_lock = self.store.lock().await?;
        let now = self.clock.now();

        let (snapshot, removed) = self.load_swept(now).await?;
        if removed > 0 {
            self.store.save(&snapshot).await?;
            info!(removed, remaining = snapshot.len(), "Expiry sweep completed");
        }
        Ok(removed)
    }
}
