//! # reshub-service
//!
//! The reservation state manager and its collaborators. All reservation
//! reads and writes go through [`ReservationManager`], which serializes them
//! behind one lock and persists through a [`reshub_storage::StateStore`].
//!
//! Services follow constructor injection: the catalog, store, clock, and
//! expiry policy are provided at construction time.

pub mod catalog;
pub mod error;
pub mod manager;
pub mod policy;
pub mod sweeper;

pub use catalog::{Catalog, CatalogError};
pub use error::{ReleaseError, ReserveError};
pub use manager::ReservationManager;
pub use policy::{ExpiryPolicy, InvalidTimeFormat};
pub use sweeper::ExpirySweeper;
