//! # reshub-entity
//!
//! Domain entity models for ResHub. Every struct in this crate is either a
//! persisted record (part of the reservation snapshot), a catalog value
//! object, or a read model handed to callers. All entities derive `Debug`,
//! `Clone`, `Serialize`, and `Deserialize`.

pub mod reservation;
pub mod resource;
pub mod snapshot;
pub mod view;

pub use reservation::Reservation;
pub use resource::ResourceDescriptor;
pub use snapshot::StateSnapshot;
pub use view::{ReservationView, ResourceView};
