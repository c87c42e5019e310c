//! # reshub-core
//!
//! Core crate for ResHub. Contains the configuration schema, the injectable
//! clock, the configured timezone, and the unified error system.
//!
//! This crate has **no** internal dependencies on other ResHub crates.

pub mod clock;
pub mod config;
pub mod error;
pub mod result;
pub mod timezone;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::AppError;
pub use result::AppResult;
pub use timezone::Timezone;
