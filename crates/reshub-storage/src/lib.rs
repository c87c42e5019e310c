//! # reshub-storage
//!
//! Durable homes for the reservation snapshot. Stores only know how to load
//! and replace the whole snapshot atomically, and how to exclude other
//! processes for the length of one cycle. They enforce no reservation rules.

pub mod file;
pub mod memory;
pub mod store;

pub use file::JsonFileStore;
pub use memory::MemoryStateStore;
pub use store::{StateStore, StoreLock};
