//! # Repository Module
//!
//! Record store implementations for employee persistence.

pub mod memory_impl;
#[cfg(feature = "postgres")]
pub mod postgres_impl;
pub mod traits;

pub use memory_impl::MemoryEmployeeStore;
#[cfg(feature = "postgres")]
pub use postgres_impl::{PostgresClient, PostgresConfig, PostgresEmployeeStore};
pub use traits::{RecordStore, SharedRecordStore};
