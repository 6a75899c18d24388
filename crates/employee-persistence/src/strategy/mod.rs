//! # Strategy Module
//!
//! Enum-dispatched policies for how the accessor treats its cache.
//!
//! ## Available Policies
//!
//! ### Cache Write Policy
//! - `FailFast` - A failed cache write fails the whole operation (default)
//! - `BestEffort` - A failed cache write is logged and the operation succeeds
//!
//! Cache *reads* have no policy: a miss falls back to the store, a read error
//! is always returned to the caller.
//!
//! ## Example
//!
//! ```rust,ignore
//! use employee_persistence::strategy::CacheWritePolicy;
//!
//! let policy: CacheWritePolicy = "best-effort".parse()?;
//! policy.write("emp:1", cache.set("emp:1", json, ttl)).await?;
//! ```

pub mod write_policy;

pub use write_policy::{CacheWritePolicy, ParsePolicyError};
