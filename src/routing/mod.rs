//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Read operation dispatched by the connection manager
//!     → read.rs (candidate set from ReadMode: master, slaves, or both)
//!     → LoadBalancer::select_entry (SLAVE / MASTER_SLAVE only)
//!     → Return: chosen ConnectionEntry or RoutingError
//! ```
//!
//! # Design Decisions
//! - Config is frozen before routing; routing only reads it
//! - Deterministic candidate order: master first, then slaves as given
//! - Explicit error rather than panicking on an empty candidate set

pub mod read;

pub use read::{read_candidates, route_read, RoutingError};
