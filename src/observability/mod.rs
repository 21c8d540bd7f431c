//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! config loading, validation, freezing, read routing
//!     → tracing events (structured fields)
//!     → logging.rs subscriber (stderr)
//! ```

pub mod logging;

pub use logging::init_logging;
