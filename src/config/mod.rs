//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)                 builder code
//!     → loader.rs (parse)                → setters on MasterSlaveConfig
//!     → validation.rs (semantic checks)  → freeze() (validation.rs)
//!     → MasterSlaveServersConfig         → Arc<MasterSlaveConfig>
//!     → shared via Arc with the connection manager
//! ```
//!
//! # Design Decisions
//! - Mutable while building, read-only once frozen behind an Arc
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - No live reconfiguration; a new config means a new Arc

pub mod loader;
pub mod read_mode;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use read_mode::ReadMode;
pub use schema::{MasterSlaveConfig, MasterSlaveServersConfig, PoolKind};
pub use validation::ValidationError;
