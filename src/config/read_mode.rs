//! Read routing policy.

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

/// Node class(es) that serve read operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReadMode {
    /// Reads go to the master only. No replica balancing happens.
    Master,
    /// Reads go to slave nodes through the load balancer.
    #[default]
    Slave,
    /// Reads are balanced across the master and all slaves.
    MasterSlave,
}

impl ReadMode {
    /// Returns `true` if the master may serve reads in this mode.
    pub const fn uses_master(self) -> bool {
        matches!(self, ReadMode::Master | ReadMode::MasterSlave)
    }

    /// Returns `true` if slaves may serve reads in this mode.
    pub const fn uses_slaves(self) -> bool {
        matches!(self, ReadMode::Slave | ReadMode::MasterSlave)
    }
}

impl fmt::Display for ReadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReadMode::Master => "MASTER",
            ReadMode::Slave => "SLAVE",
            ReadMode::MasterSlave => "MASTER_SLAVE",
        };
        f.write_str(s)
    }
}

/// Error returned when a read mode string is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown read mode '{0}' (expected MASTER, SLAVE or MASTER_SLAVE)")]
pub struct ParseReadModeError(pub String);

impl FromStr for ReadMode {
    type Err = ParseReadModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "MASTER" => Ok(ReadMode::Master),
            "SLAVE" => Ok(ReadMode::Slave),
            "MASTER_SLAVE" => Ok(ReadMode::MasterSlave),
            _ => Err(ParseReadModeError(s.to_string())),
        }
    }
}
