//! Read dispatch.
//!
//! # Responsibilities
//! - Build the candidate set for a read from the ReadMode
//! - Invoke the configured load balancer on that set
//! - Report an explicit error when no node can serve the read
//!
//! # Design Decisions
//! - Frozen entries never become candidates
//! - Empty candidate sets are rejected before the balancer runs

use std::sync::Arc;
use thiserror::Error;

use crate::config::{MasterSlaveConfig, ReadMode};
use crate::load_balancer::ConnectionEntry;

/// Errors surfaced when routing a read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    #[error("no available node for read mode {0}")]
    NoAvailableEntries(ReadMode),
}

/// Entries eligible to serve a read under `mode`, master first.
pub fn read_candidates(
    mode: ReadMode,
    master: &Arc<ConnectionEntry>,
    slaves: &[Arc<ConnectionEntry>],
) -> Vec<Arc<ConnectionEntry>> {
    let mut candidates = Vec::with_capacity(slaves.len() + 1);
    if mode.uses_master() && !master.is_frozen() {
        candidates.push(master.clone());
    }
    if mode.uses_slaves() {
        candidates.extend(slaves.iter().filter(|e| !e.is_frozen()).cloned());
    }
    candidates
}

/// Pick the node serving the next read.
pub fn route_read(
    config: &MasterSlaveConfig,
    master: &Arc<ConnectionEntry>,
    slaves: &[Arc<ConnectionEntry>],
) -> Result<Arc<ConnectionEntry>, RoutingError> {
    let mode = config.read_mode();
    let candidates = read_candidates(mode, master, slaves);
    if candidates.is_empty() {
        tracing::debug!(read_mode = %mode, slave_count = slaves.len(), "No available node for read");
        return Err(RoutingError::NoAvailableEntries(mode));
    }

    if mode == ReadMode::Master {
        return Ok(candidates[0].clone());
    }

    config
        .load_balancer()
        .select_entry(&candidates)
        .ok_or(RoutingError::NoAvailableEntries(mode))
}
