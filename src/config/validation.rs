//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check pool sizing (non-zero pools, minimum idle within pool size)
//! - Check node addresses parse and are not repeated
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: config → Result<(), Vec<ValidationError>>
//! - Runs before config is handed to the connection manager

use std::collections::HashSet;
use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::{MasterSlaveConfig, MasterSlaveServersConfig, PoolKind};
use crate::load_balancer::LoadBalancerKind;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{pool} size must be greater than zero")]
    ZeroPoolSize { pool: PoolKind },

    #[error("{pool} minimum idle size {minimum_idle} exceeds pool size {pool_size}")]
    IdleExceedsPoolSize {
        pool: PoolKind,
        minimum_idle: usize,
        pool_size: usize,
    },

    #[error("load balancer weight for '{0}' must be greater than zero")]
    ZeroWeight(String),

    #[error("load balancer default weight must be greater than zero")]
    ZeroDefaultWeight,

    #[error("master address is not set")]
    MissingMasterAddress,

    #[error("invalid node address '{0}'")]
    InvalidAddress(String),

    #[error("node address '{0}' is listed more than once")]
    DuplicateAddress(String),
}

/// Validate pool sizing and balancer weights.
pub fn validate_config(config: &MasterSlaveConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (pool, minimum_idle, pool_size) in config.pools() {
        if pool_size == 0 {
            errors.push(ValidationError::ZeroPoolSize { pool });
        } else if minimum_idle > pool_size {
            errors.push(ValidationError::IdleExceedsPoolSize {
                pool,
                minimum_idle,
                pool_size,
            });
        }
    }

    if let Some(LoadBalancerKind::WeightedRoundRobin { weights, default_weight }) =
        config.load_balancer().kind()
    {
        let mut zero: Vec<String> = weights
            .into_iter()
            .filter(|(_, weight)| *weight == 0)
            .map(|(addr, _)| addr)
            .collect();
        zero.sort();
        errors.extend(zero.into_iter().map(ValidationError::ZeroWeight));
        if default_weight == 0 {
            errors.push(ValidationError::ZeroDefaultWeight);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate node addresses and the embedded master/slave settings.
pub fn validate_servers(config: &MasterSlaveServersConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = match validate_config(&config.master_slave) {
        Ok(()) => Vec::new(),
        Err(errors) => errors,
    };

    let mut seen = HashSet::new();
    match &config.master_address {
        None => errors.push(ValidationError::MissingMasterAddress),
        Some(addr) => check_address(addr, &mut seen, &mut errors),
    }
    for addr in &config.slave_addresses {
        check_address(addr, &mut seen, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(addr: &str, seen: &mut HashSet<SocketAddr>, errors: &mut Vec<ValidationError>) {
    match addr.parse::<SocketAddr>() {
        Ok(parsed) => {
            if !seen.insert(parsed) {
                errors.push(ValidationError::DuplicateAddress(addr.to_string()));
            }
        }
        Err(_) => errors.push(ValidationError::InvalidAddress(addr.to_string())),
    }
}
