//! Connection entry abstraction.
//!
//! # Responsibilities
//! - Represent a single master or slave node as seen by the balancers
//! - Bound command and subscription connections by the configured pool sizes
//! - Track the frozen flag (entry excluded from read routing)

use std::fmt;
use std::net::SocketAddr;
use std::ops::Deref;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use serde::Serialize;

use crate::config::MasterSlaveConfig;

/// Role of a node in the deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    Master,
    Slave,
}

/// Connection category maintained per node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionKind {
    /// Short-lived request/response connections.
    Command,
    /// Long-lived pub/sub connections.
    Subscription,
}

/// Pool bounds for one connection category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolLimits {
    pub minimum_idle: usize,
    pub max_size: usize,
}

/// A single node and its connection accounting.
#[derive(Debug)]
pub struct ConnectionEntry {
    /// The address of the node.
    pub addr: SocketAddr,
    pub node_type: NodeType,
    pub command_pool: PoolLimits,
    pub subscription_pool: PoolLimits,

    command_leased: AtomicUsize,
    subscription_leased: AtomicUsize,
    frozen: AtomicBool,
}

impl ConnectionEntry {
    /// Create an entry with explicit pool limits.
    pub fn new(
        addr: SocketAddr,
        node_type: NodeType,
        command_pool: PoolLimits,
        subscription_pool: PoolLimits,
    ) -> Self {
        Self {
            addr,
            node_type,
            command_pool,
            subscription_pool,
            command_leased: AtomicUsize::new(0),
            subscription_leased: AtomicUsize::new(0),
            frozen: AtomicBool::new(false),
        }
    }

    /// Create an entry sized from the configuration for the given node role.
    ///
    /// Masters have no subscription pool in this model.
    pub fn for_node(addr: SocketAddr, node_type: NodeType, config: &MasterSlaveConfig) -> Self {
        let (command_pool, subscription_pool) = match node_type {
            NodeType::Master => (
                PoolLimits {
                    minimum_idle: config.master_connection_minimum_idle_size(),
                    max_size: config.master_connection_pool_size(),
                },
                PoolLimits { minimum_idle: 0, max_size: 0 },
            ),
            NodeType::Slave => (
                PoolLimits {
                    minimum_idle: config.slave_connection_minimum_idle_size(),
                    max_size: config.slave_connection_pool_size(),
                },
                PoolLimits {
                    minimum_idle: config.slave_subscription_connection_minimum_idle_size(),
                    max_size: config.slave_subscription_connection_pool_size(),
                },
            ),
        };
        Self::new(addr, node_type, command_pool, subscription_pool)
    }

    fn counter(&self, kind: ConnectionKind) -> (&AtomicUsize, usize) {
        match kind {
            ConnectionKind::Command => (&self.command_leased, self.command_pool.max_size),
            ConnectionKind::Subscription => {
                (&self.subscription_leased, self.subscription_pool.max_size)
            }
        }
    }

    /// Number of connections of `kind` currently leased.
    pub fn leased(&self, kind: ConnectionKind) -> usize {
        self.counter(kind).0.load(Ordering::Relaxed)
    }

    /// Try to lease a connection slot. Returns `None` once the pool is exhausted.
    pub fn try_acquire(self: &Arc<Self>, kind: ConnectionKind) -> Option<ConnectionLease> {
        let (counter, limit) = self.counter(kind);
        let mut prev = counter.load(Ordering::Relaxed);
        loop {
            if prev >= limit {
                return None;
            }
            match counter.compare_exchange_weak(prev, prev + 1, Ordering::AcqRel, Ordering::Relaxed) {
                Ok(_) => break,
                Err(x) => prev = x,
            }
        }
        Some(ConnectionLease {
            entry: self.clone(),
            kind,
        })
    }

    fn release(&self, kind: ConnectionKind) {
        self.counter(kind).0.fetch_sub(1, Ordering::AcqRel);
    }

    /// Exclude the entry from read routing.
    pub fn freeze(&self) {
        if !self.frozen.swap(true, Ordering::Relaxed) {
            tracing::debug!(addr = %self.addr, node_type = ?self.node_type, "Entry frozen");
        }
    }

    /// Return the entry to read routing.
    pub fn unfreeze(&self) {
        if self.frozen.swap(false, Ordering::Relaxed) {
            tracing::debug!(addr = %self.addr, node_type = ?self.node_type, "Entry unfrozen");
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::Relaxed)
    }
}

impl fmt::Display for ConnectionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}[{}]", self.node_type, self.addr)
    }
}

/// A RAII guard holding one leased connection slot.
#[derive(Debug)]
pub struct ConnectionLease {
    pub entry: Arc<ConnectionEntry>,
    pub kind: ConnectionKind,
}

impl Deref for ConnectionLease {
    type Target = ConnectionEntry;
    fn deref(&self) -> &Self::Target {
        &self.entry
    }
}

impl Drop for ConnectionLease {
    fn drop(&mut self) {
        self.entry.release(self.kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slave_entry_sized_from_config() {
        let mut config = MasterSlaveConfig::default();
        config
            .set_slave_connection_pool_size(2)
            .set_slave_subscription_connection_pool_size(1);
        let entry = ConnectionEntry::for_node("127.0.0.1:6380".parse().unwrap(), NodeType::Slave, &config);
        assert_eq!(entry.command_pool, PoolLimits { minimum_idle: 10, max_size: 2 });
        assert_eq!(entry.subscription_pool, PoolLimits { minimum_idle: 1, max_size: 1 });
    }

    #[test]
    fn test_master_has_no_subscription_pool() {
        let config = MasterSlaveConfig::default();
        let entry = Arc::new(ConnectionEntry::for_node(
            "127.0.0.1:6379".parse().unwrap(),
            NodeType::Master,
            &config,
        ));
        assert_eq!(entry.command_pool.max_size, 64);
        assert!(entry.try_acquire(ConnectionKind::Subscription).is_none());
    }

    #[test]
    fn test_lease_bounded_and_released() {
        let mut config = MasterSlaveConfig::default();
        config.set_slave_connection_pool_size(2);
        let entry = Arc::new(ConnectionEntry::for_node(
            "127.0.0.1:6380".parse().unwrap(),
            NodeType::Slave,
            &config,
        ));

        let l1 = entry.try_acquire(ConnectionKind::Command).unwrap();
        let _l2 = entry.try_acquire(ConnectionKind::Command).unwrap();
        assert!(entry.try_acquire(ConnectionKind::Command).is_none());
        assert_eq!(entry.leased(ConnectionKind::Command), 2);
        // Subscription pool is independent
        assert!(entry.try_acquire(ConnectionKind::Subscription).is_some());

        drop(l1);
        assert_eq!(entry.leased(ConnectionKind::Command), 1);
        assert!(entry.try_acquire(ConnectionKind::Command).is_some());
    }

    #[test]
    fn test_freeze_toggle() {
        let entry = ConnectionEntry::for_node(
            "127.0.0.1:6380".parse().unwrap(),
            NodeType::Slave,
            &MasterSlaveConfig::default(),
        );
        assert!(!entry.is_frozen());
        entry.freeze();
        assert!(entry.is_frozen());
        entry.unfreeze();
        assert!(!entry.is_frozen());
    }
}
