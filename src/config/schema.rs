//! Configuration schema definitions.
//!
//! `MasterSlaveConfig` holds the pool sizing and read routing knobs for a
//! master/slave deployment. `MasterSlaveServersConfig` is the more specific
//! configuration that adds node addresses and is derived from a base config.
//! All types derive Serde traits for deserialization from config files.

use std::fmt;
use std::sync::Arc;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde::ser::SerializeStruct;

use crate::config::loader::ConfigError;
use crate::config::read_mode::ReadMode;
use crate::config::validation::validate_config;
use crate::load_balancer::{LoadBalancer, LoadBalancerKind, RoundRobin};

/// Connection pool categories sized by the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolKind {
    /// Master command connections.
    MasterCommand,
    /// Command connections, per slave node.
    SlaveCommand,
    /// Pub/sub connections, per slave node.
    SlaveSubscription,
}

impl fmt::Display for PoolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PoolKind::MasterCommand => "master connection pool",
            PoolKind::SlaveCommand => "slave connection pool",
            PoolKind::SlaveSubscription => "slave subscription connection pool",
        };
        f.write_str(s)
    }
}

/// Pool sizing and read routing for a master/slave deployment.
///
/// Setters return `&mut Self` so calls can be chained. Nothing is validated on
/// assignment; [`MasterSlaveConfig::freeze`] validates and hands back the
/// shared read-only artifact consumed by the connection manager.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MasterSlaveConfig {
    /// Strategy picking a node for each read. Round-robin by default.
    #[serde(
        serialize_with = "serialize_balancer",
        deserialize_with = "deserialize_balancer"
    )]
    load_balancer: Arc<dyn LoadBalancer>,

    /// Minimum idle pub/sub connections for each slave node.
    slave_subscription_connection_minimum_idle_size: usize,

    /// Maximum pub/sub connections for each slave node.
    slave_subscription_connection_pool_size: usize,

    /// Minimum idle command connections for each slave node.
    slave_connection_minimum_idle_size: usize,

    /// Maximum command connections for each slave node.
    slave_connection_pool_size: usize,

    /// Minimum idle command connections to the master.
    master_connection_minimum_idle_size: usize,

    /// Maximum command connections to the master.
    master_connection_pool_size: usize,

    read_mode: ReadMode,
}

impl Default for MasterSlaveConfig {
    fn default() -> Self {
        Self {
            load_balancer: Arc::new(RoundRobin::new()),
            slave_subscription_connection_minimum_idle_size: 1,
            slave_subscription_connection_pool_size: 50,
            slave_connection_minimum_idle_size: 10,
            slave_connection_pool_size: 64,
            master_connection_minimum_idle_size: 10,
            master_connection_pool_size: 64,
            read_mode: ReadMode::Slave,
        }
    }
}

impl AsRef<MasterSlaveConfig> for MasterSlaveConfig {
    fn as_ref(&self) -> &MasterSlaveConfig {
        self
    }
}

impl MasterSlaveConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a new config from any config carrying master/slave settings.
    ///
    /// Scalars are copied by value; the load balancer is shared with the source.
    pub fn copy_from<C: AsRef<MasterSlaveConfig>>(source: &C) -> Self {
        let source = source.as_ref();
        let mut config = Self::default();
        config
            .set_load_balancer(source.load_balancer().clone())
            .set_master_connection_pool_size(source.master_connection_pool_size())
            .set_slave_connection_pool_size(source.slave_connection_pool_size())
            .set_slave_subscription_connection_pool_size(source.slave_subscription_connection_pool_size())
            .set_master_connection_minimum_idle_size(source.master_connection_minimum_idle_size())
            .set_slave_connection_minimum_idle_size(source.slave_connection_minimum_idle_size())
            .set_slave_subscription_connection_minimum_idle_size(
                source.slave_subscription_connection_minimum_idle_size(),
            )
            .set_read_mode(source.read_mode());
        config
    }

    /// Command connection pool size for each slave node. Default 64.
    pub fn set_slave_connection_pool_size(&mut self, size: usize) -> &mut Self {
        self.slave_connection_pool_size = size;
        self
    }

    pub fn slave_connection_pool_size(&self) -> usize {
        self.slave_connection_pool_size
    }

    /// Master command connection pool size. Default 64.
    pub fn set_master_connection_pool_size(&mut self, size: usize) -> &mut Self {
        self.master_connection_pool_size = size;
        self
    }

    pub fn master_connection_pool_size(&self) -> usize {
        self.master_connection_pool_size
    }

    /// Replace the read load balancer. The previous strategy is dropped, not mutated.
    pub fn set_load_balancer(&mut self, load_balancer: Arc<dyn LoadBalancer>) -> &mut Self {
        self.load_balancer = load_balancer;
        self
    }

    pub fn load_balancer(&self) -> &Arc<dyn LoadBalancer> {
        &self.load_balancer
    }

    /// Pub/sub connection pool size for each slave node. Default 50.
    pub fn set_slave_subscription_connection_pool_size(&mut self, size: usize) -> &mut Self {
        self.slave_subscription_connection_pool_size = size;
        self
    }

    pub fn slave_subscription_connection_pool_size(&self) -> usize {
        self.slave_subscription_connection_pool_size
    }

    /// Minimum idle command connections for each slave node. Default 10.
    pub fn set_slave_connection_minimum_idle_size(&mut self, size: usize) -> &mut Self {
        self.slave_connection_minimum_idle_size = size;
        self
    }

    pub fn slave_connection_minimum_idle_size(&self) -> usize {
        self.slave_connection_minimum_idle_size
    }

    /// Minimum idle master command connections. Default 10.
    pub fn set_master_connection_minimum_idle_size(&mut self, size: usize) -> &mut Self {
        self.master_connection_minimum_idle_size = size;
        self
    }

    pub fn master_connection_minimum_idle_size(&self) -> usize {
        self.master_connection_minimum_idle_size
    }

    /// Minimum idle pub/sub connections for each slave node. Default 1.
    pub fn set_slave_subscription_connection_minimum_idle_size(&mut self, size: usize) -> &mut Self {
        self.slave_subscription_connection_minimum_idle_size = size;
        self
    }

    pub fn slave_subscription_connection_minimum_idle_size(&self) -> usize {
        self.slave_subscription_connection_minimum_idle_size
    }

    /// Node class used for reads. Default `SLAVE`.
    pub fn set_read_mode(&mut self, read_mode: ReadMode) -> &mut Self {
        self.read_mode = read_mode;
        self
    }

    pub fn read_mode(&self) -> ReadMode {
        self.read_mode
    }

    /// `(pool, minimum idle, pool size)` for every pool category.
    pub fn pools(&self) -> [(PoolKind, usize, usize); 3] {
        [
            (
                PoolKind::MasterCommand,
                self.master_connection_minimum_idle_size,
                self.master_connection_pool_size,
            ),
            (
                PoolKind::SlaveCommand,
                self.slave_connection_minimum_idle_size,
                self.slave_connection_pool_size,
            ),
            (
                PoolKind::SlaveSubscription,
                self.slave_subscription_connection_minimum_idle_size,
                self.slave_subscription_connection_pool_size,
            ),
        ]
    }

    /// Validate and freeze into the shared read-only form.
    pub fn freeze(self) -> Result<Arc<MasterSlaveConfig>, ConfigError> {
        if let Err(errors) = validate_config(&self) {
            tracing::error!(error_count = errors.len(), "Master/slave configuration rejected");
            return Err(ConfigError::Validation(errors));
        }

        tracing::debug!(
            read_mode = %self.read_mode,
            load_balancer = self.load_balancer.name(),
            master_pool = self.master_connection_pool_size,
            slave_pool = self.slave_connection_pool_size,
            slave_subscription_pool = self.slave_subscription_connection_pool_size,
            "Master/slave configuration frozen"
        );
        Ok(Arc::new(self))
    }
}

fn serialize_balancer<S: Serializer>(lb: &Arc<dyn LoadBalancer>, s: S) -> Result<S::Ok, S::Error> {
    if let Some(kind) = lb.kind() {
        return kind.serialize(s);
    }
    // Custom strategies have no file form; record the name only
    let mut state = s.serialize_struct("LoadBalancer", 1)?;
    state.serialize_field("type", lb.name())?;
    state.end()
}

fn deserialize_balancer<'de, D: Deserializer<'de>>(d: D) -> Result<Arc<dyn LoadBalancer>, D::Error> {
    let kind = LoadBalancerKind::deserialize(d)?;
    if let LoadBalancerKind::WeightedRoundRobin { weights, .. } = &kind {
        if let Some(bad) = weights.keys().find(|addr| addr.parse::<std::net::SocketAddr>().is_err()) {
            return Err(serde::de::Error::custom(format!(
                "invalid node address in load balancer weights: '{}'",
                bad
            )));
        }
    }
    Ok(kind.build())
}

/// Master/slave deployment: node addresses plus the master/slave settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MasterSlaveServersConfig {
    /// Master node address (e.g., "127.0.0.1:6379").
    pub master_address: Option<String>,

    /// Slave node addresses.
    pub slave_addresses: Vec<String>,

    /// Database index selected on connect.
    pub database: u32,

    /// Pool sizing and read routing.
    pub master_slave: MasterSlaveConfig,
}

impl AsRef<MasterSlaveConfig> for MasterSlaveServersConfig {
    fn as_ref(&self) -> &MasterSlaveConfig {
        &self.master_slave
    }
}

impl MasterSlaveServersConfig {
    /// Derive a servers config from a base config. Addresses start empty.
    pub fn from_base<C: AsRef<MasterSlaveConfig>>(base: &C) -> Self {
        Self {
            master_slave: MasterSlaveConfig::copy_from(base),
            ..Self::default()
        }
    }

    pub fn set_master_address(&mut self, address: impl Into<String>) -> &mut Self {
        self.master_address = Some(address.into());
        self
    }

    pub fn add_slave_address(&mut self, address: impl Into<String>) -> &mut Self {
        self.slave_addresses.push(address.into());
        self
    }

    pub fn set_database(&mut self, database: u32) -> &mut Self {
        self.database = database;
        self
    }
}
