//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! Read dispatched → routing::read (candidate set per ReadMode)
//!     → Apply the configured algorithm:
//!         - round_robin.rs (rotate through entries)
//!         - weighted.rs (smooth weighted rotation)
//!         - random.rs (uniform pick)
//!     → entry.rs (lease a command or subscription connection)
//! ```
//!
//! # Design Decisions
//! - Algorithm selected once per configuration, shared via Arc
//! - Selection never fabricates an entry: result is always one of the inputs
//! - Internal state is atomic or lock-protected; balancers are called concurrently

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;
use serde::{Deserialize, Serialize};

pub mod entry;
pub mod random;
pub mod round_robin;
pub mod weighted;

pub use entry::{ConnectionEntry, ConnectionKind, ConnectionLease, NodeType};
pub use random::RandomBalancer;
pub use round_robin::RoundRobin;
pub use weighted::WeightedRoundRobin;

/// Strategy choosing one connection entry among the available candidates.
pub trait LoadBalancer: Send + Sync + Debug {
    /// Select one entry from `entries`.
    ///
    /// Callers must pass a non-empty slice; an empty slice yields `None`.
    fn select_entry(&self, entries: &[Arc<ConnectionEntry>]) -> Option<Arc<ConnectionEntry>>;

    /// Short algorithm name used in logs and config dumps.
    fn name(&self) -> &'static str;

    /// File form of this balancer, if it has one. Config dumps write it out
    /// so that reading the dump back yields the same strategy.
    fn kind(&self) -> Option<LoadBalancerKind> {
        None
    }
}

/// File representation of a load balancer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LoadBalancerKind {
    #[default]
    RoundRobin,
    WeightedRoundRobin {
        /// Node address -> weight.
        #[serde(default)]
        weights: HashMap<String, u32>,
        /// Weight for nodes missing from `weights`.
        #[serde(default = "default_weight")]
        default_weight: u32,
    },
    Random,
}

fn default_weight() -> u32 {
    1
}

impl LoadBalancerKind {
    /// Instantiate the strategy. Config parsing rejects unparsable addresses in
    /// `weights` before this runs; any left when building by hand are skipped.
    pub fn build(&self) -> Arc<dyn LoadBalancer> {
        match self {
            LoadBalancerKind::RoundRobin => Arc::new(RoundRobin::new()),
            LoadBalancerKind::WeightedRoundRobin { weights, default_weight } => {
                let parsed = weights
                    .iter()
                    .filter_map(|(addr, weight)| match addr.parse() {
                        Ok(addr) => Some((addr, *weight)),
                        Err(_) => {
                            tracing::warn!(address = %addr, "Ignoring weight for invalid address");
                            None
                        }
                    })
                    .collect();
                Arc::new(WeightedRoundRobin::new(parsed, *default_weight))
            }
            LoadBalancerKind::Random => Arc::new(RandomBalancer::new()),
        }
    }
}
