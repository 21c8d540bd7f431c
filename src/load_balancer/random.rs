//! Uniform random load balancing strategy.

use std::sync::Arc;
use rand::Rng;
use crate::load_balancer::{LoadBalancer, LoadBalancerKind, entry::ConnectionEntry};

/// Random selector. Keeps no state between calls.
#[derive(Debug, Default)]
pub struct RandomBalancer;

impl RandomBalancer {
    pub fn new() -> Self {
        Self
    }
}

impl LoadBalancer for RandomBalancer {
    fn select_entry(&self, entries: &[Arc<ConnectionEntry>]) -> Option<Arc<ConnectionEntry>> {
        if entries.is_empty() {
            return None;
        }
        let index = rand::thread_rng().gen_range(0..entries.len());
        Some(entries[index].clone())
    }

    fn name(&self) -> &'static str {
        "random"
    }

    fn kind(&self) -> Option<LoadBalancerKind> {
        Some(LoadBalancerKind::Random)
    }
}
