//! Weighted round-robin load balancing strategy.
//!
//! Smooth weighted rotation: on every call each candidate's running score grows
//! by its weight, the highest score wins and pays back the total weight. Over
//! any window of `sum(weights)` calls each node is picked `weight` times, and
//! heavy nodes are interleaved with light ones rather than picked in bursts.

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use crate::load_balancer::{LoadBalancer, LoadBalancerKind, entry::ConnectionEntry};

/// Weighted round-robin selector keyed by node address.
#[derive(Debug)]
pub struct WeightedRoundRobin {
    weights: HashMap<SocketAddr, u32>,
    default_weight: u32,
    /// Running score per address.
    scores: Mutex<HashMap<SocketAddr, i64>>,
}

impl WeightedRoundRobin {
    /// Weights are kept as given so the balancer can be described back to a
    /// config file. Config validation rejects zeros; a balancer built
    /// directly treats them as one.
    pub fn new(weights: HashMap<SocketAddr, u32>, default_weight: u32) -> Self {
        Self {
            weights,
            default_weight,
            scores: Mutex::new(HashMap::new()),
        }
    }

    /// Effective weight used for selection.
    pub fn weight_of(&self, addr: &SocketAddr) -> u32 {
        self.weights.get(addr).copied().unwrap_or(self.default_weight).max(1)
    }
}

impl LoadBalancer for WeightedRoundRobin {
    fn select_entry(&self, entries: &[Arc<ConnectionEntry>]) -> Option<Arc<ConnectionEntry>> {
        if entries.is_empty() {
            return None;
        }

        let mut scores = self.scores.lock().unwrap_or_else(|e| e.into_inner());

        let mut total: i64 = 0;
        let mut best: Option<(usize, i64)> = None;
        for (i, entry) in entries.iter().enumerate() {
            let weight = i64::from(self.weight_of(&entry.addr));
            total += weight;
            let score = scores.entry(entry.addr).or_insert(0);
            *score += weight;
            if best.map_or(true, |(_, top)| *score > top) {
                best = Some((i, *score));
            }
        }

        // Every candidate now has a score, so any extra belongs to a node that left
        if scores.len() > entries.len() {
            let live: HashSet<SocketAddr> = entries.iter().map(|e| e.addr).collect();
            scores.retain(|addr, _| live.contains(addr));
        }

        let (index, _) = best?;
        let picked = &entries[index];
        if let Some(score) = scores.get_mut(&picked.addr) {
            *score -= total;
        }
        Some(picked.clone())
    }

    fn name(&self) -> &'static str {
        "weighted_round_robin"
    }

    fn kind(&self) -> Option<LoadBalancerKind> {
        Some(LoadBalancerKind::WeightedRoundRobin {
            weights: self
                .weights
                .iter()
                .map(|(addr, weight)| (addr.to_string(), *weight))
                .collect(),
            default_weight: self.default_weight,
        })
    }
}
