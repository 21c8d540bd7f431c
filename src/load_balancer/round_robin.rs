//! Round-robin load balancing strategy.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use crate::load_balancer::{LoadBalancer, LoadBalancerKind, entry::ConnectionEntry};

/// Round-robin selector.
/// Stores an internal counter to rotate through entries.
///
/// The cursor is relative to the order of the slice passed on each call, not
/// to node identity, so a node can be visited more or less often around
/// membership changes.
#[derive(Debug, Default)]
pub struct RoundRobin {
    counter: AtomicUsize,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LoadBalancer for RoundRobin {
    fn select_entry(&self, entries: &[Arc<ConnectionEntry>]) -> Option<Arc<ConnectionEntry>> {
        if entries.is_empty() {
            return None;
        }

        let index = self.counter.fetch_add(1, Ordering::Relaxed) % entries.len();
        Some(entries[index].clone())
    }

    fn name(&self) -> &'static str {
        "round_robin"
    }

    fn kind(&self) -> Option<LoadBalancerKind> {
        Some(LoadBalancerKind::RoundRobin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load_balancer::entry::{NodeType, PoolLimits};

    fn entry(port: u16) -> Arc<ConnectionEntry> {
        let limits = PoolLimits { minimum_idle: 1, max_size: 10 };
        Arc::new(ConnectionEntry::new(
            format!("127.0.0.1:{}", port).parse().unwrap(),
            NodeType::Slave,
            limits,
            limits,
        ))
    }

    #[test]
    fn test_round_robin() {
        let lb = RoundRobin::new();
        let a = entry(6380);
        let b = entry(6381);
        let c = entry(6382);
        let entries = vec![a.clone(), b.clone(), c.clone()];

        let picked: Vec<_> = (0..4)
            .map(|_| lb.select_entry(&entries).unwrap().addr)
            .collect();
        assert_eq!(picked, vec![a.addr, b.addr, c.addr, a.addr]);
    }

    #[test]
    fn test_empty_returns_none() {
        let lb = RoundRobin::new();
        assert!(lb.select_entry(&[]).is_none());
    }

    #[test]
    fn test_membership_change_stays_in_set() {
        let lb = RoundRobin::new();
        let full = vec![entry(6380), entry(6381), entry(6382), entry(6383)];
        for _ in 0..3 {
            lb.select_entry(&full).unwrap();
        }

        let shrunk = vec![full[0].clone(), full[1].clone()];
        for _ in 0..5 {
            let picked = lb.select_entry(&shrunk).unwrap();
            assert!(shrunk.iter().any(|e| Arc::ptr_eq(e, &picked)));
        }

        let grown: Vec<_> = (6390..6397).map(entry).collect();
        for _ in 0..10 {
            let picked = lb.select_entry(&grown).unwrap();
            assert!(grown.iter().any(|e| Arc::ptr_eq(e, &picked)));
        }
    }
}
