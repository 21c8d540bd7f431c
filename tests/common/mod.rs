//! Shared helpers for integration tests.

use std::sync::Arc;
use masterslave_config::config::MasterSlaveConfig;
use masterslave_config::load_balancer::{ConnectionEntry, NodeType};

/// Master on 6379 plus `slaves` slaves on consecutive ports, sized from `config`.
pub fn deployment(config: &MasterSlaveConfig, slaves: u16) -> (Arc<ConnectionEntry>, Vec<Arc<ConnectionEntry>>) {
    let master = Arc::new(ConnectionEntry::for_node(
        "127.0.0.1:6379".parse().unwrap(),
        NodeType::Master,
        config,
    ));
    let slaves = (0..slaves)
        .map(|i| {
            Arc::new(ConnectionEntry::for_node(
                format!("127.0.0.1:{}", 6380 + i).parse().unwrap(),
                NodeType::Slave,
                config,
            ))
        })
        .collect();
    (master, slaves)
}

/// Write `content` to a fresh file in the temp dir and return its path.
#[allow(dead_code)]
pub fn write_temp_config(name: &str, content: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("msconfig-{}-{}.toml", name, std::process::id()));
    std::fs::write(&path, content).unwrap();
    path
}
