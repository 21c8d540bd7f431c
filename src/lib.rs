//! Master/slave connection pool configuration and read load balancing.

pub mod config;
pub mod load_balancer;
pub mod observability;
pub mod routing;

pub use config::{MasterSlaveConfig, MasterSlaveServersConfig, ReadMode};
pub use load_balancer::{ConnectionEntry, LoadBalancer};
