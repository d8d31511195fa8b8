//! # EsoxSolutions.KeyedPool
//!
//! Thread-safe keyed resource pool for Rust: borrow and return
//! expensive-to-create resources (connections, sessions, handles)
//! partitioned by an arbitrary key such as a target address.
//!
//! ## Features
//!
//! - Per-key idle stacks, popped most-recent-first for locality
//! - Creation delegated to a factory callback; acquisition never waits
//! - Automatic return of resources via RAII (Drop trait)
//! - Release capability handed to the factory for self-returning resources
//! - Validation on reuse and on return, eviction beyond `max_idle`
//! - Purging of single keys or the whole pool
//! - Metrics and health monitoring, Prometheus-format export
//!
//! ## Quick Start
//!
//! ```rust
//! use keyedpool::{KeyedPool, PoolConfiguration};
//!
//! let pool: KeyedPool<String, Vec<u8>> = KeyedPool::new(
//!     |_key, _handle| Ok::<_, std::convert::Infallible>(Vec::new()),
//!     PoolConfiguration::default(),
//! );
//!
//! let key = "db-primary".to_string();
//! {
//!     let buffer = pool.acquire(&key).unwrap();
//!     // Resource automatically returned when `buffer` goes out of scope
//! }
//! assert_eq!(pool.idle_count(&key), 1);
//! ```

mod pool;
mod config;
mod metrics;
mod health;
mod errors;

pub use pool::{KeyedPool, PooledResource, ReleaseHandle};
pub use config::PoolConfiguration;
pub use metrics::{PoolMetrics, MetricsExporter};
pub use health::HealthStatus;
pub use errors::{PoolError, PoolResult};
