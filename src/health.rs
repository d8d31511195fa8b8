//! Health monitoring for keyed pools

use crate::metrics::PoolMetrics;

/// Health status of a keyed pool
///
/// # Examples
///
/// ```
/// use keyedpool::{KeyedPool, PoolConfiguration};
///
/// let pool: KeyedPool<&str, i32> = KeyedPool::new(
///     |_key, _handle| Ok::<_, std::convert::Infallible>(1),
///     PoolConfiguration::default(),
/// );
///
/// let resource = pool.acquire(&"alpha").unwrap();
/// drop(resource);
///
/// let health = pool.get_health_status();
/// assert!(health.is_healthy());
/// assert_eq!(health.idle_resources, 1);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct HealthStatus {
    /// Whether the pool is healthy
    pub is_healthy: bool,

    /// Number of warnings detected
    pub warning_count: usize,

    /// Current idle resources across all keys
    pub idle_resources: usize,

    /// Current number of known keys
    pub known_keys: usize,

    /// Fraction of acquisitions served from idle (0.0 to 1.0)
    pub reuse_ratio: f64,

    /// Warning messages
    pub warnings: Vec<String>,
}

impl HealthStatus {
    /// Derive a health status from a metrics snapshot
    pub fn new(metrics: &PoolMetrics) -> Self {
        let mut warnings = Vec::new();
        let mut is_healthy = true;

        let acquisitions = metrics.total_created + metrics.total_reused;

        // Validation failures above 10% of acquisitions mark the pool unhealthy
        if acquisitions > 0 {
            let failure_rate = metrics.validation_failures as f64 / acquisitions as f64;
            if failure_rate > 0.1 {
                warnings.push(format!(
                    "High validation failure rate: {:.1}%",
                    failure_rate * 100.0
                ));
                is_healthy = false;
            }
        }

        // Destroying more than half of what was ever created signals churn
        if metrics.total_created >= 10
            && metrics.total_destroyed * 2 > metrics.total_created + metrics.total_reused
        {
            warnings.push(format!(
                "High eviction churn: {} destroyed of {} created",
                metrics.total_destroyed, metrics.total_created
            ));
        }

        if metrics.idle_resources == 0 && metrics.known_keys > 0 {
            warnings.push("No idle resources".to_string());
        }

        Self {
            is_healthy,
            warning_count: warnings.len(),
            idle_resources: metrics.idle_resources,
            known_keys: metrics.known_keys,
            reuse_ratio: metrics.reuse_ratio,
            warnings,
        }
    }

    /// Check if the pool is healthy
    pub fn is_healthy(&self) -> bool {
        self.is_healthy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(created: usize, reused: usize, destroyed: usize, failures: usize) -> PoolMetrics {
        let acquisitions = created + reused;
        PoolMetrics {
            total_created: created,
            total_reused: reused,
            total_returned: 0,
            total_destroyed: destroyed,
            validation_failures: failures,
            idle_resources: 1,
            known_keys: 1,
            reuse_ratio: if acquisitions > 0 {
                reused as f64 / acquisitions as f64
            } else {
                0.0
            },
        }
    }

    #[test]
    fn healthy_by_default() {
        let health = HealthStatus::new(&metrics(5, 20, 1, 0));
        assert!(health.is_healthy());
        assert_eq!(health.warning_count, 0);
    }

    #[test]
    fn validation_failures_flip_health() {
        let health = HealthStatus::new(&metrics(10, 0, 5, 4));
        assert!(!health.is_healthy());
        assert!(health.warnings.iter().any(|w| w.contains("validation failure")));
    }

    #[test]
    fn churn_warns_without_flipping_health() {
        let health = HealthStatus::new(&metrics(20, 0, 15, 0));
        assert!(health.is_healthy());
        assert!(health.warnings.iter().any(|w| w.contains("eviction churn")));
    }
}
