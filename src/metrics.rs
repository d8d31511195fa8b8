//! Metrics collection and export for keyed pools

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Metrics snapshot for a pool
///
/// # Examples
///
/// ```
/// use keyedpool::{KeyedPool, PoolConfiguration};
///
/// let pool: KeyedPool<&str, i32> = KeyedPool::new(
///     |_key, _handle| Ok::<_, std::convert::Infallible>(7),
///     PoolConfiguration::default(),
/// );
///
/// let resource = pool.acquire(&"alpha").unwrap();
/// drop(resource);
///
/// let metrics = pool.get_metrics();
/// assert_eq!(metrics.total_created, 1);
/// assert_eq!(metrics.total_returned, 1);
/// assert_eq!(metrics.idle_resources, 1);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PoolMetrics {
    /// Resources created by the factory
    pub total_created: usize,

    /// Resources handed out from an idle list
    pub total_reused: usize,

    /// Resources returned to an idle list
    pub total_returned: usize,

    /// Resources destroyed (eviction, invalidation, or purge)
    pub total_destroyed: usize,

    /// Validation failures observed on acquire or release
    pub validation_failures: usize,

    /// Current idle resources across all keys
    pub idle_resources: usize,

    /// Current number of known keys
    pub known_keys: usize,

    /// Fraction of acquisitions served from an idle list (0.0 to 1.0)
    pub reuse_ratio: f64,
}

impl PoolMetrics {
    /// Export metrics as a HashMap
    pub fn export(&self) -> HashMap<String, String> {
        let mut metrics = HashMap::new();
        metrics.insert("total_created".to_string(), self.total_created.to_string());
        metrics.insert("total_reused".to_string(), self.total_reused.to_string());
        metrics.insert("total_returned".to_string(), self.total_returned.to_string());
        metrics.insert("total_destroyed".to_string(), self.total_destroyed.to_string());
        metrics.insert("validation_failures".to_string(), self.validation_failures.to_string());
        metrics.insert("idle_resources".to_string(), self.idle_resources.to_string());
        metrics.insert("known_keys".to_string(), self.known_keys.to_string());
        metrics.insert("reuse_ratio".to_string(), format!("{:.2}", self.reuse_ratio));
        metrics
    }
}

/// Metrics exporter for Prometheus format
pub struct MetricsExporter;

impl MetricsExporter {
    /// Export metrics in Prometheus exposition format
    ///
    /// # Examples
    ///
    /// ```
    /// use keyedpool::{KeyedPool, PoolConfiguration};
    /// use std::collections::HashMap;
    ///
    /// let pool: KeyedPool<&str, i32> = KeyedPool::new(
    ///     |_key, _handle| Ok::<_, std::convert::Infallible>(7),
    ///     PoolConfiguration::default(),
    /// );
    ///
    /// let mut tags = HashMap::new();
    /// tags.insert("service".to_string(), "api".to_string());
    ///
    /// let output = pool.export_metrics_prometheus("my_pool", Some(&tags));
    /// assert!(output.contains("keyedpool_resources_idle"));
    /// assert!(output.contains("service=\"api\""));
    /// ```
    pub fn export_prometheus(
        metrics: &PoolMetrics,
        pool_name: &str,
        tags: Option<&HashMap<String, String>>,
    ) -> String {
        let mut output = String::new();
        let labels = Self::format_labels(pool_name, tags);

        // Gauge metrics
        output.push_str("# HELP keyedpool_resources_idle Current idle resources across all keys\n");
        output.push_str("# TYPE keyedpool_resources_idle gauge\n");
        output.push_str(&format!("keyedpool_resources_idle{{{}}} {}\n", labels, metrics.idle_resources));

        output.push_str("# HELP keyedpool_keys Current number of known keys\n");
        output.push_str("# TYPE keyedpool_keys gauge\n");
        output.push_str(&format!("keyedpool_keys{{{}}} {}\n", labels, metrics.known_keys));

        output.push_str("# HELP keyedpool_reuse_ratio Fraction of acquisitions served from idle\n");
        output.push_str("# TYPE keyedpool_reuse_ratio gauge\n");
        output.push_str(&format!("keyedpool_reuse_ratio{{{}}} {:.2}\n", labels, metrics.reuse_ratio));

        // Counter metrics
        output.push_str("# HELP keyedpool_resources_created_total Total resources created\n");
        output.push_str("# TYPE keyedpool_resources_created_total counter\n");
        output.push_str(&format!("keyedpool_resources_created_total{{{}}} {}\n", labels, metrics.total_created));

        output.push_str("# HELP keyedpool_resources_reused_total Total resources reused\n");
        output.push_str("# TYPE keyedpool_resources_reused_total counter\n");
        output.push_str(&format!("keyedpool_resources_reused_total{{{}}} {}\n", labels, metrics.total_reused));

        output.push_str("# HELP keyedpool_resources_returned_total Total resources returned to idle\n");
        output.push_str("# TYPE keyedpool_resources_returned_total counter\n");
        output.push_str(&format!("keyedpool_resources_returned_total{{{}}} {}\n", labels, metrics.total_returned));

        output.push_str("# HELP keyedpool_resources_destroyed_total Total resources destroyed\n");
        output.push_str("# TYPE keyedpool_resources_destroyed_total counter\n");
        output.push_str(&format!("keyedpool_resources_destroyed_total{{{}}} {}\n", labels, metrics.total_destroyed));

        output.push_str("# HELP keyedpool_validation_failures_total Validation failures\n");
        output.push_str("# TYPE keyedpool_validation_failures_total counter\n");
        output.push_str(&format!("keyedpool_validation_failures_total{{{}}} {}\n", labels, metrics.validation_failures));

        output
    }

    fn format_labels(pool_name: &str, tags: Option<&HashMap<String, String>>) -> String {
        let mut labels = vec![format!("pool=\"{}\"", pool_name)];

        if let Some(tags) = tags {
            for (key, value) in tags {
                labels.push(format!("{}=\"{}\"", key, value));
            }
        }

        labels.join(",")
    }
}

/// Internal metrics tracker
pub(crate) struct MetricsTracker {
    pub total_created: AtomicUsize,
    pub total_reused: AtomicUsize,
    pub total_returned: AtomicUsize,
    pub total_destroyed: AtomicUsize,
    pub validation_failures: AtomicUsize,
}

impl MetricsTracker {
    pub fn new() -> Self {
        Self {
            total_created: AtomicUsize::new(0),
            total_reused: AtomicUsize::new(0),
            total_returned: AtomicUsize::new(0),
            total_destroyed: AtomicUsize::new(0),
            validation_failures: AtomicUsize::new(0),
        }
    }

    pub fn snapshot(&self, idle_resources: usize, known_keys: usize) -> PoolMetrics {
        let total_created = self.total_created.load(Ordering::Relaxed);
        let total_reused = self.total_reused.load(Ordering::Relaxed);

        let acquisitions = total_created + total_reused;
        let reuse_ratio = if acquisitions > 0 {
            total_reused as f64 / acquisitions as f64
        } else {
            0.0
        };

        PoolMetrics {
            total_created,
            total_reused,
            total_returned: self.total_returned.load(Ordering::Relaxed),
            total_destroyed: self.total_destroyed.load(Ordering::Relaxed),
            validation_failures: self.validation_failures.load(Ordering::Relaxed),
            idle_resources,
            known_keys,
            reuse_ratio,
        }
    }
}

impl Default for MetricsTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_computes_reuse_ratio() {
        let tracker = MetricsTracker::new();
        tracker.total_created.store(1, Ordering::Relaxed);
        tracker.total_reused.store(3, Ordering::Relaxed);

        let metrics = tracker.snapshot(2, 1);
        assert_eq!(metrics.idle_resources, 2);
        assert_eq!(metrics.known_keys, 1);
        assert!((metrics.reuse_ratio - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn prometheus_export_shape() {
        let tracker = MetricsTracker::new();
        tracker.total_created.store(4, Ordering::Relaxed);
        let metrics = tracker.snapshot(0, 2);

        let output = MetricsExporter::export_prometheus(&metrics, "backend", None);
        assert!(output.contains("keyedpool_resources_created_total{pool=\"backend\"} 4"));
        assert!(output.contains("# TYPE keyedpool_keys gauge"));
        assert!(output.contains("keyedpool_keys{pool=\"backend\"} 2"));
    }

    #[test]
    fn export_map_contains_all_counters() {
        let metrics = MetricsTracker::new().snapshot(0, 0);
        let map = metrics.export();
        for field in [
            "total_created",
            "total_reused",
            "total_returned",
            "total_destroyed",
            "validation_failures",
            "idle_resources",
            "known_keys",
            "reuse_ratio",
        ] {
            assert!(map.contains_key(field), "missing {field}");
        }
    }
}
