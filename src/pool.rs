//! Core keyed pool implementation

use crate::config::PoolConfiguration;
use crate::errors::{PoolError, PoolResult};
use crate::health::HealthStatus;
use crate::metrics::{MetricsExporter, MetricsTracker, PoolMetrics};

use dashmap::DashMap;
use std::collections::HashMap;
use std::hash::Hash;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::Ordering;
use std::sync::{Arc, Weak};

type Factory<K, R> = Box<dyn Fn(&K, ReleaseHandle<K, R>) -> PoolResult<R> + Send + Sync>;

/// Shared pool state behind the `Arc`
struct PoolShared<K, R> {
    idle: DashMap<K, Vec<R>>,
    factory: Factory<K, R>,
    config: PoolConfiguration<R>,
    metrics: MetricsTracker,
}

impl<K, R> PoolShared<K, R>
where
    K: Eq + Hash,
{
    /// Re-admit or destroy a resource coming back from a borrower.
    ///
    /// The idle-list length is checked before the validator runs, so a
    /// resource released into a full list is destroyed without validation.
    fn release(&self, key: &K, resource: R) {
        let Some(mut bucket) = self.idle.get_mut(key) else {
            // Key was purged while this resource was borrowed.
            self.destroy(resource);
            return;
        };

        if bucket.len() >= self.config.max_idle {
            drop(bucket);
            self.destroy(resource);
            return;
        }

        if !(self.config.validator)(&resource) {
            drop(bucket);
            self.metrics.validation_failures.fetch_add(1, Ordering::Relaxed);
            self.destroy(resource);
            return;
        }

        bucket.push(resource);
        self.metrics.total_returned.fetch_add(1, Ordering::Relaxed);
    }

    fn destroy(&self, resource: R) {
        self.metrics.total_destroyed.fetch_add(1, Ordering::Relaxed);
        (self.config.destroyer)(resource);
    }
}

/// Release capability bound to one pool
///
/// Handed to the factory on every creation so resources can wire it into
/// their own close/dispose path, and obtainable via
/// [`KeyedPool::release_handle`]. Holds only a weak reference to the pool,
/// so a resource embedding its handle never keeps the pool alive.
#[derive(Debug)]
pub struct ReleaseHandle<K, R> {
    shared: Weak<PoolShared<K, R>>,
}

impl<K, R> ReleaseHandle<K, R>
where
    K: Eq + Hash,
{
    /// Return a resource to the pool it was acquired from.
    ///
    /// The pool re-validates the resource and either stores it idle or
    /// destroys it. If the pool has already been dropped, the resource is
    /// simply dropped.
    pub fn release(&self, key: &K, resource: R) {
        match self.shared.upgrade() {
            Some(shared) => shared.release(key, resource),
            None => drop(resource),
        }
    }
}

impl<K, R> Clone for ReleaseHandle<K, R> {
    fn clone(&self) -> Self {
        Self {
            shared: Weak::clone(&self.shared),
        }
    }
}

/// A borrowed resource that returns to its pool when dropped
#[derive(Debug)]
pub struct PooledResource<K, R>
where
    K: Eq + Hash,
{
    value: Option<R>,
    key: K,
    handle: ReleaseHandle<K, R>,
}

impl<K, R> PooledResource<K, R>
where
    K: Eq + Hash,
{
    fn new(value: R, key: K, handle: ReleaseHandle<K, R>) -> Self {
        Self {
            value: Some(value),
            key,
            handle,
        }
    }

    /// The key this resource was acquired under
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Take the inner value without returning it to the pool.
    ///
    /// The pool forgets the resource entirely; the destroyer is not called.
    pub fn into_inner(mut self) -> R {
        self.value.take().expect("Resource already taken")
    }
}

impl<K, R> Deref for PooledResource<K, R>
where
    K: Eq + Hash,
{
    type Target = R;

    fn deref(&self) -> &Self::Target {
        self.value.as_ref().expect("Resource already taken")
    }
}

impl<K, R> DerefMut for PooledResource<K, R>
where
    K: Eq + Hash,
{
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.value.as_mut().expect("Resource already taken")
    }
}

impl<K, R> Drop for PooledResource<K, R>
where
    K: Eq + Hash,
{
    fn drop(&mut self) {
        if let Some(value) = self.value.take() {
            self.handle.release(&self.key, value);
        }
    }
}

/// Thread-safe resource pool partitioned by key
///
/// Each key owns an idle stack of resources, popped most-recent-first for
/// locality. Acquisition never waits: an exhausted idle list always calls
/// the factory, so the total number of live resources is unbounded and
/// `max_idle` only bounds what the pool retains between uses.
///
/// Cloning the pool yields another handle to the same shared state.
///
/// Dropping the pool does not run the destroyer on idle resources; call
/// [`purge_all`](KeyedPool::purge_all) first when underlying system
/// resources must be released deterministically.
pub struct KeyedPool<K, R> {
    shared: Arc<PoolShared<K, R>>,
}

impl<K, R> KeyedPool<K, R>
where
    K: Eq + Hash + Clone,
{
    /// Create a new pool around a resource factory.
    ///
    /// The factory receives the key being acquired and a [`ReleaseHandle`]
    /// bound to this pool; factory errors propagate unchanged out of
    /// [`acquire`](KeyedPool::acquire) as [`PoolError::Factory`].
    pub fn new<F, E>(factory: F, config: PoolConfiguration<R>) -> Self
    where
        F: Fn(&K, ReleaseHandle<K, R>) -> Result<R, E> + Send + Sync + 'static,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self {
            shared: Arc::new(PoolShared {
                idle: DashMap::new(),
                factory: Box::new(move |key, handle| {
                    factory(key, handle).map_err(PoolError::factory)
                }),
                config,
                metrics: MetricsTracker::new(),
            }),
        }
    }

    /// Borrow a resource for `key`, creating one if no valid idle resource exists.
    ///
    /// Idle resources are popped most-recent-first and validated; invalid
    /// ones are destroyed and skipped. A freshly created resource is
    /// returned without validation, since creation is trusted. The key
    /// becomes known on the first call and stays known even if the factory
    /// fails.
    pub fn acquire(&self, key: &K) -> PoolResult<PooledResource<K, R>> {
        let shared = &self.shared;
        shared.idle.entry(key.clone()).or_default();

        loop {
            let popped = shared.idle.get_mut(key).and_then(|mut bucket| bucket.pop());
            match popped {
                Some(resource) => {
                    if (shared.config.validator)(&resource) {
                        shared.metrics.total_reused.fetch_add(1, Ordering::Relaxed);
                        return Ok(self.wrap(key.clone(), resource));
                    }
                    shared.metrics.validation_failures.fetch_add(1, Ordering::Relaxed);
                    shared.destroy(resource);
                }
                None => break,
            }
        }

        let resource = (shared.factory)(key, self.release_handle())?;
        shared.metrics.total_created.fetch_add(1, Ordering::Relaxed);
        Ok(self.wrap(key.clone(), resource))
    }

    /// Destroy every idle resource for `key` and forget the key entirely.
    ///
    /// Resources currently borrowed under `key` are unaffected; when they
    /// are eventually released they are destroyed instead of re-pooled, and
    /// the key is not re-created.
    pub fn purge(&self, key: &K) {
        if let Some((_, bucket)) = self.shared.idle.remove(key) {
            for resource in bucket {
                self.shared.destroy(resource);
            }
        }
    }

    /// Purge every key known when the call started.
    pub fn purge_all(&self) {
        let keys: Vec<K> = self.shared.idle.iter().map(|entry| entry.key().clone()).collect();
        for key in &keys {
            self.purge(key);
        }
    }

    /// Whether `key` is currently known to the pool (its idle list may be empty)
    pub fn has(&self, key: &K) -> bool {
        self.shared.idle.contains_key(key)
    }

    /// Idle resources currently held for `key`
    pub fn idle_count(&self, key: &K) -> usize {
        self.shared.idle.get(key).map(|bucket| bucket.len()).unwrap_or(0)
    }

    /// Idle resources across all keys
    pub fn idle_total(&self) -> usize {
        self.shared.idle.iter().map(|entry| entry.value().len()).sum()
    }

    /// Number of known keys
    pub fn key_count(&self) -> usize {
        self.shared.idle.len()
    }

    /// A release capability bound to this pool, for returning detached resources
    pub fn release_handle(&self) -> ReleaseHandle<K, R> {
        ReleaseHandle {
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// Get pool metrics
    pub fn get_metrics(&self) -> PoolMetrics {
        self.shared.metrics.snapshot(self.idle_total(), self.key_count())
    }

    /// Get health status
    pub fn get_health_status(&self) -> HealthStatus {
        HealthStatus::new(&self.get_metrics())
    }

    /// Export metrics
    pub fn export_metrics(&self) -> HashMap<String, String> {
        self.get_metrics().export()
    }

    /// Export metrics in Prometheus format
    pub fn export_metrics_prometheus(
        &self,
        pool_name: &str,
        tags: Option<&HashMap<String, String>>,
    ) -> String {
        MetricsExporter::export_prometheus(&self.get_metrics(), pool_name, tags)
    }

    fn wrap(&self, key: K, resource: R) -> PooledResource<K, R> {
        PooledResource::new(resource, key, self.release_handle())
    }
}

impl<K, R> Clone for KeyedPool<K, R> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}
