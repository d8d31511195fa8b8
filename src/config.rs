//! Pool configuration options

use std::fmt;
use std::sync::Arc;

pub(crate) type Validator<R> = Arc<dyn Fn(&R) -> bool + Send + Sync>;
pub(crate) type Destroyer<R> = Arc<dyn Fn(R) + Send + Sync>;

/// Configuration for keyed pool behavior
///
/// The validator and destroyer are fixed at construction time; the pool
/// never changes them afterwards.
///
/// # Examples
///
/// ```
/// use keyedpool::PoolConfiguration;
///
/// let config = PoolConfiguration::<i32>::new()
///     .with_max_idle(8)
///     .with_validator(|v| *v > 0);
///
/// assert_eq!(config.max_idle, 8);
/// ```
pub struct PoolConfiguration<R> {
    /// Maximum number of idle resources kept per key. Resources released
    /// beyond this bound are destroyed instead of pooled.
    pub max_idle: usize,

    pub(crate) validator: Validator<R>,
    pub(crate) destroyer: Destroyer<R>,
}

impl<R> Default for PoolConfiguration<R> {
    fn default() -> Self {
        Self {
            max_idle: 50,
            validator: Arc::new(|_| true),
            destroyer: Arc::new(|resource| drop(resource)),
        }
    }
}

impl<R> PoolConfiguration<R> {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-key idle bound
    ///
    /// # Examples
    ///
    /// ```
    /// use keyedpool::PoolConfiguration;
    ///
    /// let config = PoolConfiguration::<i32>::new().with_max_idle(4);
    ///
    /// assert_eq!(config.max_idle, 4);
    /// ```
    pub fn with_max_idle(mut self, max_idle: usize) -> Self {
        self.max_idle = max_idle;
        self
    }

    /// Set the validator consulted before a resource is reused or re-pooled.
    ///
    /// The default accepts every resource. The validator must not call back
    /// into the pool.
    pub fn with_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&R) -> bool + Send + Sync + 'static,
    {
        self.validator = Arc::new(validator);
        self
    }

    /// Set the destroyer invoked when a resource is evicted or purged.
    ///
    /// The default simply drops the resource. The destroyer must not call
    /// back into the pool.
    pub fn with_destroyer<F>(mut self, destroyer: F) -> Self
    where
        F: Fn(R) + Send + Sync + 'static,
    {
        self.destroyer = Arc::new(destroyer);
        self
    }
}

impl<R> Clone for PoolConfiguration<R> {
    fn clone(&self) -> Self {
        Self {
            max_idle: self.max_idle,
            validator: Arc::clone(&self.validator),
            destroyer: Arc::clone(&self.destroyer),
        }
    }
}

impl<R> fmt::Debug for PoolConfiguration<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolConfiguration")
            .field("max_idle", &self.max_idle)
            .field("validator", &"<fn>")
            .field("destroyer", &"<fn>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configuration() {
        let config = PoolConfiguration::<i32>::default();
        assert_eq!(config.max_idle, 50);
        assert!((config.validator)(&-1));
    }

    #[test]
    fn builder_overrides() {
        let config = PoolConfiguration::<i32>::new()
            .with_max_idle(2)
            .with_validator(|v| *v % 2 == 0);

        assert_eq!(config.max_idle, 2);
        assert!((config.validator)(&4));
        assert!(!(config.validator)(&3));
    }
}
