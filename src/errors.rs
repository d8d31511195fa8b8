//! Error types for the keyed pool

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PoolError {
    #[error("resource factory failed: {0}")]
    Factory(Box<dyn std::error::Error + Send + Sync>),
}

impl PoolError {
    /// Wrap a factory error for propagation out of `acquire`.
    pub fn factory<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Factory(err.into())
    }
}

pub type PoolResult<T> = Result<T, PoolError>;
