//! Error types for manna-core

use thiserror::Error;

/// Result type alias using manna-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced by content-store operations
///
/// Every store failure is reported at the point of action; the only
/// silently discarded case is a page fetch that settles after the consuming
/// view has detached from its feed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Transport-level failure reaching the store; transient and retryable
    #[error("Connection error: {0}")]
    Connectivity(String),

    /// The store rejected or failed to execute a query
    #[error("Query error: {0}")]
    Query(String),

    /// The submitted record was rejected; the operator can correct and resubmit
    #[error("Validation error: {0}")]
    Validation(String),

    /// No record with the given id
    #[error("Devotion not found: {0}")]
    NotFound(String),
}

impl Error {
    /// Whether retrying the same operation can reasonably succeed.
    ///
    /// The pagination path treats query failures like connectivity failures:
    /// the trigger returns to idle and the same window is retried on the
    /// next sentinel visibility.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Connectivity(_) | Self::Query(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connectivity_and_query_are_retryable() {
        assert!(Error::Connectivity("timed out".into()).is_retryable());
        assert!(Error::Query("bad range".into()).is_retryable());
    }

    #[test]
    fn validation_and_not_found_are_not_retryable() {
        assert!(!Error::Validation("title required".into()).is_retryable());
        assert!(!Error::NotFound("abc".into()).is_retryable());
    }
}
