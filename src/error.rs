use thiserror::Error;

/// Errors reported by every fallible operation in the crate.
///
/// Variants are grouped by kind so callers (and the transport layer in front of them) can
/// decide between a validation response, a missing-resource response and a hard failure.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid parameters: weight sums, k out of range, unknown sort column or method.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A referenced zone id (source, target, start node) does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Internal data structures disagree with each other (e.g. an edge to an unknown node).
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// Input tables are malformed: missing columns, non-finite values, duplicate ids.
    #[error("upstream data error: {0}")]
    UpstreamData(String),

    /// The aggregation worker pool could not be started.
    #[error("failed to start worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

impl Error {
    pub(crate) fn config(msg: impl Into<String>) -> Self { Self::Configuration(msg.into()) }

    pub(crate) fn not_found(msg: impl Into<String>) -> Self { Self::NotFound(msg.into()) }

    pub(crate) fn invariant(msg: impl Into<String>) -> Self { Self::InvariantViolation(msg.into()) }

    pub(crate) fn upstream(msg: impl Into<String>) -> Self { Self::UpstreamData(msg.into()) }
}

impl From<polars::error::PolarsError> for Error {
    fn from(err: polars::error::PolarsError) -> Self { Self::UpstreamData(err.to_string()) }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
