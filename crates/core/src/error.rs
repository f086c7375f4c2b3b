//! Unified error types for the route cache pipeline.

use crate::config::ConfigError;

/// Unified error type for cache building and projection.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A paginated store query failed. Aborts the collection's pagination
    /// chain; never retried automatically.
    #[error("store query failed on {collection}: {reason}")]
    StoreQuery { collection: String, reason: String },

    /// A collection chain failed, so the aggregate cache build was
    /// discarded. The cache reverts to empty and the next caller rebuilds.
    #[error("route cache build failed: {0}")]
    Build(#[source] Box<Error>),

    /// A document is missing a field a transform needs.
    ///
    /// During projection this is recovered locally (the document is skipped
    /// and logged); during cache population it fails the build, since an
    /// unkeyable document would silently drop a route.
    #[error("malformed document at {route}: {reason}")]
    MalformedDocument { route: String, reason: String },

    /// A date field uses a representation that cannot be normalized.
    #[error("unnormalizable timestamp: {0}")]
    Timestamp(String),

    /// Configuration loading or validation failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
