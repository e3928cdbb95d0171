//! Construction errors.

/// Errors returned when building a map with a caller-chosen layout.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A table needs at least one bucket to hold anything.
    #[error("bucket count must be at least 1")]
    ZeroBuckets,
}
