//! Crate-wide error type. No retries anywhere: every operation is local and
//! deterministic, so failure is never transient.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A non-empty comment annotation with no recognizable type token.
    /// Fatal for the whole run; a partially-typed output would be misleading.
    #[error("failed to parse type annotation: {0}")]
    Annotation(String),

    #[error("document root must be a mapping")]
    RootNotMapping,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    // ---- binder ----
    #[error("missing required field: {record}.{field}")]
    MissingField {
        record: &'static str,
        field: &'static str,
    },

    #[error("{record}.{field}: expected {expected}")]
    ShapeMismatch {
        record: &'static str,
        field: &'static str,
        expected: &'static str,
    },

    #[error("configuration hasn't been loaded yet; call load first")]
    NotLoaded,

    #[error("failed to bind document: {0}")]
    Bind(String),
}
